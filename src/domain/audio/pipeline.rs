use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex, Semaphore};
use uuid::Uuid;

use super::cache::ResultCache;
use super::error::PipelineError;
use super::job::{AudioJobKey, JobState, RetryPolicy};
use crate::domain::news::{Article, ArticleStore};
use crate::domain::voice::{VoiceCatalog, VoicePersona};
use crate::infrastructure::repositories::{
    AssetRepository, SynthesisError, SynthesisRepository,
};

/// How long a terminally failed job stays observable, so late-joining
/// identical requests see the failure instead of re-dispatching.
const FAILED_JOB_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub retry: RetryPolicy,
    pub per_job_timeout: Duration,
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
    pub global_concurrency: usize,
    pub per_voice_concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            per_job_timeout: Duration::from_secs(90),
            cache_ttl: Duration::from_secs(3600),
            cache_capacity: 500,
            global_concurrency: 8,
            per_voice_concurrency: 2,
        }
    }
}

/// What a caller gets back for a satisfied audio request.
#[derive(Debug, Clone)]
pub struct AudioJobResult {
    pub asset_id: String,
    pub attempts: u32,
    pub cached: bool,
}

struct JobEntry {
    job_id: Uuid,
    rx: watch::Receiver<JobState>,
}

enum Attachment {
    /// The key resolved from the result cache while taking the table lock.
    Cached(String),
    /// The caller joined a live (or grace-period) job.
    Joined(watch::Receiver<JobState>),
}

/// The audio-generation request pipeline.
///
/// One live job per (article, voice) key: concurrent identical requests
/// attach to the same job and the provider is called at most once per
/// key. In-flight synthesis is bounded by a global and a per-voice
/// semaphore (tokio semaphores admit waiters in FIFO order). Completed
/// results land in a TTL + capacity bounded cache.
pub struct AudioJobPipeline {
    voices: Arc<VoiceCatalog>,
    articles: Arc<ArticleStore>,
    synthesis: Arc<dyn SynthesisRepository>,
    assets: Arc<dyn AssetRepository>,
    jobs: Mutex<HashMap<AudioJobKey, JobEntry>>,
    cache: Mutex<ResultCache>,
    global_slots: Arc<Semaphore>,
    voice_slots: HashMap<String, Arc<Semaphore>>,
    config: PipelineConfig,
}

impl AudioJobPipeline {
    pub fn new(
        voices: Arc<VoiceCatalog>,
        articles: Arc<ArticleStore>,
        synthesis: Arc<dyn SynthesisRepository>,
        assets: Arc<dyn AssetRepository>,
        config: PipelineConfig,
    ) -> Self {
        // The catalog is fixed at bootstrap, so the per-voice pools can be
        // built up front and looked up without locking.
        let voice_slots = voices
            .list()
            .into_iter()
            .map(|v| {
                (
                    v.id,
                    Arc::new(Semaphore::new(config.per_voice_concurrency)),
                )
            })
            .collect();

        Self {
            cache: Mutex::new(ResultCache::new(config.cache_ttl, config.cache_capacity)),
            global_slots: Arc::new(Semaphore::new(config.global_concurrency)),
            voice_slots,
            jobs: Mutex::new(HashMap::new()),
            voices,
            articles,
            synthesis,
            assets,
            config,
        }
    }

    /// Request narrated audio for an (article, voice) pair.
    ///
    /// Suspends until the job this caller attached to reaches a terminal
    /// state, or until `caller_timeout` fires. A timed-out caller is
    /// detached with `Timeout`; the job itself keeps running for other
    /// waiters and future cache hits.
    pub async fn request_audio(
        self: &Arc<Self>,
        article_id: &str,
        voice_id: &str,
        caller_timeout: Option<Duration>,
    ) -> Result<AudioJobResult, PipelineError> {
        let voice = self
            .voices
            .get(voice_id)
            .ok_or_else(|| PipelineError::InvalidRequest(format!("unknown voice '{voice_id}'")))?
            .clone();
        let article = self
            .articles
            .get_article(article_id)
            .await
            .map_err(|e| PipelineError::InvalidRequest(e.to_string()))?;

        let key = AudioJobKey::new(article_id, voice_id);

        if let Some(asset_id) = self.cache.lock().await.get(&key) {
            tracing::info!(key = %key, asset_id = %asset_id, "Audio cache hit");
            return Ok(AudioJobResult {
                asset_id,
                attempts: 0,
                cached: true,
            });
        }

        let mut rx = match self.attach_or_spawn(key.clone(), article, voice).await {
            Attachment::Cached(asset_id) => {
                tracing::info!(key = %key, asset_id = %asset_id, "Audio cache hit");
                return Ok(AudioJobResult {
                    asset_id,
                    attempts: 0,
                    cached: true,
                });
            }
            Attachment::Joined(rx) => rx,
        };

        let wait = async {
            match rx.wait_for(|s| s.is_terminal()).await {
                Ok(state) => state.clone(),
                // The runner never drops the sender before a terminal
                // send unless the task itself died.
                Err(_) => JobState::Failed {
                    error: PipelineError::SynthesisUnavailable(
                        "synthesis task aborted".to_string(),
                    ),
                    attempts: 0,
                },
            }
        };

        let state = match caller_timeout {
            Some(deadline) => tokio::time::timeout(deadline, wait).await.map_err(|_| {
                tracing::warn!(key = %key, "Caller detached after wait deadline");
                PipelineError::Timeout
            })?,
            None => wait.await,
        };

        match state {
            JobState::Succeeded { asset_id, attempts } => Ok(AudioJobResult {
                asset_id,
                attempts,
                cached: false,
            }),
            JobState::Failed { error, .. } => Err(error),
            JobState::Pending | JobState::Running { .. } => unreachable!("non-terminal wait result"),
        }
    }

    /// Atomic create-if-absent on the job table. Exactly one concurrent
    /// caller creates the job; everyone else attaches to it.
    async fn attach_or_spawn(
        self: &Arc<Self>,
        key: AudioJobKey,
        article: Article,
        voice: VoicePersona,
    ) -> Attachment {
        let mut jobs = self.jobs.lock().await;

        if let Some(entry) = jobs.get(&key) {
            tracing::debug!(key = %key, job_id = %entry.job_id, "Attached to existing job");
            return Attachment::Joined(entry.rx.clone());
        }

        // A job for this key may have completed between the caller's
        // cache probe and this lock; re-check under the table lock so the
        // key is never synthesized twice.
        if let Some(asset_id) = self.cache.lock().await.get(&key) {
            return Attachment::Cached(asset_id);
        }

        let job_id = Uuid::new_v4();
        let (tx, rx) = watch::channel(JobState::Pending);
        jobs.insert(
            key.clone(),
            JobEntry {
                job_id,
                rx: rx.clone(),
            },
        );
        drop(jobs);

        tracing::info!(key = %key, job_id = %job_id, "Audio job created");

        let pipeline = Arc::clone(self);
        tokio::spawn(async move {
            pipeline.run_job(job_id, key, article, voice, tx).await;
        });

        Attachment::Joined(rx)
    }

    /// Drive one job to a terminal state and publish the outcome.
    async fn run_job(
        self: Arc<Self>,
        job_id: Uuid,
        key: AudioJobKey,
        article: Article,
        voice: VoicePersona,
        tx: watch::Sender<JobState>,
    ) {
        let text = narration_text(&article);

        let outcome = match tokio::time::timeout(
            self.config.per_job_timeout,
            self.run_attempts(&key, &text, &voice, &tx),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(key = %key, job_id = %job_id, "Job exceeded per-job deadline");
                Err(PipelineError::SynthesisTimeout)
            }
        };

        let attempts = tx.borrow().attempt();

        match outcome {
            Ok(asset_id) => {
                // Cache before broadcasting so a caller that misses the
                // live entry right after the terminal send still hits the
                // cache.
                self.cache.lock().await.insert(key.clone(), asset_id.clone());
                tracing::info!(
                    key = %key,
                    job_id = %job_id,
                    asset_id = %asset_id,
                    attempts,
                    "Audio job succeeded"
                );
                tx.send_replace(JobState::Succeeded { asset_id, attempts });
                self.remove_job(&key, job_id).await;
            }
            Err(error) => {
                tracing::error!(
                    key = %key,
                    job_id = %job_id,
                    error = %error,
                    attempts,
                    "Audio job failed"
                );
                tx.send_replace(JobState::Failed { error, attempts });

                // Hold the terminal entry for a grace window, then let the
                // key be retried fresh.
                let pipeline = Arc::clone(&self);
                let key = key.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(FAILED_JOB_GRACE).await;
                    pipeline.remove_job(&key, job_id).await;
                });
            }
        }
    }

    /// Attempt loop: bounded admission, synthesis call, storage, backoff.
    async fn run_attempts(
        &self,
        key: &AudioJobKey,
        text: &str,
        voice: &VoicePersona,
        tx: &watch::Sender<JobState>,
    ) -> Result<String, PipelineError> {
        let per_voice = self
            .voice_slots
            .get(&voice.id)
            .cloned()
            .ok_or_else(|| PipelineError::InvalidRequest(format!("unknown voice '{}'", voice.id)))?;

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            tx.send_replace(JobState::Running { attempt });

            // Permits are scoped to the dispatch so every exit path,
            // including cancellation by the per-job deadline, releases
            // both slots.
            let result = {
                let _global = self
                    .global_slots
                    .acquire()
                    .await
                    .map_err(|_| PipelineError::SynthesisUnavailable("synthesis pool closed".to_string()))?;
                let _voice_slot = per_voice
                    .acquire()
                    .await
                    .map_err(|_| PipelineError::SynthesisUnavailable("synthesis pool closed".to_string()))?;

                tracing::info!(
                    key = %key,
                    voice = %voice.id,
                    attempt,
                    text_length = text.len(),
                    "Dispatching synthesis"
                );
                self.synthesis.synthesize(text, voice).await
            };

            match result {
                Ok(audio) => return self.store_asset(key, audio).await,
                Err(SynthesisError::Permanent(msg)) => {
                    return Err(PipelineError::SynthesisRejected(msg));
                }
                Err(SynthesisError::Transient(msg)) => {
                    if attempt >= self.config.retry.max_attempts {
                        tracing::warn!(key = %key, attempt, "Retry budget exhausted");
                        return Err(PipelineError::SynthesisUnavailable(msg));
                    }
                    let delay = self.config.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        key = %key,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %msg,
                        "Transient synthesis failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Persist synthesized bytes. Storage failures get a single retry.
    async fn store_asset(&self, key: &AudioJobKey, audio: Vec<u8>) -> Result<String, PipelineError> {
        match self.assets.put(&audio).await {
            Ok(asset_id) => Ok(asset_id),
            Err(first) => {
                tracing::warn!(key = %key, error = %first, "Asset store write failed, retrying once");
                self.assets
                    .put(&audio)
                    .await
                    .map_err(|e| PipelineError::StorageFailure(e.to_string()))
            }
        }
    }

    async fn remove_job(&self, key: &AudioJobKey, job_id: Uuid) {
        let mut jobs = self.jobs.lock().await;
        // A fresh job may already occupy the key once the grace elapsed.
        if jobs.get(key).map(|e| e.job_id) == Some(job_id) {
            jobs.remove(key);
        }
    }
}

/// Text handed to the synthesis provider for an article.
fn narration_text(article: &Article) -> String {
    let title = clean_text(&article.title);
    let body = clean_text(&article.description);
    if body.is_empty() {
        title
    } else if title.is_empty() {
        body
    } else {
        format!("{title}. {body}")
    }
}

/// Clean text by removing HTML tags, URLs, and normalizing whitespace
fn clean_text(text: &str) -> String {
    // Convert HTML to plain text
    let plain_text = html2text::from_read(text.as_bytes(), usize::MAX);

    // Remove URLs (both http and https)
    let url_pattern = regex::Regex::new(r"https?://[^\s]+").unwrap();
    let without_urls = url_pattern.replace_all(&plain_text, "");

    // Normalize whitespace (replace multiple spaces/newlines with single space)
    let whitespace_pattern = regex::Regex::new(r"\s+").unwrap();
    let normalized = whitespace_pattern.replace_all(&without_urls, " ");

    normalized.trim().to_string()
}
