// Shared fixtures for integration tests: scripted collaborator doubles
// and a fully wired pipeline against an in-memory article listing.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

use newsbreeze_backend::domain::audio::{AudioJobPipeline, PipelineConfig, RetryPolicy};
use newsbreeze_backend::domain::news::{Article, ArticleStore, Category};
use newsbreeze_backend::domain::voice::VoiceCatalog;
use newsbreeze_backend::infrastructure::repositories::{
    AssetError, AssetRepository, NewsSourceClient, SynthesisError, SynthesisRepository,
};

pub const VOICE: &str = "morgan_freeman";
pub const OTHER_VOICE: &str = "david_attenborough";

static TRACING: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
});

pub fn article(id: &str, title: &str, category: Category) -> Article {
    Article {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("{title}, reported at length."),
        author: "Newsroom".to_string(),
        url: format!("https://news.example/{id}"),
        image_url: String::new(),
        published_at: Utc::now(),
        category,
        source: "example".to_string(),
        source_display: "Example News".to_string(),
    }
}

pub struct StaticNewsSource {
    articles: Vec<Article>,
}

impl StaticNewsSource {
    pub fn with_default_articles() -> Self {
        Self {
            articles: vec![
                article("art-1", "Markets rally on surprise rate cut", Category::Business),
                article("art-2", "New chip breaks inference speed record", Category::Technology),
                article("art-3", "Storm finally clears after a long week", Category::General),
            ],
        }
    }
}

#[async_trait]
impl NewsSourceClient for StaticNewsSource {
    async fn fetch_articles(&self, category: Option<Category>) -> Result<Vec<Article>, String> {
        Ok(match category {
            Some(c) => self
                .articles
                .iter()
                .filter(|a| a.category == c)
                .cloned()
                .collect(),
            None => self.articles.clone(),
        })
    }
}

/// Synthesis double driven by a script of outcomes. Once the script is
/// exhausted every further call succeeds with placeholder bytes. Records
/// dispatch and completion instants for admission-order assertions.
pub struct ScriptedSynthesis {
    delay: Duration,
    script: Mutex<VecDeque<Result<Vec<u8>, SynthesisError>>>,
    starts: Mutex<Vec<Instant>>,
    finishes: Mutex<Vec<Instant>>,
}

impl ScriptedSynthesis {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            script: Mutex::new(VecDeque::new()),
            starts: Mutex::new(Vec::new()),
            finishes: Mutex::new(Vec::new()),
        }
    }

    pub fn push_outcome(&self, outcome: Result<Vec<u8>, SynthesisError>) {
        self.script.lock().push_back(outcome);
    }

    pub fn push_transient(&self, msg: &str) {
        self.push_outcome(Err(SynthesisError::Transient(msg.to_string())));
    }

    pub fn push_permanent(&self, msg: &str) {
        self.push_outcome(Err(SynthesisError::Permanent(msg.to_string())));
    }

    /// Number of dispatched calls, including ones cancelled mid-flight.
    pub fn call_count(&self) -> usize {
        self.starts.lock().len()
    }

    pub fn starts(&self) -> Vec<Instant> {
        self.starts.lock().clone()
    }

    pub fn finishes(&self) -> Vec<Instant> {
        self.finishes.lock().clone()
    }
}

#[async_trait]
impl SynthesisRepository for ScriptedSynthesis {
    async fn synthesize(
        &self,
        _text: &str,
        _voice: &newsbreeze_backend::domain::voice::VoicePersona,
    ) -> Result<Vec<u8>, SynthesisError> {
        self.starts.lock().push(Instant::now());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let outcome = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(b"mp3-bytes".to_vec()));

        self.finishes.lock().push(Instant::now());
        outcome
    }
}

/// In-memory asset sink with injectable write failures.
pub struct MemoryAssetRepository {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    failing_puts: Mutex<u32>,
}

impl MemoryAssetRepository {
    pub fn new() -> Self {
        Self {
            blobs: Mutex::new(HashMap::new()),
            failing_puts: Mutex::new(0),
        }
    }

    /// Make the next `n` put calls fail.
    pub fn fail_next_puts(&self, n: u32) {
        *self.failing_puts.lock() = n;
    }

    pub fn stored_count(&self) -> usize {
        self.blobs.lock().len()
    }
}

#[async_trait]
impl AssetRepository for MemoryAssetRepository {
    async fn put(&self, bytes: &[u8]) -> Result<String, AssetError> {
        {
            let mut failing = self.failing_puts.lock();
            if *failing > 0 {
                *failing -= 1;
                return Err(AssetError::Storage("injected write failure".to_string()));
            }
        }

        let asset_id = Uuid::new_v4().to_string();
        self.blobs.lock().insert(asset_id.clone(), bytes.to_vec());
        Ok(asset_id)
    }

    async fn get(&self, asset_id: &str) -> Result<Vec<u8>, AssetError> {
        self.blobs
            .lock()
            .get(asset_id)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(asset_id.to_string()))
    }
}

/// Pipeline config with millisecond-scale knobs so paused-clock tests
/// stay fast.
pub fn fast_config() -> PipelineConfig {
    PipelineConfig {
        retry: RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(100),
        },
        per_job_timeout: Duration::from_secs(60),
        cache_ttl: Duration::from_secs(3600),
        cache_capacity: 500,
        global_concurrency: 8,
        per_voice_concurrency: 2,
    }
}

pub struct TestContext {
    pub pipeline: Arc<AudioJobPipeline>,
    pub synthesis: Arc<ScriptedSynthesis>,
    pub assets: Arc<MemoryAssetRepository>,
    pub store: Arc<ArticleStore>,
    pub catalog: Arc<VoiceCatalog>,
}

impl TestContext {
    pub async fn new(config: PipelineConfig, synthesis: ScriptedSynthesis) -> Self {
        Lazy::force(&TRACING);

        let catalog = Arc::new(VoiceCatalog::with_default_voices());
        let source = Arc::new(StaticNewsSource::with_default_articles());
        let store = Arc::new(ArticleStore::new(source, Duration::from_secs(300)));
        // Populate the id index so articles resolve for the pipeline.
        store.list(None).await.unwrap();

        let synthesis = Arc::new(synthesis);
        let assets = Arc::new(MemoryAssetRepository::new());
        let pipeline = Arc::new(AudioJobPipeline::new(
            catalog.clone(),
            store.clone(),
            synthesis.clone(),
            assets.clone(),
            config,
        ));

        Self {
            pipeline,
            synthesis,
            assets,
            store,
            catalog,
        }
    }
}
