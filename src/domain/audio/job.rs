use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::PipelineError;

/// Deduplication identity of one unit of synthesis work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioJobKey {
    pub article_id: String,
    pub voice_id: String,
}

impl AudioJobKey {
    pub fn new(article_id: &str, voice_id: &str) -> Self {
        Self {
            article_id: article_id.to_string(),
            voice_id: voice_id.to_string(),
        }
    }
}

impl std::fmt::Display for AudioJobKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.article_id, self.voice_id)
    }
}

/// Public lifecycle of an audio job, broadcast to waiters over a watch
/// channel. Terminal states carry the attempt count that produced them.
#[derive(Debug, Clone)]
pub enum JobState {
    Pending,
    Running { attempt: u32 },
    Succeeded { asset_id: String, attempts: u32 },
    Failed { error: PipelineError, attempts: u32 },
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Succeeded { .. } | JobState::Failed { .. })
    }

    pub fn attempt(&self) -> u32 {
        match self {
            JobState::Pending => 0,
            JobState::Running { attempt } => *attempt,
            JobState::Succeeded { attempts, .. } | JobState::Failed { attempts, .. } => *attempts,
        }
    }
}

/// Retry behavior for transient synthesis failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Base delay for exponential backoff.
    pub base_delay: Duration,
    /// Cap applied before jitter.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Backoff before retrying after `attempt` failures:
    /// `base * 2^(attempt - 1)`, capped at `max_delay`, plus up to 25%
    /// jitter so synchronized retries spread out.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exp = 2u32.saturating_pow(attempt.saturating_sub(1));
        let raw = self.base_delay.saturating_mul(exp);
        let capped = raw.min(self.max_delay);
        let jitter = capped.mul_f64(rand::thread_rng().gen_range(0.0..0.25));
        capped + jitter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_exponentially_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(4000),
        };

        let bounds = |attempt: u32, expected_ms: u64| {
            let d = policy.delay_for_attempt(attempt);
            let lo = Duration::from_millis(expected_ms);
            let hi = lo.mul_f64(1.25);
            assert!(d >= lo && d <= hi, "attempt {attempt}: {d:?} not in [{lo:?}, {hi:?}]");
        };

        bounds(1, 1000);
        bounds(2, 2000);
        bounds(3, 4000);
        // Capped from here on.
        bounds(4, 4000);
        bounds(5, 4000);
    }

    #[test]
    fn test_job_state_terminal_detection() {
        assert!(!JobState::Pending.is_terminal());
        assert!(!JobState::Running { attempt: 1 }.is_terminal());
        assert!(JobState::Succeeded {
            asset_id: "x".into(),
            attempts: 1
        }
        .is_terminal());
        assert!(JobState::Failed {
            error: PipelineError::SynthesisTimeout,
            attempts: 3
        }
        .is_terminal());
    }

    #[test]
    fn test_key_display_pairs_article_and_voice() {
        let key = AudioJobKey::new("abc123", "morgan_freeman");
        assert_eq!(key.to_string(), "abc123:morgan_freeman");
    }
}
