use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::domain::audio::{PipelineConfig, RetryPolicy};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // News upstream
    pub news_api_url: String,
    pub news_refresh_minutes: u64,
    pub request_timeout_secs: u64,
    // Audio assets
    pub audio_dir: String,
    // Synthesis provider
    pub tts_provider: TtsProvider,
    pub aws_region: String,
    pub openai_tts_model: String,
    // Audio pipeline
    pub max_attempts: u32,
    pub base_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub per_job_timeout_ms: u64,
    pub cache_ttl_ms: u64,
    pub cache_capacity: usize,
    pub global_concurrency: usize,
    pub per_voice_concurrency: usize,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    Polly,
    OpenAi,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "production" => Environment::Production,
                    _ => Environment::Development,
                })?,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })?,
            news_api_url: env::var("NEWS_API_URL")
                .unwrap_or_else(|_| "http://localhost:9100".to_string()),
            news_refresh_minutes: env::var("NEWS_REFRESH_MINUTES")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
            audio_dir: env::var("AUDIO_DIR").unwrap_or_else(|_| "./data/audio".to_string()),
            tts_provider: env::var("TTS_PROVIDER")
                .unwrap_or_else(|_| "polly".to_string())
                .parse::<String>()
                .map(|s| match s.to_lowercase().as_str() {
                    "openai" => TtsProvider::OpenAi,
                    _ => TtsProvider::Polly,
                })?,
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "eu-west-1".to_string()),
            openai_tts_model: env::var("OPENAI_TTS_MODEL").unwrap_or_else(|_| "tts-1".to_string()),
            max_attempts: env::var("MAX_ATTEMPTS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()?,
            base_backoff_ms: env::var("BASE_BACKOFF_MS")
                .unwrap_or_else(|_| "500".to_string())
                .parse()?,
            max_backoff_ms: env::var("MAX_BACKOFF_MS")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()?,
            per_job_timeout_ms: env::var("PER_JOB_TIMEOUT_MS")
                .unwrap_or_else(|_| "90000".to_string())
                .parse()?,
            cache_ttl_ms: env::var("CACHE_TTL_MS")
                .unwrap_or_else(|_| "3600000".to_string())
                .parse()?,
            cache_capacity: env::var("CACHE_CAPACITY")
                .unwrap_or_else(|_| "500".to_string())
                .parse()?,
            global_concurrency: env::var("GLOBAL_CONCURRENCY")
                .unwrap_or_else(|_| "8".to_string())
                .parse()?,
            per_voice_concurrency: env::var("PER_VOICE_CONCURRENCY")
                .unwrap_or_else(|_| "2".to_string())
                .parse()?,
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn news_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.news_refresh_minutes * 60)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            retry: RetryPolicy {
                max_attempts: self.max_attempts,
                base_delay: Duration::from_millis(self.base_backoff_ms),
                max_delay: Duration::from_millis(self.max_backoff_ms),
            },
            per_job_timeout: Duration::from_millis(self.per_job_timeout_ms),
            cache_ttl: Duration::from_millis(self.cache_ttl_ms),
            cache_capacity: self.cache_capacity,
            global_concurrency: self.global_concurrency,
            per_voice_concurrency: self.per_voice_concurrency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "HOST",
            "PORT",
            "ENVIRONMENT",
            "LOG_FORMAT",
            "NEWS_API_URL",
            "NEWS_REFRESH_MINUTES",
            "REQUEST_TIMEOUT_SECS",
            "AUDIO_DIR",
            "TTS_PROVIDER",
            "MAX_ATTEMPTS",
            "BASE_BACKOFF_MS",
            "MAX_BACKOFF_MS",
            "PER_JOB_TIMEOUT_MS",
            "CACHE_TTL_MS",
            "CACHE_CAPACITY",
            "GLOBAL_CONCURRENCY",
            "PER_VOICE_CONCURRENCY",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_cover_every_knob() {
        clear_env();
        let config = Config::from_env().unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.tts_provider, TtsProvider::Polly);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.cache_capacity, 500);
        assert_eq!(config.global_concurrency, 8);
        assert_eq!(config.per_voice_concurrency, 2);

        let pipeline = config.pipeline_config();
        assert_eq!(pipeline.per_job_timeout, Duration::from_secs(90));
        assert_eq!(pipeline.cache_ttl, Duration::from_secs(3600));
        assert_eq!(pipeline.retry.base_delay, Duration::from_millis(500));
    }

    #[test]
    #[serial]
    fn test_env_overrides_pipeline_knobs() {
        clear_env();
        env::set_var("MAX_ATTEMPTS", "5");
        env::set_var("GLOBAL_CONCURRENCY", "1");
        env::set_var("TTS_PROVIDER", "openai");

        let config = Config::from_env().unwrap();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.global_concurrency, 1);
        assert_eq!(config.tts_provider, TtsProvider::OpenAi);

        clear_env();
    }
}
