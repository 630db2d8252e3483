pub mod cache;
pub mod error;
pub mod job;
pub mod pipeline;

pub use error::PipelineError;
pub use job::{AudioJobKey, JobState, RetryPolicy};
pub use pipeline::{AudioJobPipeline, AudioJobResult, PipelineConfig};

use serde::{Deserialize, Serialize};

/// Request for POST /api/generate-audio
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateAudioRequest {
    pub article_id: String,
    pub voice_id: String,
    /// Caller wait deadline; the underlying job keeps running past it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

/// Response for POST /api/generate-audio
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateAudioResponse {
    pub success: bool,
    pub audio_url: String,
    pub asset_id: String,
    pub cached: bool,
    pub attempts: u32,
}
