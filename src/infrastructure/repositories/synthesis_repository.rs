use crate::domain::voice::VoicePersona;
use async_trait::async_trait;

/// Why a synthesis call failed, from the pipeline's point of view.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SynthesisError {
    /// Worth retrying: timeout, throttling, 5xx-equivalent.
    #[error("transient synthesis error: {0}")]
    Transient(String),
    /// Will not succeed on retry: invalid input, unsupported voice,
    /// account quota exhausted.
    #[error("permanent synthesis error: {0}")]
    Permanent(String),
}

/// Gateway for TTS synthesis.
/// Abstracts the underlying provider (AWS Polly, OpenAI, ...)
///
/// Implementations are responsible for:
/// - Handling provider-specific text length limitations
/// - Splitting text into batches if needed
/// - Merging audio chunks into a single audio stream
/// - Mapping a narrator persona to a provider voice
/// - Classifying provider failures as transient or permanent
#[async_trait]
pub trait SynthesisRepository: Send + Sync {
    /// Synthesize narration audio for a persona.
    ///
    /// Returns merged audio data ready for playback (MP3 format)
    async fn synthesize(&self, text: &str, voice: &VoicePersona)
        -> Result<Vec<u8>, SynthesisError>;
}
