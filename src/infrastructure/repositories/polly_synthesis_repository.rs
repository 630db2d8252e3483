use super::synthesis_repository::{SynthesisError, SynthesisRepository};
use crate::domain::voice::VoicePersona;
use async_trait::async_trait;
use aws_sdk_polly::{
    error::{ProvideErrorMetadata, SdkError},
    operation::synthesize_speech::SynthesizeSpeechError,
    types::{Engine, OutputFormat, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

/// AWS Polly has a limit of 3000 characters per request
const MAX_BATCH_SIZE: usize = 3000;

/// AWS Polly implementation of the synthesis gateway
pub struct PollySynthesisRepository {
    polly_client: Arc<PollyClient>,
}

impl PollySynthesisRepository {
    pub fn new(polly_client: Arc<PollyClient>) -> Self {
        Self { polly_client }
    }

    /// Map a narrator persona to the closest neural Polly voice
    fn get_voice_for_persona(persona_id: &str) -> &'static str {
        match persona_id {
            "morgan_freeman" => "Matthew",
            "david_attenborough" => "Brian",
            "oprah_winfrey" => "Joanna",
            "barack_obama" => "Gregory",
            "stephen_hawking" => "Stephen",
            _ => "Matthew",
        }
    }

    /// Call AWS Polly to synthesize a single text batch
    async fn call_polly(&self, text: &str, voice_name: &str) -> Result<Vec<u8>, SynthesisError> {
        let voice_id = VoiceId::from(voice_name);
        let engine = Engine::Neural;

        tracing::info!(
            voice = voice_name,
            engine = ?engine,
            output_format = "Mp3",
            text_length = text.len(),
            text_preview = &text[..text.len().min(200)],
            "Calling AWS Polly synthesize_speech"
        );

        let result = self
            .polly_client
            .synthesize_speech()
            .text(text)
            .voice_id(voice_id)
            .output_format(OutputFormat::Mp3)
            .engine(engine)
            .send()
            .await
            .map_err(classify_polly_error)?;

        tracing::debug!("AWS Polly synthesize_speech successful, reading audio stream");

        // A broken audio stream is a network-level failure
        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            SynthesisError::Transient(format!("failed to read audio stream: {e}"))
        })?;

        let audio_bytes = audio_stream.into_bytes().to_vec();
        tracing::debug!(
            audio_size = audio_bytes.len(),
            "Audio stream collected successfully"
        );

        Ok(audio_bytes)
    }

    /// Synthesize multiple text batches and merge the audio results in order
    async fn synthesize_batches(
        &self,
        batches: &[String],
        voice_name: &str,
    ) -> Result<Vec<u8>, SynthesisError> {
        let mut merged_audio = Vec::new();

        for (index, batch) in batches.iter().enumerate() {
            tracing::info!(
                batch_index = index,
                batch_size = batch.len(),
                "Synthesizing batch"
            );

            let audio_data = self.call_polly(batch, voice_name).await?;
            merged_audio.extend(audio_data);

            tracing::info!(
                batch_index = index,
                total_audio_size = merged_audio.len(),
                "Batch synthesized and merged"
            );
        }

        Ok(merged_audio)
    }
}

/// Sort Polly failures into retryable and terminal buckets.
/// Throttling, 5xx, and transport problems are transient; validation
/// failures are permanent.
fn classify_polly_error(err: SdkError<SynthesizeSpeechError>) -> SynthesisError {
    match &err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            SynthesisError::Transient(format!("AWS Polly transport error: {err}"))
        }
        SdkError::ServiceError(ctx) => {
            let code = ctx.err().code().unwrap_or("");
            let status = ctx.raw().status().as_u16();
            let throttled = code == "ThrottlingException" || status == 429;
            let server_side = matches!(ctx.err(), SynthesizeSpeechError::ServiceFailureException(_))
                || status >= 500;

            if throttled || server_side {
                SynthesisError::Transient(format!("AWS Polly error ({code}, status {status})"))
            } else {
                SynthesisError::Permanent(format!("AWS Polly rejected request ({code}, status {status})"))
            }
        }
        _ => SynthesisError::Permanent(format!("AWS Polly request could not be built: {err}")),
    }
}

#[async_trait]
impl SynthesisRepository for PollySynthesisRepository {
    async fn synthesize(
        &self,
        text: &str,
        voice: &VoicePersona,
    ) -> Result<Vec<u8>, SynthesisError> {
        let start_time = std::time::Instant::now();
        let voice_name = Self::get_voice_for_persona(&voice.id);

        // Split text into batches based on Polly's limitations
        let batches = super::batching::split_into_batches(text, MAX_BATCH_SIZE);
        tracing::info!(
            persona = %voice.id,
            voice = voice_name,
            batch_count = batches.len(),
            text_length = text.len(),
            "Text split into batches"
        );

        // Synthesize each batch and merge results
        let audio_data = self.synthesize_batches(&batches, voice_name).await?;

        let duration = start_time.elapsed();
        tracing::info!(
            provider = "polly",
            persona = %voice.id,
            voice = voice_name,
            latency_ms = duration.as_millis() as u64,
            characters_count = text.len(),
            batch_count = batches.len(),
            audio_size_bytes = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(audio_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_voice_mapping_covers_catalog() {
        for persona in crate::domain::voice::VoiceCatalog::with_default_voices().list() {
            let voice = PollySynthesisRepository::get_voice_for_persona(&persona.id);
            assert!(!voice.is_empty(), "no Polly voice for {}", persona.id);
        }
    }

    #[test]
    fn test_unknown_persona_falls_back() {
        assert_eq!(
            PollySynthesisRepository::get_voice_for_persona("somebody_else"),
            "Matthew"
        );
    }
}
