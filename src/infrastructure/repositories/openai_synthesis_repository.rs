use super::synthesis_repository::{SynthesisError, SynthesisRepository};
use crate::domain::voice::VoicePersona;
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{CreateSpeechRequest, SpeechModel, Voice},
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;

/// OpenAI has a limit of 4096 characters per request
const MAX_BATCH_SIZE: usize = 4096;

/// OpenAI TTS implementation of the synthesis gateway
pub struct OpenAiSynthesisRepository {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
}

impl OpenAiSynthesisRepository {
    pub fn new(client: Arc<Client<OpenAIConfig>>, model: String) -> Self {
        Self { client, model }
    }

    /// Map a narrator persona to the closest OpenAI voice
    fn get_voice_for_persona(persona_id: &str) -> Voice {
        match persona_id {
            "morgan_freeman" => Voice::Onyx,
            "david_attenborough" => Voice::Fable,
            "oprah_winfrey" => Voice::Nova,
            "barack_obama" => Voice::Echo,
            "stephen_hawking" => Voice::Alloy,
            _ => Voice::Alloy,
        }
    }

    /// Call OpenAI TTS API to synthesize a single text batch
    async fn call_openai(&self, text: &str, voice: Voice) -> Result<Vec<u8>, SynthesisError> {
        tracing::info!(
            model = %self.model,
            voice = ?voice,
            text_length = text.len(),
            text_preview = &text[..text.len().min(200)],
            "Calling OpenAI TTS API"
        );

        let model = match self.model.as_str() {
            "tts-1" => SpeechModel::Tts1,
            "tts-1-hd" => SpeechModel::Tts1Hd,
            other => SpeechModel::Other(other.to_string()),
        };

        let request = CreateSpeechRequest {
            model,
            input: text.to_string(),
            voice,
            response_format: None, // Defaults to MP3
            speed: None,           // Defaults to 1.0
        };

        let response = self
            .client
            .audio()
            .speech(request)
            .await
            .map_err(classify_openai_error)?;

        let audio_bytes = response.bytes.to_vec();
        tracing::debug!(
            audio_size = audio_bytes.len(),
            "OpenAI TTS audio received successfully"
        );

        Ok(audio_bytes)
    }

    /// Synthesize multiple text batches and merge the audio results in order
    async fn synthesize_batches(
        &self,
        batches: &[String],
        voice: Voice,
    ) -> Result<Vec<u8>, SynthesisError> {
        let mut merged_audio = Vec::new();

        for (index, batch) in batches.iter().enumerate() {
            tracing::info!(
                batch_index = index,
                batch_size = batch.len(),
                "Synthesizing batch"
            );

            let audio_data = self.call_openai(batch, voice.clone()).await?;
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

/// Network and rate-limit problems are transient; everything the API
/// refuses outright is permanent.
fn classify_openai_error(err: OpenAIError) -> SynthesisError {
    match &err {
        OpenAIError::Reqwest(_) | OpenAIError::StreamError(_) => {
            SynthesisError::Transient(format!("OpenAI TTS transport error: {err}"))
        }
        OpenAIError::ApiError(api) => {
            let kind = api.r#type.as_deref().unwrap_or("");
            if kind.contains("rate_limit") || kind.contains("server_error") {
                SynthesisError::Transient(format!("OpenAI TTS error: {}", api.message))
            } else {
                SynthesisError::Permanent(format!("OpenAI TTS rejected request: {}", api.message))
            }
        }
        _ => SynthesisError::Permanent(format!("OpenAI TTS error: {err}")),
    }
}

#[async_trait]
impl SynthesisRepository for OpenAiSynthesisRepository {
    async fn synthesize(
        &self,
        text: &str,
        voice: &VoicePersona,
    ) -> Result<Vec<u8>, SynthesisError> {
        let start_time = std::time::Instant::now();
        let openai_voice = Self::get_voice_for_persona(&voice.id);

        // Split text into batches based on OpenAI's limitations
        let batches = super::batching::split_into_batches(text, MAX_BATCH_SIZE);
        tracing::info!(
            persona = %voice.id,
            voice = ?openai_voice,
            model = %self.model,
            batch_count = batches.len(),
            text_length = text.len(),
            "Text split into batches"
        );

        // Synthesize each batch and merge results
        let audio_data = self.synthesize_batches(&batches, openai_voice).await?;

        let duration = start_time.elapsed();
        tracing::info!(
            provider = "openai",
            persona = %voice.id,
            model = %self.model,
            latency_ms = duration.as_millis() as u64,
            characters_count = text.len(),
            batch_count = batches.len(),
            audio_size_bytes = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(audio_data)
    }
}
