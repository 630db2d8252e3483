use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};

use crate::domain::audio::{AudioJobPipeline, GenerateAudioRequest, GenerateAudioResponse};
use crate::error::{AppError, AppResult};
use crate::infrastructure::repositories::{AssetError, AssetRepository};

pub struct AudioController {
    pipeline: Arc<AudioJobPipeline>,
    assets: Arc<dyn AssetRepository>,
}

impl AudioController {
    pub fn new(pipeline: Arc<AudioJobPipeline>, assets: Arc<dyn AssetRepository>) -> Self {
        Self { pipeline, assets }
    }

    /// POST /api/generate-audio - Narrate an article with a persona
    pub async fn generate_audio(
        State(controller): State<Arc<AudioController>>,
        Json(request): Json<GenerateAudioRequest>,
    ) -> AppResult<Json<GenerateAudioResponse>> {
        if request.article_id.trim().is_empty() || request.voice_id.trim().is_empty() {
            return Err(AppError::BadRequest(
                "article_id and voice_id are required".to_string(),
            ));
        }

        let caller_timeout = request.timeout_ms.map(Duration::from_millis);

        let result = controller
            .pipeline
            .request_audio(&request.article_id, &request.voice_id, caller_timeout)
            .await
            .map_err(AppError::from)?;

        Ok(Json(GenerateAudioResponse {
            success: true,
            audio_url: format!("/api/download-audio/{}", result.asset_id),
            asset_id: result.asset_id,
            cached: result.cached,
            attempts: result.attempts,
        }))
    }

    /// GET /api/download-audio/{assetId} (also mounted at /audio/{assetId})
    pub async fn download_audio(
        State(controller): State<Arc<AudioController>>,
        Path(asset_id): Path<String>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let bytes = controller
            .assets
            .get(&asset_id)
            .await
            .map_err(|e| match e {
                AssetError::NotFound(id) => AppError::NotFound(format!("audio asset '{id}'")),
                AssetError::Storage(msg) => AppError::Storage(msg),
            })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("audio/mpeg"),
        );
        headers.insert(
            header::CACHE_CONTROL,
            // Assets are immutable once written.
            header::HeaderValue::from_static("public, max-age=86400, immutable"),
        );

        Ok((StatusCode::OK, headers, Body::from(bytes)))
    }
}
