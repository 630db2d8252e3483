use axum::{extract::State, Json};
use std::sync::Arc;

use crate::domain::voice::{VoiceCatalog, VoicesResponse};
use crate::error::AppResult;

pub struct VoicesController {
    catalog: Arc<VoiceCatalog>,
}

impl VoicesController {
    pub fn new(catalog: Arc<VoiceCatalog>) -> Self {
        Self { catalog }
    }

    /// GET /api/voices - List narrator personas
    pub async fn list_voices(
        State(controller): State<Arc<VoicesController>>,
    ) -> AppResult<Json<VoicesResponse>> {
        Ok(Json(VoicesResponse {
            success: true,
            voices: controller.catalog.list(),
        }))
    }
}
