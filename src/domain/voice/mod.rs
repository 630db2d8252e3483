pub mod catalog;
pub mod model;

pub use catalog::VoiceCatalog;
pub use model::VoicePersona;

use serde::Serialize;

/// Response for GET /api/voices
#[derive(Debug, Serialize)]
pub struct VoicesResponse {
    pub success: bool,
    pub voices: Vec<VoicePersona>,
}
