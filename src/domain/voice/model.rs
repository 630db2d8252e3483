use serde::{Deserialize, Serialize};

/// A narrator persona. Registered once at process start, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoicePersona {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub avatar_glyph: String,
}

impl VoicePersona {
    pub fn new(id: &str, display_name: &str, description: &str, avatar_glyph: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            description: description.to_string(),
            avatar_glyph: avatar_glyph.to_string(),
        }
    }
}
