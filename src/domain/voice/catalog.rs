use std::collections::HashMap;

use super::model::VoicePersona;

/// Registry of narrator personas.
///
/// Built once at bootstrap from a fixed table; `get` is an O(1) indexed
/// lookup and `list` preserves registration order.
pub struct VoiceCatalog {
    order: Vec<String>,
    by_id: HashMap<String, VoicePersona>,
}

impl VoiceCatalog {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    /// The personas shipped with the product.
    pub fn with_default_voices() -> Self {
        let mut catalog = Self::new();
        catalog.register(VoicePersona::new(
            "morgan_freeman",
            "Morgan Freeman",
            "Wise and authoritative",
            "MF",
        ));
        catalog.register(VoicePersona::new(
            "david_attenborough",
            "David Attenborough",
            "Nature documentary style",
            "DA",
        ));
        catalog.register(VoicePersona::new(
            "oprah_winfrey",
            "Oprah Winfrey",
            "Warm and engaging",
            "OW",
        ));
        catalog.register(VoicePersona::new(
            "barack_obama",
            "Barack Obama",
            "Presidential and inspiring",
            "BO",
        ));
        catalog.register(VoicePersona::new(
            "stephen_hawking",
            "Stephen Hawking",
            "Scientific and thoughtful",
            "SH",
        ));
        catalog
    }

    /// Register a persona. Bootstrap only; last registration wins for a
    /// duplicate id but keeps its original position.
    pub fn register(&mut self, persona: VoicePersona) {
        if self.by_id.insert(persona.id.clone(), persona.clone()).is_none() {
            self.order.push(persona.id);
        }
    }

    /// Personas in registration order.
    pub fn list(&self) -> Vec<VoicePersona> {
        self.order
            .iter()
            .filter_map(|id| self.by_id.get(id))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&VoicePersona> {
        self.by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for VoiceCatalog {
    fn default() -> Self {
        Self::with_default_voices()
    }
}
