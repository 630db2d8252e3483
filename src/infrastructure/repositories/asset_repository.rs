use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("asset storage error: {0}")]
    Storage(String),
}

/// Write-once blob sink for produced audio.
///
/// Content is immutable after `put`; deletion policy belongs to the
/// storage operator, not this service.
#[async_trait]
pub trait AssetRepository: Send + Sync {
    /// Store audio bytes, returning an opaque stable identifier.
    async fn put(&self, bytes: &[u8]) -> Result<String, AssetError>;

    /// Fetch previously stored audio bytes.
    async fn get(&self, asset_id: &str) -> Result<Vec<u8>, AssetError>;
}
