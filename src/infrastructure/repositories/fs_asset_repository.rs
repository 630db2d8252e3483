use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use super::asset_repository::{AssetError, AssetRepository};

/// Filesystem implementation of the asset sink: one `{uuid}.mp3` per
/// stored asset under the configured audio directory.
pub struct FsAssetRepository {
    dir: PathBuf,
}

impl FsAssetRepository {
    /// Create the repository, ensuring the audio directory exists.
    pub async fn create(dir: PathBuf) -> Result<Self, AssetError> {
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AssetError::Storage(format!("cannot create audio dir: {e}")))?;
        Ok(Self { dir })
    }

    fn path_for(&self, asset_id: &Uuid) -> PathBuf {
        self.dir.join(format!("{asset_id}.mp3"))
    }
}

#[async_trait]
impl AssetRepository for FsAssetRepository {
    async fn put(&self, bytes: &[u8]) -> Result<String, AssetError> {
        let asset_id = Uuid::new_v4();
        let path = self.path_for(&asset_id);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AssetError::Storage(format!("write {}: {e}", path.display())))?;

        tracing::debug!(
            asset_id = %asset_id,
            size_bytes = bytes.len(),
            "Audio asset stored"
        );
        Ok(asset_id.to_string())
    }

    async fn get(&self, asset_id: &str) -> Result<Vec<u8>, AssetError> {
        // Ids are always UUIDs we minted; anything else is both unknown
        // and a path-traversal attempt.
        let parsed = Uuid::parse_str(asset_id)
            .map_err(|_| AssetError::NotFound(asset_id.to_string()))?;

        match tokio::fs::read(self.path_for(&parsed)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AssetError::NotFound(asset_id.to_string()))
            }
            Err(e) => Err(AssetError::Storage(format!("read {asset_id}: {e}"))),
        }
    }
}
