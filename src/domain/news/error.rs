use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum NewsStoreError {
    #[error("article not found: {0}")]
    NotFound(String),
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<NewsStoreError> for AppError {
    fn from(err: NewsStoreError) -> Self {
        match err {
            NewsStoreError::NotFound(msg) => AppError::NotFound(msg),
            NewsStoreError::Dependency(msg) => AppError::ExternalService(msg),
            NewsStoreError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
