use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::audio::PipelineError;

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Synthesis rejected: {0}")]
    SynthesisRejected(String),

    #[error("Synthesis unavailable: {0}")]
    SynthesisUnavailable(String),

    #[error("Synthesis timed out")]
    SynthesisTimeout,

    #[error("Request timed out waiting for audio")]
    Timeout,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error envelope returned to clients. The `success` flag mirrors the
/// success responses so clients can branch on a single field.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::SynthesisRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::SynthesisUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::SynthesisTimeout | Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Storage(_) => StatusCode::BAD_GATEWAY,
            Self::ExternalService(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            success: false,
            error: self.to_string(),
        }
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidRequest(msg) => AppError::NotFound(msg),
            PipelineError::SynthesisRejected(msg) => AppError::SynthesisRejected(msg),
            PipelineError::SynthesisUnavailable(msg) => AppError::SynthesisUnavailable(msg),
            PipelineError::SynthesisTimeout => AppError::SynthesisTimeout,
            PipelineError::Timeout => AppError::Timeout,
            PipelineError::StorageFailure(msg) => AppError::Storage(msg),
        }
    }
}

/// Implement IntoResponse for automatic conversion in handlers
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error
        let status = self.status_code();
        tracing::error!(
            error = %self,
            status = %status.as_u16(),
            "Request failed"
        );

        let error_response = self.to_response();

        (status, Json(error_response)).into_response()
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
