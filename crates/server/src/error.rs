//! API error types.

use atlas_metadata::MetadataError;
use atlas_upstream::UpstreamError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Headline for the caller.
    pub error: String,
    /// Detail string, when one adds anything to the headline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),
}

impl ApiError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Metadata(e) => match e {
                MetadataError::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Headline shown to the caller.
    fn headline(&self) -> String {
        match self {
            Self::NotFound(msg) => msg.clone(),
            Self::Metadata(MetadataError::NotFound(msg)) => msg.clone(),
            Self::Upstream(_) => "External data source unavailable".to_string(),
            _ => "Internal server error".to_string(),
        }
    }

    /// Detail string, omitted when the headline already says everything.
    fn details(&self) -> Option<String> {
        match self {
            Self::NotFound(_) => None,
            Self::Metadata(MetadataError::NotFound(_)) => None,
            other => Some(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.headline(),
            details: self.details(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
