//! Summary image endpoint.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use std::io::ErrorKind;

/// GET /countries/image
///
/// Serves the PNG generated after the most recent refresh; 404 until the
/// first successful refresh has produced one.
pub async fn get_summary_image(State(state): State<AppState>) -> ApiResult<Response> {
    let path = &state.config.summary.output_path;
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, "image/png")], bytes).into_response()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(ApiError::NotFound("Summary image not found".to_string()))
        }
        Err(e) => Err(ApiError::Internal(format!(
            "failed to read summary image: {e}"
        ))),
    }
}
