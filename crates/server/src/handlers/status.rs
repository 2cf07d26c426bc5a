//! Liveness, status, and fallback handlers.

use crate::error::{ApiResult, ErrorResponse};
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Atlas country currency API is running",
    })
}

/// Status response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub total_countries: i64,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_refreshed_at: Option<OffsetDateTime>,
}

/// GET /countries/status
pub async fn get_status(State(state): State<AppState>) -> ApiResult<Json<StatusResponse>> {
    let total_countries = state.store.count().await?;
    let last_refreshed_at = state.store.get_refresh_timestamp().await?;
    Ok(Json(StatusResponse {
        total_countries,
        last_refreshed_at,
    }))
}

/// Fallback for unmatched routes.
pub async fn endpoint_not_found() -> Response {
    let body = ErrorResponse {
        error: "Endpoint not found".to_string(),
        details: None,
    };
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}
