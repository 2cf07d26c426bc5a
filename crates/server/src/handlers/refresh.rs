//! Refresh endpoint.

use crate::error::ApiResult;
use crate::refresh;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

/// Refresh response.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub message: &'static str,
    pub processed: u64,
    pub inserted: u64,
    pub updated: u64,
}

/// POST /countries/refresh
pub async fn refresh_countries(State(state): State<AppState>) -> ApiResult<Json<RefreshResponse>> {
    let outcome = refresh::run(&state).await?;
    Ok(Json(RefreshResponse {
        message: "Countries refreshed successfully",
        processed: outcome.processed,
        inserted: outcome.inserted,
        updated: outcome.updated,
    }))
}
