//! Country read and delete endpoints.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use atlas_metadata::models::{CountryFilter, CountryRow, SortOrder};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Country as presented to callers.
#[derive(Debug, Serialize)]
pub struct CountryResponse {
    pub id: i64,
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: Option<f64>,
    pub flag_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub last_refreshed_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<CountryRow> for CountryResponse {
    fn from(row: CountryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            capital: row.capital,
            region: row.region,
            population: row.population,
            currency_code: row.currency_code,
            exchange_rate: row.exchange_rate,
            estimated_gdp: row.estimated_gdp,
            flag_url: row.flag_url,
            last_refreshed_at: row.last_refreshed_at,
            created_at: row.created_at,
        }
    }
}

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub region: Option<String>,
    pub currency: Option<String>,
    pub sort: Option<String>,
}

/// Trim an optional query parameter, dropping it when blank.
fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// GET /countries
pub async fn list_countries(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<CountryResponse>>> {
    let filter = CountryFilter {
        region: normalize(params.region),
        currency_code: normalize(params.currency).map(|c| c.to_uppercase()),
        sort: params
            .sort
            .as_deref()
            .map(SortOrder::parse)
            .unwrap_or_default(),
    };

    let rows = state.store.list(&filter).await?;
    Ok(Json(rows.into_iter().map(CountryResponse::from).collect()))
}

/// GET /countries/{name}
pub async fn get_country(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<CountryResponse>> {
    let row = state
        .store
        .find_by_name(name.trim())
        .await?
        .ok_or_else(|| ApiError::NotFound("Country not found".to_string()))?;
    Ok(Json(row.into()))
}

/// Message-only response body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// DELETE /countries/{name}
pub async fn delete_country(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = state.store.delete_by_name(name.trim()).await?;
    if !deleted {
        return Err(ApiError::NotFound("Country not found".to_string()));
    }
    Ok(Json(MessageResponse {
        message: "Country deleted successfully",
    }))
}
