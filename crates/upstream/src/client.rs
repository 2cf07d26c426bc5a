//! HTTP client for the upstream data sources.

use crate::error::{UpstreamError, UpstreamResult};
use crate::types::{CountryRecord, RatesEnvelope};
use async_trait::async_trait;
use atlas_core::config::UpstreamConfig;
use std::collections::HashMap;

const COUNTRIES_SERVICE: &str = "restcountries API";
const RATES_SERVICE: &str = "exchange rate API";

/// Source of the two upstream datasets.
///
/// The two fetches are independent and may run concurrently; the refresh
/// pipeline needs both results before it touches the database.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Fetch the raw country list.
    async fn fetch_countries(&self) -> UpstreamResult<Vec<CountryRecord>>;

    /// Fetch the currency-code-to-rate mapping (rates per one USD).
    async fn fetch_exchange_rates(&self) -> UpstreamResult<HashMap<String, f64>>;
}

/// Production implementation over reqwest.
pub struct HttpUpstreamClient {
    http: reqwest::Client,
    countries_url: String,
    rates_url: String,
}

impl HttpUpstreamClient {
    /// Build a client with the configured endpoints and total request timeout.
    pub fn new(config: &UpstreamConfig) -> UpstreamResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| UpstreamError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            countries_url: config.countries_url.clone(),
            rates_url: config.rates_url.clone(),
        })
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    async fn fetch_countries(&self) -> UpstreamResult<Vec<CountryRecord>> {
        let response = self
            .http
            .get(&self.countries_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| UpstreamError::Unavailable {
                service: COUNTRIES_SERVICE,
                source,
            })?;

        let countries: Vec<CountryRecord> =
            response
                .json()
                .await
                .map_err(|e| UpstreamError::BadResponse {
                    service: COUNTRIES_SERVICE,
                    detail: e.to_string(),
                })?;

        tracing::debug!(count = countries.len(), "fetched country records");
        Ok(countries)
    }

    async fn fetch_exchange_rates(&self) -> UpstreamResult<HashMap<String, f64>> {
        let response = self
            .http
            .get(&self.rates_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| UpstreamError::Unavailable {
                service: RATES_SERVICE,
                source,
            })?;

        let envelope: RatesEnvelope =
            response
                .json()
                .await
                .map_err(|e| UpstreamError::BadResponse {
                    service: RATES_SERVICE,
                    detail: e.to_string(),
                })?;

        tracing::debug!(count = envelope.rates.len(), "fetched exchange rates");
        Ok(envelope.rates)
    }
}
