//! Mock upstream client for tests.

use async_trait::async_trait;
use atlas_upstream::{CountryRecord, UpstreamClient, UpstreamError, UpstreamResult};
use std::collections::HashMap;

/// Upstream client backed by fixed data, with injectable failures.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
#[derive(Default)]
pub struct MockUpstream {
    pub countries: Vec<CountryRecord>,
    pub rates: HashMap<String, f64>,
    pub fail_countries: bool,
    pub fail_rates: bool,
}

#[allow(dead_code)]
impl MockUpstream {
    /// Fixed data, no failures.
    pub fn new(countries: Vec<CountryRecord>, rates: HashMap<String, f64>) -> Self {
        Self {
            countries,
            rates,
            fail_countries: false,
            fail_rates: false,
        }
    }

    /// Fail the country fetch.
    pub fn failing_countries() -> Self {
        Self {
            fail_countries: true,
            ..Default::default()
        }
    }

    /// Fail the exchange-rate fetch.
    pub fn failing_rates() -> Self {
        Self {
            fail_rates: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl UpstreamClient for MockUpstream {
    async fn fetch_countries(&self) -> UpstreamResult<Vec<CountryRecord>> {
        if self.fail_countries {
            return Err(UpstreamError::BadResponse {
                service: "restcountries API",
                detail: "injected test failure".to_string(),
            });
        }
        Ok(self.countries.clone())
    }

    async fn fetch_exchange_rates(&self) -> UpstreamResult<HashMap<String, f64>> {
        if self.fail_rates {
            return Err(UpstreamError::BadResponse {
                service: "exchange rate API",
                detail: "injected test failure".to_string(),
            });
        }
        Ok(self.rates.clone())
    }
}
