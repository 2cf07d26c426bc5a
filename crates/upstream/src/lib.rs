//! Upstream data source clients for Atlas.
//!
//! Two independent public APIs feed the refresh pipeline: restcountries v2
//! for country metadata and open.er-api.com for USD exchange rates. Both
//! sit behind the [`UpstreamClient`] trait so tests can substitute fixed
//! data or injected failures.

pub mod client;
pub mod error;
pub mod types;

pub use client::{HttpUpstreamClient, UpstreamClient};
pub use error::{UpstreamError, UpstreamResult};
pub use types::{CountryRecord, CurrencyEntry, RatesEnvelope};
