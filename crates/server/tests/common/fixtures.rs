//! Shared fixture builders.

use atlas_metadata::models::CountryUpsert;
use atlas_upstream::{CountryRecord, CurrencyEntry};
use time::macros::datetime;
use time::OffsetDateTime;

/// A fixed whole-second timestamp; round-trips exactly through both backends.
#[allow(dead_code)]
pub fn test_now() -> OffsetDateTime {
    datetime!(2026-01-15 12:00:00 UTC)
}

/// A later fixed timestamp for second-pass assertions.
#[allow(dead_code)]
pub fn test_later() -> OffsetDateTime {
    datetime!(2026-01-16 12:00:00 UTC)
}

/// Build an upstream country record.
#[allow(dead_code)]
pub fn country_record(name: &str, population: u64, codes: &[&str]) -> CountryRecord {
    CountryRecord {
        name: name.to_string(),
        capital: Some(format!("{name} City")),
        region: Some("Test Region".to_string()),
        population,
        flag: Some(format!("https://flags.example/{name}.svg")),
        currencies: codes
            .iter()
            .map(|code| CurrencyEntry {
                code: Some(code.to_string()),
                name: None,
                symbol: None,
            })
            .collect(),
    }
}

/// Build a store-level upsert payload.
#[allow(dead_code)]
pub fn upsert(name: &str, population: i64, gdp: Option<f64>) -> CountryUpsert {
    CountryUpsert {
        name: name.to_string(),
        capital: Some(format!("{name} City")),
        region: Some("Test Region".to_string()),
        population,
        currency_code: Some("TST".to_string()),
        exchange_rate: gdp.map(|_| 2.0),
        estimated_gdp: gdp,
        flag_url: None,
    }
}
