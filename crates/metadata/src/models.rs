//! Database models mapping to the metadata schema.

use sqlx::FromRow;
use time::OffsetDateTime;

/// Persisted country record.
///
/// `name` is unique case-insensitively; "France" and "france" are the same
/// row. `exchange_rate` and `estimated_gdp` are NULL when the country's
/// currency had no known rate at the last refresh.
#[derive(Debug, Clone, FromRow)]
pub struct CountryRow {
    pub id: i64,
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: Option<f64>,
    pub flag_url: Option<String>,
    pub last_refreshed_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

/// Write payload for one country during a refresh pass.
///
/// Timestamps are supplied by the store at write time; the id is resolved by
/// the case-insensitive name lookup.
#[derive(Debug, Clone)]
pub struct CountryUpsert {
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: Option<f64>,
    pub flag_url: Option<String>,
}

/// Filters and ordering for country listings. Filters compose with AND.
#[derive(Debug, Clone, Default)]
pub struct CountryFilter {
    /// Case-insensitive exact region match.
    pub region: Option<String>,
    /// Exact currency code match; callers uppercase the input.
    pub currency_code: Option<String>,
    pub sort: SortOrder,
}

/// Listing sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Lexicographic by name, ascending.
    #[default]
    NameAsc,
    /// Estimated GDP descending, unknown GDP last.
    GdpDesc,
    /// Estimated GDP ascending, unknown GDP last.
    GdpAsc,
}

impl SortOrder {
    /// Parse a query-string sort value. Unrecognized values fall back to
    /// name order.
    pub fn parse(value: &str) -> Self {
        match value {
            "gdp_desc" => SortOrder::GdpDesc,
            "gdp_asc" => SortOrder::GdpAsc,
            _ => SortOrder::NameAsc,
        }
    }
}

/// Counters reported by one refresh pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// Rows that were successfully inserted or updated.
    pub processed: u64,
    pub inserted: u64,
    pub updated: u64,
    /// Rows dropped by row-level failure isolation.
    pub skipped: u64,
}
