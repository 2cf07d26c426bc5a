//! Country repository trait.

use crate::error::MetadataResult;
use crate::models::{CountryFilter, CountryRow};
use async_trait::async_trait;

/// Repository for persisted country rows.
///
/// All name matching is case-insensitive exact match; implementations
/// normalize with `LOWER()` on both sides.
#[async_trait]
pub trait CountryRepo: Send + Sync {
    /// Look up a country by name.
    async fn find_by_name(&self, name: &str) -> MetadataResult<Option<CountryRow>>;

    /// List countries matching the filter, in the filter's sort order.
    async fn list(&self, filter: &CountryFilter) -> MetadataResult<Vec<CountryRow>>;

    /// Delete a country by name. Returns whether a row was removed; a miss
    /// is `false`, not an error.
    async fn delete_by_name(&self, name: &str) -> MetadataResult<bool>;

    /// Total number of country rows.
    async fn count(&self) -> MetadataResult<i64>;
}
