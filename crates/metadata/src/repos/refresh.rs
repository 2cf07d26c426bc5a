//! Refresh repository trait: the transactional upsert pass and the global
//! refresh timestamp singleton.

use crate::error::MetadataResult;
use crate::models::{CountryUpsert, RefreshOutcome};
use async_trait::async_trait;
use time::OffsetDateTime;

/// Repository for the refresh pass and its singleton metadata record.
///
/// The global timestamp's setter is deliberately not public: it must move
/// together with the row upserts, so `apply_refresh` performs the update
/// inside the same transaction as its final statement.
#[async_trait]
pub trait RefreshRepo: Send + Sync {
    /// Apply one refresh pass in a single transaction.
    ///
    /// Every row is attempted independently inside a savepoint: a row that
    /// fails (constraint violation, malformed data) is rolled back alone,
    /// logged, and counted as skipped while its siblings proceed. After all
    /// rows, the singleton refresh timestamp is set to `now` and the
    /// transaction commits. Transaction-level failures (connection loss,
    /// commit error) roll back everything and propagate.
    async fn apply_refresh(
        &self,
        rows: &[CountryUpsert],
        now: OffsetDateTime,
    ) -> MetadataResult<RefreshOutcome>;

    /// When the last successful refresh pass ran, if ever.
    ///
    /// Distinct from the per-row `last_refreshed_at`: this is updated once
    /// per pass even when zero rows changed.
    async fn get_refresh_timestamp(&self) -> MetadataResult<Option<OffsetDateTime>>;
}
