//! Country store trait and SQLite implementation.

use crate::error::MetadataResult;
use crate::repos::{CountryRepo, RefreshRepo};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Combined country store trait.
#[async_trait]
pub trait CountryStore: CountryRepo + RefreshRepo + Send + Sync {
    /// Create the schema and seed the refresh singleton, idempotently.
    async fn migrate(&self) -> MetadataResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> MetadataResult<()>;
}

/// SQLite-based country store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Create a new SQLite store.
    pub async fn new(path: impl AsRef<Path>) -> MetadataResult<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            // Prevent transient "database is locked" errors under concurrent access.
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // SQLite permits limited write concurrency; a single connection
            // avoids "database is locked" failures under axum concurrency.
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl CountryStore for SqliteStore {
    async fn migrate(&self) -> MetadataResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// ORDER BY clause for a listing. NULL GDP sorts last in both directions;
/// SQLite and PostgreSQL disagree on default NULL placement, so it is
/// always spelled out.
pub(crate) fn order_clause(sort: crate::models::SortOrder) -> &'static str {
    use crate::models::SortOrder;
    match sort {
        SortOrder::NameAsc => " ORDER BY LOWER(name) ASC",
        SortOrder::GdpDesc => " ORDER BY estimated_gdp DESC NULLS LAST, LOWER(name) ASC",
        SortOrder::GdpAsc => " ORDER BY estimated_gdp ASC NULLS LAST, LOWER(name) ASC",
    }
}

// Implement the repository traits for SqliteStore
mod sqlite_impl {
    use super::*;
    use crate::models::{CountryFilter, CountryRow, CountryUpsert, RefreshOutcome};
    use sqlx::{Acquire, Transaction};
    use time::OffsetDateTime;

    enum UpsertKind {
        Inserted,
        Updated,
    }

    /// Insert-or-update one country inside the given (savepoint) transaction.
    async fn upsert_country(
        tx: &mut Transaction<'_, Sqlite>,
        row: &CountryUpsert,
        now: OffsetDateTime,
    ) -> MetadataResult<UpsertKind> {
        let existing: Option<i64> =
            sqlx::query_scalar("SELECT id FROM countries WHERE LOWER(name) = LOWER(?)")
                .bind(&row.name)
                .fetch_optional(&mut **tx)
                .await?;

        match existing {
            Some(id) => {
                sqlx::query(
                    r#"
                    UPDATE countries
                    SET capital = ?, region = ?, population = ?,
                        currency_code = ?, exchange_rate = ?, estimated_gdp = ?,
                        flag_url = ?, last_refreshed_at = ?
                    WHERE id = ?
                    "#,
                )
                .bind(&row.capital)
                .bind(&row.region)
                .bind(row.population)
                .bind(&row.currency_code)
                .bind(row.exchange_rate)
                .bind(row.estimated_gdp)
                .bind(&row.flag_url)
                .bind(now)
                .bind(id)
                .execute(&mut **tx)
                .await?;
                Ok(UpsertKind::Updated)
            }
            None => {
                sqlx::query(
                    r#"
                    INSERT INTO countries (
                        name, capital, region, population, currency_code,
                        exchange_rate, estimated_gdp, flag_url,
                        last_refreshed_at, created_at
                    )
                    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(&row.name)
                .bind(&row.capital)
                .bind(&row.region)
                .bind(row.population)
                .bind(&row.currency_code)
                .bind(row.exchange_rate)
                .bind(row.estimated_gdp)
                .bind(&row.flag_url)
                .bind(now)
                .bind(now)
                .execute(&mut **tx)
                .await?;
                Ok(UpsertKind::Inserted)
            }
        }
    }

    #[async_trait]
    impl CountryRepo for SqliteStore {
        async fn find_by_name(&self, name: &str) -> MetadataResult<Option<CountryRow>> {
            let row = sqlx::query_as::<_, CountryRow>(
                "SELECT * FROM countries WHERE LOWER(name) = LOWER(?)",
            )
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        }

        async fn list(&self, filter: &CountryFilter) -> MetadataResult<Vec<CountryRow>> {
            let mut sql = String::from("SELECT * FROM countries");
            let mut clauses = Vec::new();
            if filter.region.is_some() {
                clauses.push("LOWER(region) = LOWER(?)");
            }
            if filter.currency_code.is_some() {
                clauses.push("currency_code = ?");
            }
            if !clauses.is_empty() {
                sql.push_str(" WHERE ");
                sql.push_str(&clauses.join(" AND "));
            }
            sql.push_str(order_clause(filter.sort));

            let mut query = sqlx::query_as::<_, CountryRow>(&sql);
            if let Some(region) = &filter.region {
                query = query.bind(region);
            }
            if let Some(code) = &filter.currency_code {
                query = query.bind(code);
            }

            let rows = query.fetch_all(&self.pool).await?;
            Ok(rows)
        }

        async fn delete_by_name(&self, name: &str) -> MetadataResult<bool> {
            let result = sqlx::query("DELETE FROM countries WHERE LOWER(name) = LOWER(?)")
                .bind(name)
                .execute(&self.pool)
                .await?;
            Ok(result.rows_affected() > 0)
        }

        async fn count(&self) -> MetadataResult<i64> {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM countries")
                .fetch_one(&self.pool)
                .await?;
            Ok(count)
        }
    }

    #[async_trait]
    impl RefreshRepo for SqliteStore {
        async fn apply_refresh(
            &self,
            rows: &[CountryUpsert],
            now: OffsetDateTime,
        ) -> MetadataResult<RefreshOutcome> {
            let mut tx = self.pool.begin().await?;
            let mut outcome = RefreshOutcome::default();

            for row in rows {
                // Savepoint per row: a failed row rolls back alone and must
                // not poison the enclosing transaction.
                let mut sp = tx.begin().await?;
                match upsert_country(&mut sp, row, now).await {
                    Ok(UpsertKind::Inserted) => {
                        sp.commit().await?;
                        outcome.inserted += 1;
                        outcome.processed += 1;
                    }
                    Ok(UpsertKind::Updated) => {
                        sp.commit().await?;
                        outcome.updated += 1;
                        outcome.processed += 1;
                    }
                    Err(e) => {
                        sp.rollback().await?;
                        tracing::warn!(country = %row.name, error = %e, "skipping country row");
                        outcome.skipped += 1;
                    }
                }
            }

            sqlx::query("UPDATE refresh_state SET last_refreshed_at = ? WHERE id = 1")
                .bind(now)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
            Ok(outcome)
        }

        async fn get_refresh_timestamp(&self) -> MetadataResult<Option<OffsetDateTime>> {
            // Option<Option<..>> distinguishes a missing row from a NULL value.
            let value: Option<Option<OffsetDateTime>> =
                sqlx::query_scalar("SELECT last_refreshed_at FROM refresh_state WHERE id = 1")
                    .fetch_optional(&self.pool)
                    .await?;
            Ok(value.flatten())
        }
    }
}

/// SQLite schema (idempotent).
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS countries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL COLLATE NOCASE UNIQUE,
    capital TEXT,
    region TEXT,
    population INTEGER NOT NULL DEFAULT 0 CHECK (population >= 0),
    currency_code TEXT,
    exchange_rate REAL,
    estimated_gdp REAL,
    flag_url TEXT,
    last_refreshed_at TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_countries_region ON countries(region);
CREATE INDEX IF NOT EXISTS idx_countries_currency ON countries(currency_code);

CREATE TABLE IF NOT EXISTS refresh_state (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    last_refreshed_at TEXT
);

INSERT OR IGNORE INTO refresh_state (id, last_refreshed_at) VALUES (1, NULL);
"#;
