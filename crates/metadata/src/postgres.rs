//! PostgreSQL-based country store implementation.

use crate::error::MetadataResult;
use crate::models::{CountryFilter, CountryRow, CountryUpsert, RefreshOutcome};
use crate::repos::{CountryRepo, RefreshRepo};
use crate::store::{order_clause, CountryStore};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Acquire, Pool, Postgres, Transaction};
use std::str::FromStr;
use time::OffsetDateTime;

/// PostgreSQL schema (embedded).
const POSTGRES_SCHEMA: &str = include_str!("postgres_schema.sql");

fn postgres_schema_statements(schema: &str) -> Vec<&str> {
    schema
        .split(';')
        .filter_map(|statement| {
            let trimmed = statement.trim();
            if trimmed.is_empty() {
                return None;
            }
            let has_sql = trimmed.lines().any(|line| {
                let line = line.trim();
                !line.is_empty() && !line.starts_with("--")
            });
            has_sql.then_some(trimmed)
        })
        .collect()
}

/// PostgreSQL-based country store.
pub struct PostgresStore {
    pool: Pool<Postgres>,
}

impl PostgresStore {
    /// Create a new PostgreSQL store from a connection URL.
    pub async fn from_url(url: &str, max_connections: u32) -> MetadataResult<Self> {
        let opts = PgConnectOptions::from_str(url)?;
        Self::connect(opts, max_connections).await
    }

    /// Create a new PostgreSQL store from individual connection parameters.
    ///
    /// This allows credentials to be passed separately, enabling better
    /// secret management (e.g., passwords via environment variables).
    pub async fn from_params(
        host: &str,
        port: u16,
        username: Option<&str>,
        password: Option<&str>,
        database: &str,
        max_connections: u32,
    ) -> MetadataResult<Self> {
        let mut opts = PgConnectOptions::new()
            .host(host)
            .port(port)
            .database(database);

        if let Some(user) = username {
            opts = opts.username(user);
        }

        if let Some(pass) = password {
            opts = opts.password(pass);
        }

        // Log connection info without the password
        tracing::info!(
            host = host,
            port = port,
            database = database,
            username = username.unwrap_or("<none>"),
            "Connecting to PostgreSQL"
        );

        Self::connect(opts, max_connections).await
    }

    async fn connect(opts: PgConnectOptions, max_connections: u32) -> MetadataResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

#[async_trait]
impl CountryStore for PostgresStore {
    async fn migrate(&self) -> MetadataResult<()> {
        // PostgreSQL doesn't allow multiple statements in a single prepared
        // statement, so the schema is split and executed one at a time.
        for statement in postgres_schema_statements(POSTGRES_SCHEMA) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

enum UpsertKind {
    Inserted,
    Updated,
}

/// Insert-or-update one country inside the given (savepoint) transaction.
async fn upsert_country(
    tx: &mut Transaction<'_, Postgres>,
    row: &CountryUpsert,
    now: OffsetDateTime,
) -> MetadataResult<UpsertKind> {
    let existing: Option<i64> =
        sqlx::query_scalar("SELECT id FROM countries WHERE LOWER(name) = LOWER($1)")
            .bind(&row.name)
            .fetch_optional(&mut **tx)
            .await?;

    match existing {
        Some(id) => {
            sqlx::query(
                r#"
                UPDATE countries
                SET capital = $1, region = $2, population = $3,
                    currency_code = $4, exchange_rate = $5, estimated_gdp = $6,
                    flag_url = $7, last_refreshed_at = $8
                WHERE id = $9
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
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
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
impl CountryRepo for PostgresStore {
    async fn find_by_name(&self, name: &str) -> MetadataResult<Option<CountryRow>> {
        let row = sqlx::query_as::<_, CountryRow>(
            "SELECT * FROM countries WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list(&self, filter: &CountryFilter) -> MetadataResult<Vec<CountryRow>> {
        let mut sql = String::from("SELECT * FROM countries");
        let mut clauses = Vec::new();
        let mut placeholder = 0;
        if filter.region.is_some() {
            placeholder += 1;
            clauses.push(format!("LOWER(region) = LOWER(${placeholder})"));
        }
        if filter.currency_code.is_some() {
            placeholder += 1;
            clauses.push(format!("currency_code = ${placeholder}"));
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
        let result = sqlx::query("DELETE FROM countries WHERE LOWER(name) = LOWER($1)")
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
impl RefreshRepo for PostgresStore {
    async fn apply_refresh(
        &self,
        rows: &[CountryUpsert],
        now: OffsetDateTime,
    ) -> MetadataResult<RefreshOutcome> {
        let mut tx = self.pool.begin().await?;
        let mut outcome = RefreshOutcome::default();

        for row in rows {
            // Savepoint per row: PostgreSQL poisons a transaction after any
            // failed statement, so isolation requires rolling back to here.
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

        sqlx::query("UPDATE refresh_state SET last_refreshed_at = $1 WHERE id = 1")
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
