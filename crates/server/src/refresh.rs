//! The refresh pipeline: fetch both upstream datasets, reconcile them by
//! currency code, and apply the result as one transactional upsert pass.

use crate::error::ApiResult;
use crate::state::AppState;
use crate::summary;
use atlas_core::gdp::estimate_gdp;
use atlas_metadata::models::{CountryUpsert, RefreshOutcome};
use atlas_upstream::CountryRecord;
use rand::Rng;
use std::collections::HashMap;
use time::OffsetDateTime;

/// Run one refresh pass.
///
/// Fails with an upstream error (no database change) if either fetch fails;
/// row-level problems are isolated inside the store's transaction and never
/// surface here. On success a summary-image regeneration task is spawned;
/// its outcome does not affect the returned counters.
pub async fn run(state: &AppState) -> ApiResult<RefreshOutcome> {
    // Serialize overlapping refresh passes; later callers queue.
    let _guard = state.refresh_lock.lock().await;

    let (countries, rates) = tokio::try_join!(
        state.upstream.fetch_countries(),
        state.upstream.fetch_exchange_rates()
    )?;
    tracing::info!(
        countries = countries.len(),
        rates = rates.len(),
        "fetched upstream datasets"
    );

    let batch = reconcile(&countries, &rates, &mut rand::thread_rng());
    let now = OffsetDateTime::now_utc();
    let outcome = state.store.apply_refresh(&batch, now).await?;

    tracing::info!(
        processed = outcome.processed,
        inserted = outcome.inserted,
        updated = outcome.updated,
        skipped = outcome.skipped,
        "refresh pass complete"
    );

    // Post-commit side effect: regenerate the summary image in the
    // background. Failures are logged, never surfaced to the caller.
    let store = state.store.clone();
    let summary_config = state.config.summary.clone();
    tokio::spawn(async move {
        if let Err(e) = summary::regenerate(store, &summary_config).await {
            tracing::warn!(error = %e, "summary image regeneration failed");
        }
    });

    Ok(outcome)
}

/// Merge the fetched country records with the exchange-rate mapping.
///
/// Records with a blank name are dropped here (logged, not counted); rows
/// that fail at the database level are handled by the store's per-row
/// isolation instead.
fn reconcile(
    records: &[CountryRecord],
    rates: &HashMap<String, f64>,
    rng: &mut impl Rng,
) -> Vec<CountryUpsert> {
    let mut batch = Vec::with_capacity(records.len());

    for record in records {
        let name = record.name.trim();
        if name.is_empty() {
            tracing::warn!("skipping upstream country record with empty name");
            continue;
        }

        // First-listed currency wins; no aggregation across entries.
        let currency_code = record.currencies.first().and_then(|c| c.code.clone());

        // A zero rate is treated the same as an unknown one.
        let exchange_rate = currency_code
            .as_deref()
            .and_then(|code| rates.get(code).copied())
            .filter(|rate| *rate != 0.0);

        let estimated_gdp = estimate_gdp(record.population, exchange_rate, rng);

        batch.push(CountryUpsert {
            name: name.to_string(),
            capital: record.capital.clone(),
            region: record.region.clone(),
            population: i64::try_from(record.population).unwrap_or(i64::MAX),
            currency_code,
            exchange_rate,
            estimated_gdp,
            flag_url: record.flag.clone(),
        });
    }

    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_upstream::CurrencyEntry;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(name: &str, population: u64, codes: &[&str]) -> CountryRecord {
        CountryRecord {
            name: name.to_string(),
            capital: Some("Test City".to_string()),
            region: Some("Testing".to_string()),
            population,
            flag: None,
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

    #[test]
    fn first_currency_wins() {
        let rates = HashMap::from([("TSA".to_string(), 2.0), ("TSB".to_string(), 4.0)]);
        let records = vec![record("Testland", 1000, &["TSA", "TSB"])];
        let batch = reconcile(&records, &rates, &mut StdRng::seed_from_u64(1));

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].currency_code.as_deref(), Some("TSA"));
        assert_eq!(batch[0].exchange_rate, Some(2.0));
        let gdp = batch[0].estimated_gdp.unwrap();
        assert!((500_000.0..1_000_000.0).contains(&gdp), "gdp = {gdp}");
    }

    #[test]
    fn unknown_rate_keeps_code_but_no_figures() {
        let rates = HashMap::new();
        let records = vec![record("Testland", 1000, &["TST"])];
        let batch = reconcile(&records, &rates, &mut StdRng::seed_from_u64(1));

        assert_eq!(batch[0].currency_code.as_deref(), Some("TST"));
        assert_eq!(batch[0].exchange_rate, None);
        assert_eq!(batch[0].estimated_gdp, None);
    }

    #[test]
    fn zero_rate_is_treated_as_unknown() {
        let rates = HashMap::from([("TST".to_string(), 0.0)]);
        let records = vec![record("Testland", 1000, &["TST"])];
        let batch = reconcile(&records, &rates, &mut StdRng::seed_from_u64(1));

        assert_eq!(batch[0].exchange_rate, None);
        assert_eq!(batch[0].estimated_gdp, None);
    }

    #[test]
    fn no_currencies_means_no_code() {
        let rates = HashMap::from([("TST".to_string(), 2.0)]);
        let records = vec![record("Testland", 1000, &[])];
        let batch = reconcile(&records, &rates, &mut StdRng::seed_from_u64(1));

        assert_eq!(batch[0].currency_code, None);
        assert_eq!(batch[0].exchange_rate, None);
        assert_eq!(batch[0].estimated_gdp, None);
    }

    #[test]
    fn blank_names_are_dropped() {
        let rates = HashMap::new();
        let records = vec![record("   ", 1000, &[]), record("Testland", 1000, &[])];
        let batch = reconcile(&records, &rates, &mut StdRng::seed_from_u64(1));

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].name, "Testland");
    }

    #[test]
    fn names_are_trimmed() {
        let rates = HashMap::new();
        let records = vec![record("  Testland  ", 1000, &[])];
        let batch = reconcile(&records, &rates, &mut StdRng::seed_from_u64(1));

        assert_eq!(batch[0].name, "Testland");
    }
}
