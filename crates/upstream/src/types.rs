//! Wire models for the upstream payloads.

use serde::Deserialize;
use std::collections::HashMap;

/// One country as reported by restcountries v2.
///
/// Fields the API occasionally omits are defaulted rather than failing the
/// whole fetch.
#[derive(Debug, Clone, Deserialize)]
pub struct CountryRecord {
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    #[serde(default)]
    pub population: u64,
    /// Flag image URL.
    pub flag: Option<String>,
    #[serde(default)]
    pub currencies: Vec<CurrencyEntry>,
}

/// One currency entry on a country record.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyEntry {
    pub code: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
}

/// Envelope returned by the exchange-rate API.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesEnvelope {
    pub result: Option<String>,
    /// Currency code to rate of that currency per one USD.
    pub rates: HashMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_record_decodes_full_payload() {
        let json = r#"{
            "name": "France",
            "capital": "Paris",
            "region": "Europe",
            "population": 67391582,
            "flag": "https://flagcdn.com/fr.svg",
            "currencies": [{"code": "EUR", "name": "Euro", "symbol": "€"}]
        }"#;
        let record: CountryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.name, "France");
        assert_eq!(record.population, 67391582);
        assert_eq!(record.currencies[0].code.as_deref(), Some("EUR"));
    }

    #[test]
    fn country_record_defaults_missing_fields() {
        // Antarctica-style records carry no capital, population, or currency
        let json = r#"{"name": "Antarctica", "region": "Polar"}"#;
        let record: CountryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.population, 0);
        assert!(record.capital.is_none());
        assert!(record.currencies.is_empty());
        assert!(record.flag.is_none());
    }

    #[test]
    fn rates_envelope_decodes() {
        let json = r#"{"result": "success", "base_code": "USD", "rates": {"USD": 1.0, "EUR": 0.92}}"#;
        let envelope: RatesEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.result.as_deref(), Some("success"));
        assert_eq!(envelope.rates.get("EUR"), Some(&0.92));
    }
}
