//! Estimated-GDP derivation.
//!
//! The figure is synthetic and non-authoritative: population times a random
//! multiplier, divided by the exchange rate. The multiplier is drawn from a
//! caller-supplied [`Rng`] so tests can pin the seed.

use rand::Rng;

/// Lower bound (inclusive) of the GDP multiplier.
pub const MULTIPLIER_MIN: f64 = 1000.0;

/// Upper bound (exclusive) of the GDP multiplier.
pub const MULTIPLIER_MAX: f64 = 2000.0;

/// Compute an estimated GDP from population and exchange rate.
///
/// Returns `None` when the exchange rate is absent or exactly zero; a
/// missing rate means the figure is unknown, not an error.
pub fn estimate_gdp(
    population: u64,
    exchange_rate: Option<f64>,
    rng: &mut impl Rng,
) -> Option<f64> {
    let rate = exchange_rate?;
    if rate == 0.0 {
        return None;
    }
    let multiplier = rng.gen_range(MULTIPLIER_MIN..MULTIPLIER_MAX);
    Some((population as f64 * multiplier) / rate)
}
