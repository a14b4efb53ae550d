//! # Estimated GDP
//!
//! `population × factor / exchange_rate`, with `factor` drawn uniformly from
//! `1000..=2000` for every record on every refresh. The result is a noisy
//! placeholder rather than an economic figure, and two refreshes of the same
//! data will not agree.

use std::ops::RangeInclusive;

use rand::Rng;

/// Range of the per-record random multiplier.
pub const GDP_FACTOR_RANGE: RangeInclusive<u32> = 1000..=2000;

/// Estimates GDP using the thread-local RNG.
pub fn estimate_gdp(population: u64, exchange_rate: Option<f64>) -> f64 {
    estimate_gdp_with(&mut rand::rng(), population, exchange_rate)
}

/// Estimates GDP drawing the multiplier from `rng`.
///
/// Returns `0.0` when the rate is absent, zero, negative or not finite.
pub fn estimate_gdp_with<R: Rng>(
    rng: &mut R,
    population: u64,
    exchange_rate: Option<f64>,
) -> f64 {
    let rate = match exchange_rate {
        Some(rate) if rate.is_finite() && rate > 0.0 => rate,
        _ => return 0.0,
    };
    let factor = rng.random_range(GDP_FACTOR_RANGE);
    population as f64 * f64::from(factor) / rate
}
