//! Sample-size requirements for percentile calibration
//!
//! Order-statistics rule: estimating the p-th percentile reliably needs at
//! least `min_tail_obs` observations in the tail, so n ≥ min_tail_obs / p.
//! The smallest percentile of interest is p1 (probability 0.01), giving
//! 50 / 0.01 = 5,000 as the floor and 100 / 0.01 = 10,000 as the
//! recommendation.
//!
//! A finite-population correction is deliberately NOT applied: even the
//! smallest tier population yields more than 10^20 distinct guilds, so every
//! sampling fraction is far below the 5% threshold where the correction
//! would matter.

/// Observations demanded in the thinnest tail for an acceptable estimate.
pub const MIN_TAIL_OBSERVATIONS: u64 = 50;

/// Observations in the thinnest tail for a robust estimate.
pub const ROBUST_TAIL_OBSERVATIONS: u64 = 100;

/// Probability mass of the smallest calibrated percentile (p1).
pub const SMALLEST_TAIL: f64 = 0.01;

/// Hard floor: tables under this sample count are never published or loaded.
/// Equals `required_samples(MIN_TAIL_OBSERVATIONS, SMALLEST_TAIL)`.
pub const MIN_SAMPLES: u64 = 5_000;

/// Recommended per-stratum sample count.
/// Equals `required_samples(ROBUST_TAIL_OBSERVATIONS, SMALLEST_TAIL)`.
pub const RECOMMENDED_SAMPLES: u64 = 10_000;

/// Samples needed so the tail of probability `tail` holds `tail_obs`
/// observations.
pub fn required_samples(tail_obs: u64, tail: f64) -> u64 {
    (tail_obs as f64 / tail).ceil() as u64
}

/// Finite-population-corrected sample size, `n / (1 + (n−1)/N)`. Kept for
/// documentation and tests; with guild populations this large it returns
/// essentially `n` unchanged, which is why the pipeline skips it.
pub fn finite_population_correction(n: u64, population: f64) -> f64 {
    let n = n as f64;
    n / (1.0 + (n - 1.0) / population)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn floor_and_recommendation_match_the_tail_rule() {
        assert_eq!(
            required_samples(MIN_TAIL_OBSERVATIONS, SMALLEST_TAIL),
            MIN_SAMPLES
        );
        assert_eq!(
            required_samples(ROBUST_TAIL_OBSERVATIONS, SMALLEST_TAIL),
            RECOMMENDED_SAMPLES
        );
    }

    #[test]
    fn required_samples_scales_with_tail() {
        assert_eq!(required_samples(50, 0.05), 1_000);
        assert_eq!(required_samples(50, 0.99), 51);
    }

    #[test]
    fn correction_is_negligible_for_guild_spaces() {
        // Smallest tier: ~10^20 distinct guilds
        let corrected = finite_population_correction(10_000, 1e20);
        assert_relative_eq!(corrected, 10_000.0, epsilon = 1e-6);
    }

    #[test]
    fn correction_matters_only_for_tiny_populations() {
        let corrected = finite_population_correction(10_000, 20_000.0);
        assert!(corrected < 7_000.0);
    }
}
