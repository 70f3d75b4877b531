//! Percentile normalization
//!
//! One shared monotone piecewise-linear interpolation over the 13 stored
//! percentile breakpoints. Every metric goes through this single utility;
//! risk metrics are inverted afterwards. Out-of-range raw values clamp to
//! [0, 100], so any finite input yields a bounded display score.

use crate::calibration::CalibrationEntry;
use crate::metrics::Metric;

/// Percentile levels of the stored breakpoints.
pub const PERCENTILES: [f64; 13] = [
    1.0, 5.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 95.0, 99.0,
];

/// Rank a raw value within its calibration sample, in [0, 100].
///
/// Values at or below the p1 breakpoint rank 0; at or above p99 rank 100;
/// between breakpoints the rank interpolates linearly. Repeated breakpoint
/// values (a flat stretch of the distribution) resolve to the lower edge.
pub fn percentile_rank(raw: f64, entry: &CalibrationEntry) -> f64 {
    let values = entry.breakpoints();

    if raw <= values[0] {
        return 0.0;
    }
    if raw >= values[12] {
        return 100.0;
    }

    for i in 0..12 {
        if values[i] <= raw && raw <= values[i + 1] {
            let span = values[i + 1] - values[i];
            let fraction = if span > 0.0 { (raw - values[i]) / span } else { 0.0 };
            return PERCENTILES[i] + fraction * (PERCENTILES[i + 1] - PERCENTILES[i]);
        }
    }

    // Unreachable for monotone breakpoints; keep the midpoint as a fallback.
    50.0
}

/// Display score for one metric: rank for benefits, 100 − rank for risks.
pub fn display_score(metric: Metric, raw: f64, entry: &CalibrationEntry) -> f64 {
    let rank = percentile_rank(raw, entry);
    if metric.is_risk() {
        100.0 - rank
    } else {
        rank
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::CalibrationEntry;
    use approx::assert_relative_eq;

    fn ladder() -> CalibrationEntry {
        // Uniform ladder 0.1 .. 1.3 across the 13 breakpoints
        let breakpoints: Vec<f64> = (1..=13).map(|i| i as f64 / 10.0).collect();
        CalibrationEntry::from_breakpoints(breakpoints.try_into().unwrap(), 0.7, 0.35, 10_000)
    }

    #[test]
    fn clamps_below_and_above() {
        let entry = ladder();
        assert_eq!(percentile_rank(-100.0, &entry), 0.0);
        assert_eq!(percentile_rank(0.1, &entry), 0.0);
        assert_eq!(percentile_rank(1.3, &entry), 100.0);
        assert_eq!(percentile_rank(1e12, &entry), 100.0);
    }

    #[test]
    fn interpolates_between_breakpoints() {
        let entry = ladder();
        // Midway between p50 (0.7) and p60 (0.8)
        assert_relative_eq!(percentile_rank(0.75, &entry), 55.0, epsilon = 1e-9);
        // Exactly on a breakpoint
        assert_relative_eq!(percentile_rank(0.7, &entry), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn flat_stretch_resolves_to_lower_edge() {
        let mut breakpoints = [0.0; 13];
        for (i, b) in breakpoints.iter_mut().enumerate() {
            // p1 = 0.1, p5..p40 flat at 0.5, then rising
            *b = match i {
                0 => 0.1,
                1..=5 => 0.5,
                _ => 0.5 + (i - 5) as f64,
            };
        }
        let entry = CalibrationEntry::from_breakpoints(breakpoints, 1.0, 1.0, 10_000);
        // 0.5 sits on the flat p5..p40 stretch; ranks at its start
        assert_relative_eq!(percentile_rank(0.5, &entry), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn rank_is_monotone() {
        let entry = ladder();
        let mut last = -1.0;
        for i in 0..200 {
            let raw = i as f64 / 100.0;
            let rank = percentile_rank(raw, &entry);
            assert!(rank >= last);
            assert!((0.0..=100.0).contains(&rank));
            last = rank;
        }
    }

    #[test]
    fn idempotent_for_identical_inputs() {
        let entry = ladder();
        let first = percentile_rank(0.42, &entry);
        let second = percentile_rank(0.42, &entry);
        assert_eq!(first, second);
    }

    #[test]
    fn risk_display_is_inverted() {
        let entry = ladder();
        let rank = percentile_rank(0.75, &entry);
        assert_relative_eq!(
            display_score(Metric::PathogenOverlap, 0.75, &entry),
            100.0 - rank,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            display_score(Metric::PhyloDiversity, 0.75, &entry),
            rank,
            epsilon = 1e-9
        );
    }
}
