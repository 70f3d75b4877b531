//! N4: CSR strategy conflicts
//!
//! Detects antagonistic Grime-strategy combinations between guild members:
//! C–C (two canopy competitors), C–S (competitor over a stress-tolerator,
//! modulated by the stress-tolerator's light preference), C–R (competitor
//! suppressing a ruderal) and R–R (two short-lived ruderals). The sum is
//! normalized by the ordered-pair count n(n−1) so the density is comparable
//! across guild sizes.
//!
//! Thresholds and weights come from `CsrConflictConfig`; they are external
//! agronomic lookup data, not derived here.

use crate::config::CsrConflictConfig;
use crate::species::Species;

/// Raw N4 value: summed conflict weights divided by n(n−1).
pub fn csr_conflicts(members: &[&Species], cfg: &CsrConflictConfig) -> f64 {
    let n = members.len();
    if n < 2 {
        return 0.0;
    }

    let high_c: Vec<usize> = (0..n).filter(|&i| members[i].csr.c > cfg.high_c).collect();
    let high_s: Vec<usize> = (0..n).filter(|&i| members[i].csr.s > cfg.high_s).collect();
    let high_r: Vec<usize> = (0..n).filter(|&i| members[i].csr.r > cfg.high_r).collect();

    let mut conflicts = 0.0;

    // C–C: each unordered competitor pair contests the same space
    let cc_pairs = high_c.len() * high_c.len().saturating_sub(1) / 2;
    conflicts += cc_pairs as f64 * cfg.weight_cc;

    // C–S: weight depends on the stress-tolerator's light preference
    for &i in &high_c {
        for &j in &high_s {
            if i == j {
                continue;
            }
            conflicts += match members[j].light_pref {
                Some(light) if light < cfg.shade_below => cfg.weight_cs_shade,
                Some(light) if light > cfg.sun_above => cfg.weight_cs_sun,
                _ => cfg.weight_cs_neutral,
            };
        }
    }

    // C–R: competitors suppress ruderals
    for &i in &high_c {
        for &j in &high_r {
            if i == j {
                continue;
            }
            conflicts += cfg.weight_cr;
        }
    }

    // R–R: mild, short-lived annual crowding
    let rr_pairs = high_r.len() * high_r.len().saturating_sub(1) / 2;
    conflicts += rr_pairs as f64 * cfg.weight_rr;

    conflicts / (n * (n - 1)) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::species_with;
    use approx::assert_relative_eq;

    fn cfg() -> CsrConflictConfig {
        CsrConflictConfig::default()
    }

    #[test]
    fn no_dominant_strategies_no_conflict() {
        let a = species_with("sp-a", |s| {
            s.csr.c = 40.0;
            s.csr.s = 30.0;
            s.csr.r = 30.0;
        });
        let b = species_with("sp-b", |s| {
            s.csr.c = 30.0;
            s.csr.s = 40.0;
            s.csr.r = 30.0;
        });
        assert_eq!(csr_conflicts(&[&a, &b], &cfg()), 0.0);
    }

    #[test]
    fn two_competitors_conflict_fully() {
        let a = species_with("sp-a", |s| s.csr.c = 75.0);
        let b = species_with("sp-b", |s| s.csr.c = 80.0);
        // One C–C pair at weight 1.0 over n(n−1) = 2 ordered pairs
        assert_relative_eq!(csr_conflicts(&[&a, &b], &cfg()), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn shade_adapted_stress_tolerator_is_compatible() {
        let canopy = species_with("sp-a", |s| s.csr.c = 75.0);
        let understory = species_with("sp-b", |s| {
            s.csr.s = 70.0;
            s.light_pref = Some(2.0); // shade-adapted: wants to sit under the canopy
        });
        assert_eq!(csr_conflicts(&[&canopy, &understory], &cfg()), 0.0);
    }

    #[test]
    fn sun_demanding_stress_tolerator_conflicts_hard() {
        let canopy = species_with("sp-a", |s| s.csr.c = 75.0);
        let sun_lover = species_with("sp-b", |s| {
            s.csr.s = 70.0;
            s.light_pref = Some(8.5);
        });
        // One C–S pair at 0.9 over 2 ordered pairs
        assert_relative_eq!(
            csr_conflicts(&[&canopy, &sun_lover], &cfg()),
            0.45,
            epsilon = 1e-9
        );
    }

    #[test]
    fn missing_light_preference_is_neutral() {
        let canopy = species_with("sp-a", |s| s.csr.c = 75.0);
        let unknown = species_with("sp-b", |s| {
            s.csr.s = 70.0;
            s.light_pref = None;
        });
        assert_relative_eq!(
            csr_conflicts(&[&canopy, &unknown], &cfg()),
            0.3,
            epsilon = 1e-9
        );
    }

    #[test]
    fn ruderal_pair_is_mild() {
        let a = species_with("sp-a", |s| s.csr.r = 60.0);
        let b = species_with("sp-b", |s| s.csr.r = 55.0);
        // One R–R pair at 0.3 over 2 ordered pairs
        assert_relative_eq!(csr_conflicts(&[&a, &b], &cfg()), 0.15, epsilon = 1e-9);
    }

    #[test]
    fn density_normalization_uses_ordered_pairs() {
        let a = species_with("sp-a", |s| s.csr.c = 75.0);
        let b = species_with("sp-b", |s| s.csr.c = 80.0);
        let neutral = species_with("sp-c", |_| {});
        // Same single C–C conflict, now over 3×2 = 6 ordered pairs
        assert_relative_eq!(
            csr_conflicts(&[&a, &b, &neutral], &cfg()),
            1.0 / 6.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn order_independent() {
        let a = species_with("sp-a", |s| s.csr.c = 75.0);
        let b = species_with("sp-b", |s| {
            s.csr.s = 70.0;
            s.light_pref = Some(8.0);
        });
        let c = species_with("sp-c", |s| s.csr.r = 60.0);
        assert_relative_eq!(
            csr_conflicts(&[&a, &b, &c], &cfg()),
            csr_conflicts(&[&c, &a, &b], &cfg()),
            epsilon = 1e-12
        );
    }
}
