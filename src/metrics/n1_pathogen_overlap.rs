//! N1: Pathogenic fungus overlap
//!
//! Quadratic overlap penalty over pathogenic fungi recorded on at least two
//! guild members. Host-specific pathogens carry full severity; generalists
//! are discounted because the shared planting adds less marginal risk.

use crate::metrics::shared::{count_shared_organisms, quadratic_overlap};
use crate::species::Species;
use rustc_hash::FxHashSet;

const SEVERITY_HOST_SPECIFIC: f64 = 1.0;
const SEVERITY_GENERALIST: f64 = 0.6;

/// Raw N1 value: Σ over fungi on ≥2 members of `(shared_fraction)² × severity`.
///
/// Severity is 1.0 when the fungus is recorded as host-specific on any member,
/// 0.6 otherwise. Unbounded; calibrated downstream.
pub fn pathogen_overlap(members: &[&Species]) -> f64 {
    let counts = count_shared_organisms(members, &[|s: &Species| &s.pathogenic_fungi]);

    let mut host_specific: FxHashSet<&str> = FxHashSet::default();
    for species in members {
        for fungus in &species.host_specific_pathogens {
            host_specific.insert(fungus.as_str());
        }
    }

    quadratic_overlap(&counts, members.len(), |fungus| {
        if host_specific.contains(fungus) {
            SEVERITY_HOST_SPECIFIC
        } else {
            SEVERITY_GENERALIST
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::species_with;
    use approx::assert_relative_eq;

    #[test]
    fn empty_lists_score_zero() {
        let a = species_with("sp-a", |_| {});
        let b = species_with("sp-b", |_| {});
        assert_eq!(pathogen_overlap(&[&a, &b]), 0.0);
    }

    #[test]
    fn generalist_shared_by_all() {
        let a = species_with("sp-a", |s| {
            s.pathogenic_fungi.insert("mildew_x".into());
        });
        let b = species_with("sp-b", |s| {
            s.pathogenic_fungi.insert("mildew_x".into());
        });
        // (2/2)² × 0.6
        assert_relative_eq!(pathogen_overlap(&[&a, &b]), 0.6, epsilon = 1e-9);
    }

    #[test]
    fn host_specific_escalates_severity() {
        let a = species_with("sp-a", |s| {
            s.pathogenic_fungi.insert("rust_y".into());
            s.host_specific_pathogens.insert("rust_y".into());
        });
        let b = species_with("sp-b", |s| {
            s.pathogenic_fungi.insert("rust_y".into());
        });
        let c = species_with("sp-c", |_| {});
        // rust_y on 2 of 3 members, host-specific on one: (2/3)² × 1.0
        assert_relative_eq!(
            pathogen_overlap(&[&a, &b, &c]),
            (2.0_f64 / 3.0).powi(2),
            epsilon = 1e-9
        );
    }

    #[test]
    fn adding_a_sharing_member_increases_risk() {
        let make = |id: &str| {
            species_with(id, |s| {
                s.pathogenic_fungi.insert("blight_z".into());
            })
        };
        let a = make("sp-a");
        let b = make("sp-b");
        let c = make("sp-c");
        let outsider = species_with("sp-d", |_| {});

        let base = pathogen_overlap(&[&a, &b]);
        let with_carrier = pathogen_overlap(&[&a, &b, &c]);
        let with_outsider = pathogen_overlap(&[&a, &b, &outsider]);

        // A third carrier keeps the fraction at 1 and cannot lower the sum;
        // a clean outsider dilutes it.
        assert!(with_carrier >= base);
        assert!(with_outsider < base);
    }

    #[test]
    fn order_independent() {
        let a = species_with("sp-a", |s| {
            s.pathogenic_fungi.insert("rot_1".into());
            s.pathogenic_fungi.insert("rot_2".into());
        });
        let b = species_with("sp-b", |s| {
            s.pathogenic_fungi.insert("rot_1".into());
        });
        let c = species_with("sp-c", |s| {
            s.pathogenic_fungi.insert("rot_2".into());
        });

        let forward = pathogen_overlap(&[&a, &b, &c]);
        let reversed = pathogen_overlap(&[&c, &b, &a]);
        assert_relative_eq!(forward, reversed, epsilon = 1e-12);
    }
}
