//! P3: Beneficial fungal networks
//!
//! Scores common fungal networks (mycorrhizal, endophytic, saprotrophic):
//! a linear network term over fungi shared by ≥2 members plus a coverage
//! term for members carrying any beneficial fungus at all.

use crate::metrics::shared::count_shared_organisms;
use crate::species::Species;

const NETWORK_WEIGHT: f64 = 0.6;
const COVERAGE_WEIGHT: f64 = 0.4;

/// Raw P3 value:
/// `0.6 × Σ(shared_fraction over fungi on ≥2 members) + 0.4 × coverage`.
///
/// The network term is linear (not quadratic): every additional partner in a
/// shared network helps, without the runaway emphasis overlap penalties use.
pub fn beneficial_fungi(members: &[&Species]) -> f64 {
    let n = members.len() as f64;
    let counts = count_shared_organisms(
        members,
        &[
            |s: &Species| &s.mycorrhizal_fungi,
            |s: &Species| &s.endophytic_fungi,
            |s: &Species| &s.saprotrophic_fungi,
        ],
    );

    let mut network = 0.0;
    for count in counts.values() {
        if *count >= 2 {
            network += *count as f64 / n;
        }
    }

    let carriers = members.iter().filter(|s| s.has_beneficial_fungi()).count();
    let coverage = carriers as f64 / n;

    NETWORK_WEIGHT * network + COVERAGE_WEIGHT * coverage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::species_with;
    use approx::assert_relative_eq;

    #[test]
    fn no_fungi_scores_zero() {
        let a = species_with("sp-a", |_| {});
        let b = species_with("sp-b", |_| {});
        assert_eq!(beneficial_fungi(&[&a, &b]), 0.0);
    }

    #[test]
    fn full_network_and_coverage() {
        let a = species_with("sp-a", |s| {
            s.mycorrhizal_fungi.insert("glomus_1".into());
        });
        let b = species_with("sp-b", |s| {
            s.mycorrhizal_fungi.insert("glomus_1".into());
        });
        // network = 2/2 = 1, coverage = 1 → 0.6 + 0.4
        assert_relative_eq!(beneficial_fungi(&[&a, &b]), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn unshared_fungi_only_count_toward_coverage() {
        let a = species_with("sp-a", |s| {
            s.endophytic_fungi.insert("epichloe_1".into());
        });
        let b = species_with("sp-b", |s| {
            s.saprotrophic_fungi.insert("mycena_1".into());
        });
        // network = 0, coverage = 1
        assert_relative_eq!(beneficial_fungi(&[&a, &b]), 0.4, epsilon = 1e-9);
    }

    #[test]
    fn network_term_is_linear_in_partners() {
        let make = |id: &str| {
            species_with(id, |s| {
                s.mycorrhizal_fungi.insert("glomus_1".into());
            })
        };
        let a = make("sp-a");
        let b = make("sp-b");
        let c = make("sp-c");
        let outsider = species_with("sp-d", |_| {});

        // 3 carriers of 4: network = 3/4, coverage = 3/4
        let raw = beneficial_fungi(&[&a, &b, &c, &outsider]);
        assert_relative_eq!(raw, 0.6 * 0.75 + 0.4 * 0.75, epsilon = 1e-9);
    }
}
