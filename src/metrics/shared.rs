//! Shared organism counting
//!
//! Counts how many guild members are associated with each organism, across
//! one or more association fields per species. The overlap metrics (N1, N2,
//! P3, P6) are all built on these counts.

use crate::species::Species;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::collections::BTreeSet;

/// Accessor for one association field of a species.
pub type OrganismField = fn(&Species) -> &BTreeSet<String>;

/// Count organisms shared across guild members.
///
/// For each organism, counts the members associated with it through any of
/// the given fields. An organism appearing in several fields of the same
/// member is counted once for that member.
pub fn count_shared_organisms(
    members: &[&Species],
    fields: &[OrganismField],
) -> FxHashMap<String, usize> {
    let mut counts: FxHashMap<String, usize> = FxHashMap::default();

    for species in members {
        // Most species carry well under 16 organisms per field
        let mut member_organisms: SmallVec<[&str; 16]> = SmallVec::new();
        for field in fields {
            for organism in field(species) {
                if !organism.is_empty() {
                    member_organisms.push(organism.as_str());
                }
            }
        }

        member_organisms.sort_unstable();
        member_organisms.dedup();

        for organism in member_organisms {
            *counts.entry(organism.to_string()).or_insert(0) += 1;
        }
    }

    counts
}

/// Quadratic overlap penalty/benefit shared by N1, N2 and P6:
/// Σ over organisms on ≥2 members of `(count / n)² × severity(organism)`.
pub fn quadratic_overlap<F>(
    counts: &FxHashMap<String, usize>,
    n_members: usize,
    mut severity: F,
) -> f64
where
    F: FnMut(&str) -> f64,
{
    let n = n_members as f64;
    let mut total = 0.0;
    for (organism, count) in counts {
        if *count < 2 {
            continue;
        }
        let shared_fraction = *count as f64 / n;
        total += shared_fraction * shared_fraction * severity(organism);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::species_with;
    use approx::assert_relative_eq;

    #[test]
    fn counts_members_not_occurrences() {
        let a = species_with("sp-a", |s| {
            s.pollinators.insert("bee_1".into());
            s.flower_visitors.insert("bee_1".into()); // same organism, two fields
            s.pollinators.insert("bee_2".into());
        });
        let b = species_with("sp-b", |s| {
            s.pollinators.insert("bee_1".into());
        });

        let counts = count_shared_organisms(
            &[&a, &b],
            &[|s| &s.pollinators, |s| &s.flower_visitors],
        );

        assert_eq!(counts.get("bee_1"), Some(&2));
        assert_eq!(counts.get("bee_2"), Some(&1));
    }

    #[test]
    fn quadratic_overlap_ignores_singletons() {
        let mut counts = FxHashMap::default();
        counts.insert("org_shared".to_string(), 3);
        counts.insert("org_single".to_string(), 1);

        let total = quadratic_overlap(&counts, 3, |_| 1.0);
        // Only org_shared contributes: (3/3)² × 1.0
        assert_relative_eq!(total, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn quadratic_overlap_applies_severity() {
        let mut counts = FxHashMap::default();
        counts.insert("org_a".to_string(), 2);

        let total = quadratic_overlap(&counts, 4, |_| 0.5);
        // (2/4)² × 0.5 = 0.125
        assert_relative_eq!(total, 0.125, epsilon = 1e-9);
    }
}
