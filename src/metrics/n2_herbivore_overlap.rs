//! N2: Shared herbivore pressure
//!
//! Quadratic overlap penalty over herbivores recorded on at least two guild
//! members. Organisms that also appear as pollinators or flower visitors
//! anywhere in the guild are excluded: a florivore that pollinates is not
//! treated as a pure pest.

use crate::metrics::shared::{count_shared_organisms, quadratic_overlap};
use crate::species::Species;
use rustc_hash::FxHashSet;

const SEVERITY_HERBIVORE: f64 = 0.5;

/// Raw N2 value: Σ over true herbivores on ≥2 members of
/// `(shared_fraction)² × 0.5`. Unbounded; calibrated downstream.
pub fn herbivore_overlap(members: &[&Species]) -> f64 {
    let herbivore_counts = count_shared_organisms(members, &[|s: &Species| &s.herbivores]);

    let mut visitors: FxHashSet<&str> = FxHashSet::default();
    for species in members {
        for organism in species.pollinators.iter().chain(&species.flower_visitors) {
            visitors.insert(organism.as_str());
        }
    }

    quadratic_overlap(&herbivore_counts, members.len(), |herbivore| {
        if visitors.contains(herbivore) {
            0.0
        } else {
            SEVERITY_HERBIVORE
        }
    })
}
