//! P6: Pollinator sharing
//!
//! Quadratic overlap BENEFIT over pollinators and flower visitors shared by
//! at least two members: overlapping floral support concentrates pollinator
//! traffic across the guild.

use crate::metrics::shared::{count_shared_organisms, quadratic_overlap};
use crate::species::Species;

/// Raw P6 value: Σ over pollinators on ≥2 members of `(shared_fraction)²`.
pub fn pollinator_sharing(members: &[&Species]) -> f64 {
    let counts = count_shared_organisms(
        members,
        &[
            |s: &Species| &s.pollinators,
            |s: &Species| &s.flower_visitors,
        ],
    );
    quadratic_overlap(&counts, members.len(), |_| 1.0)
}
