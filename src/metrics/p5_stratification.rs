//! P5: Structural stratification
//!
//! Vertical layering benefit: the guild's height range scaled by how many
//! distinct growth forms occupy it. A canopy tree over shrubs and a ground
//! cover scores far above three same-height herbs.

use crate::species::Species;
use rustc_hash::FxHashSet;

/// Raw P5 value: `(max height − min height) × distinct growth form count`.
pub fn stratification(members: &[&Species]) -> f64 {
    let mut min_height = f64::INFINITY;
    let mut max_height = f64::NEG_INFINITY;
    let mut any_height = false;

    for species in members {
        if species.height_m.is_finite() {
            min_height = min_height.min(species.height_m);
            max_height = max_height.max(species.height_m);
            any_height = true;
        }
    }

    if !any_height {
        return 0.0;
    }

    let mut forms: FxHashSet<&str> = FxHashSet::default();
    for species in members {
        if !species.growth_form.is_empty() {
            forms.insert(species.growth_form.as_str());
        }
    }

    (max_height - min_height) * forms.len().max(1) as f64
}
