//! Climate tier gatekeeper
//!
//! A guild is only scorable inside a climate tier every member belongs to.
//! The gatekeeper intersects member tier bitsets; an empty intersection is a
//! veto — a terminal result state, not an error. Envelope overlap checks are
//! demoted to non-fatal warnings: the tier test governs the veto.

use crate::species::{ClimateTier, Species, TierSet};

/// Veto reason string; stable because callers match on it.
pub const VETO_INCOMPATIBLE_TIERS: &str = "Incompatible climate tiers";

/// Shared temperature window below this width (°C) draws a warning.
const NARROW_TEMP_WINDOW_C: f64 = 5.0;
/// Shared precipitation window below this width (mm) draws a warning.
const NARROW_PRECIP_WINDOW_MM: f64 = 100.0;

/// Outcome of the tier gatekeeper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierCheck {
    /// Every member shares at least one tier.
    Shared(TierSet),
    /// No common tier; `detail` names the conflicting members.
    Veto { detail: String },
}

/// Intersect member tier sets. Pure; no side effects.
pub fn check_tiers(members: &[&Species]) -> TierCheck {
    let mut shared = match members.first() {
        Some(first) => first.tiers,
        None => return TierCheck::Shared(TierSet::EMPTY),
    };
    for species in &members[1..] {
        shared = shared.intersection(species.tiers);
    }

    if shared.is_empty() {
        TierCheck::Veto {
            detail: conflict_detail(members),
        }
    } else {
        TierCheck::Shared(shared)
    }
}

/// Check an explicit target tier instead of intersecting freely. Members that
/// do not occur in the target tier are named in the veto detail.
pub fn check_target_tier(members: &[&Species], target: ClimateTier) -> TierCheck {
    let missing: Vec<&str> = members
        .iter()
        .filter(|s| !s.tiers.contains(target))
        .map(|s| s.scientific_name_or_id())
        .collect();

    if missing.is_empty() {
        TierCheck::Shared(TierSet::from_tiers(&[target]))
    } else {
        TierCheck::Veto {
            detail: format!(
                "{} do(es) not occur in {}",
                missing.join(", "),
                target.display_name()
            ),
        }
    }
}

/// Name the members responsible for an empty intersection: a fully disjoint
/// pair when one exists, otherwise every member with its tiers.
fn conflict_detail(members: &[&Species]) -> String {
    for (i, a) in members.iter().enumerate() {
        for b in &members[i + 1..] {
            if a.tiers.is_disjoint(b.tiers) {
                return format!(
                    "{} ({}) and {} ({}) share no climate tier",
                    a.scientific_name_or_id(),
                    a.tiers,
                    b.scientific_name_or_id(),
                    b.tiers
                );
            }
        }
    }

    let listing: Vec<String> = members
        .iter()
        .map(|s| format!("{} ({})", s.scientific_name_or_id(), s.tiers))
        .collect();
    format!("no single climate tier covers all members: {}", listing.join("; "))
}

/// Non-fatal climate warnings from occurrence envelopes. Emitted after a tier
/// pass; never affects scores.
pub fn envelope_warnings(members: &[&Species]) -> Vec<String> {
    let envelopes: Vec<_> = members.iter().filter_map(|s| s.envelope).collect();
    if envelopes.len() < 2 {
        return Vec::new();
    }

    let temp_min = envelopes
        .iter()
        .map(|e| e.temp_min)
        .fold(f64::NEG_INFINITY, f64::max);
    let temp_max = envelopes
        .iter()
        .map(|e| e.temp_max)
        .fold(f64::INFINITY, f64::min);
    let precip_min = envelopes
        .iter()
        .map(|e| e.precip_min)
        .fold(f64::NEG_INFINITY, f64::max);
    let precip_max = envelopes
        .iter()
        .map(|e| e.precip_max)
        .fold(f64::INFINITY, f64::min);

    let mut warnings = Vec::new();

    let temp_window = temp_max - temp_min;
    if temp_window <= 0.0 {
        warnings.push(
            "Members share a climate tier but their observed temperature ranges do not overlap"
                .to_string(),
        );
    } else if temp_window < NARROW_TEMP_WINDOW_C {
        warnings.push(format!(
            "Narrow shared temperature window ({temp_window:.1} °C); siting must suit every member"
        ));
    }

    let precip_window = precip_max - precip_min;
    if precip_window <= 0.0 {
        warnings.push(
            "Members share a climate tier but their observed rainfall ranges do not overlap"
                .to_string(),
        );
    } else if precip_window < NARROW_PRECIP_WINDOW_MM {
        warnings.push(format!(
            "Narrow shared rainfall window ({precip_window:.0} mm); irrigation will need care"
        ));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::ClimateEnvelope;
    use crate::testutil::species_with;

    #[test]
    fn shared_tier_passes() {
        let a = species_with("sp-a", |s| {
            s.tiers.insert(ClimateTier::HumidTemperate);
            s.tiers.insert(ClimateTier::Continental);
        });
        let b = species_with("sp-b", |s| {
            s.tiers.insert(ClimateTier::HumidTemperate);
        });
        match check_tiers(&[&a, &b]) {
            TierCheck::Shared(set) => {
                assert!(set.contains(ClimateTier::HumidTemperate));
                assert_eq!(set.len(), 1);
            }
            TierCheck::Veto { .. } => panic!("expected pass"),
        }
    }

    #[test]
    fn disjoint_tiers_veto_and_name_the_pair() {
        let tropical = species_with("sp-a", |s| {
            s.scientific_name = "Theobroma cacao".into();
            s.tiers.insert(ClimateTier::Tropical);
        });
        let boreal = species_with("sp-b", |s| {
            s.scientific_name = "Picea mariana".into();
            s.tiers.insert(ClimateTier::BorealPolar);
        });
        match check_tiers(&[&tropical, &boreal]) {
            TierCheck::Veto { detail } => {
                assert!(detail.contains("Theobroma cacao"));
                assert!(detail.contains("Picea mariana"));
            }
            TierCheck::Shared(_) => panic!("expected veto"),
        }
    }

    #[test]
    fn pairwise_overlaps_can_still_yield_empty_intersection() {
        let a = species_with("sp-a", |s| {
            s.tiers = TierSet::from_tiers(&[ClimateTier::Tropical, ClimateTier::Mediterranean]);
        });
        let b = species_with("sp-b", |s| {
            s.tiers =
                TierSet::from_tiers(&[ClimateTier::Mediterranean, ClimateTier::Continental]);
        });
        let c = species_with("sp-c", |s| {
            s.tiers = TierSet::from_tiers(&[ClimateTier::Continental, ClimateTier::Tropical]);
        });
        match check_tiers(&[&a, &b, &c]) {
            TierCheck::Veto { detail } => {
                assert!(detail.contains("no single climate tier"));
            }
            TierCheck::Shared(_) => panic!("expected veto"),
        }
    }

    #[test]
    fn target_tier_requires_every_member() {
        let a = species_with("sp-a", |s| {
            s.tiers.insert(ClimateTier::Arid);
        });
        let b = species_with("sp-b", |s| {
            s.tiers.insert(ClimateTier::Arid);
            s.tiers.insert(ClimateTier::Mediterranean);
        });
        assert!(matches!(
            check_target_tier(&[&a, &b], ClimateTier::Arid),
            TierCheck::Shared(_)
        ));
        assert!(matches!(
            check_target_tier(&[&a, &b], ClimateTier::Mediterranean),
            TierCheck::Veto { .. }
        ));
    }

    #[test]
    fn narrow_envelope_draws_warning() {
        let a = species_with("sp-a", |s| {
            s.envelope = Some(ClimateEnvelope {
                temp_min: 5.0,
                temp_max: 12.0,
                precip_min: 400.0,
                precip_max: 900.0,
            });
        });
        let b = species_with("sp-b", |s| {
            s.envelope = Some(ClimateEnvelope {
                temp_min: 9.0,
                temp_max: 22.0,
                precip_min: 600.0,
                precip_max: 1500.0,
            });
        });
        let warnings = envelope_warnings(&[&a, &b]);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("temperature window"));
    }

    #[test]
    fn wide_envelopes_warn_nothing() {
        let wide = |id: &str| {
            species_with(id, |s| {
                s.envelope = Some(ClimateEnvelope {
                    temp_min: 0.0,
                    temp_max: 25.0,
                    precip_min: 300.0,
                    precip_max: 2000.0,
                });
            })
        };
        let a = wide("sp-a");
        let b = wide("sp-b");
        assert!(envelope_warnings(&[&a, &b]).is_empty());
    }
}
