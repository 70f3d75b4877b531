//! Advisory checks: nitrogen self-sufficiency and soil-pH compatibility
//!
//! These are boolean/categorical observations about the guild, reported as
//! flags alongside the scores. They are never percentile-scored: "no nitrogen
//! fixer" is a fact to act on, not a rank against other guilds.

use crate::species::Species;
use std::collections::BTreeMap;

/// Flag keys used in `ScoreResult::flags`.
pub const FLAG_NITROGEN: &str = "nitrogen";
pub const FLAG_SOIL_PH: &str = "soil_ph";

pub type AdvisoryFlags = BTreeMap<String, String>;

/// Both advisory checks for a guild.
pub fn advisory_flags(members: &[&Species]) -> AdvisoryFlags {
    let mut flags = AdvisoryFlags::new();
    if let Some(message) = nitrogen_flag(members) {
        flags.insert(FLAG_NITROGEN.to_string(), message);
    }
    if let Some(message) = soil_ph_flag(members) {
        flags.insert(FLAG_SOIL_PH.to_string(), message);
    }
    flags
}

/// Nitrogen self-sufficiency: how many members are confident nitrogen fixers.
/// Two or more fixers need no flag; one is partial; zero flags the guild as
/// dependent on external nitrogen.
pub fn nitrogen_flag(members: &[&Species]) -> Option<String> {
    let fixers = members
        .iter()
        .filter(|s| s.nitrogen.is_confident_fixer())
        .count();

    match fixers {
        0 => Some(
            "No nitrogen-fixing species; the guild will depend on external fertility inputs"
                .to_string(),
        ),
        1 => Some("Only one nitrogen-fixing species supports the whole guild".to_string()),
        _ => None,
    }
}

/// Soil-pH compatibility: intersect all recorded tolerance ranges. Members
/// without data are tolerated (absent data never fabricates a conflict).
pub fn soil_ph_flag(members: &[&Species]) -> Option<String> {
    let mut ranges = members.iter().filter_map(|s| s.ph_tolerance);

    let first = ranges.next()?;
    let mut shared = Some(first);
    for range in ranges {
        shared = shared.and_then(|acc| acc.intersect(&range));
        if shared.is_none() {
            break;
        }
    }

    match shared {
        None => Some(
            "Soil pH tolerances do not overlap; no single bed suits every member".to_string(),
        ),
        Some(window) if window.max - window.min < 0.5 => Some(format!(
            "Shared soil pH window is narrow ({:.1}–{:.1}); soil preparation must be precise",
            window.min, window.max
        )),
        Some(_) => None,
    }
}
