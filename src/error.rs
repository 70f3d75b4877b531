//! Library error types
//!
//! Input validation and calibration lookups fail fast with typed errors.
//! A climate veto is NOT an error: it is a terminal, user-facing result state
//! carried by `ScoreResult`.

use crate::calibration::SizeClass;
use crate::metrics::Metric;
use crate::species::{ClimateTier, SpeciesId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("a guild needs at least 2 species, got {0}")]
    GuildTooSmall(usize),

    #[error("guild exceeds the supported maximum size ({got} > {max})")]
    GuildTooLarge { got: usize, max: usize },

    #[error("duplicate species in guild: {0}")]
    DuplicateSpecies(SpeciesId),

    #[error("unknown species id: {0}")]
    UnknownSpecies(SpeciesId),

    /// No table exists for the requested stratum. Surfaced as an explicit
    /// uncalibrated state; a neighbouring tier's table is never substituted.
    #[error("no calibration table for {tier}, {size_class} guilds")]
    CalibrationMissing {
        tier: ClimateTier,
        size_class: SizeClass,
    },

    /// The persisted artifact does not cover the scorer's metric set.
    #[error("calibration table for {tier}, {size_class} guilds is missing metric {metric}")]
    CalibrationSchemaMismatch {
        tier: ClimateTier,
        size_class: SizeClass,
        metric: Metric,
    },

    /// A table was built (or loaded) from fewer samples than the documented
    /// statistical floor.
    #[error(
        "calibration table for {tier}, {size_class} guilds has {got} samples, \
         below the floor of {floor}"
    )]
    UnderSampled {
        tier: ClimateTier,
        size_class: SizeClass,
        got: u64,
        floor: u64,
    },
}
