//! guildscore — ecological compatibility scoring for multi-species plantings
//!
//! Computes one interpretable 0–100 score for a candidate guild, with a
//! per-metric breakdown and a human-readable explanation:
//! - `climate`: tier gatekeeper (veto on incompatible climate tiers)
//! - `metrics`: pure raw-score functions per compatibility dimension
//! - `calibration`: Monte-Carlo percentile tables per (tier × size class)
//! - `normalize`: shared piecewise-linear percentile interpolation
//! - `scorer`: the online pipeline over an immutable, load-once context
//! - `explanation`: rule-based prose generation
//!
//! Raw metric values are unbounded and only acquire meaning as a rank within
//! a calibration distribution of comparable guilds; the offline pipeline in
//! `calibration::generator` builds those distributions with the same metric
//! code the scorer uses.

pub mod calibration;
pub mod climate;
pub mod config;
pub mod error;
pub mod explanation;
pub mod guild;
pub mod metrics;
pub mod normalize;
pub mod scorer;
pub mod species;
pub mod store;

#[cfg(test)]
pub mod testutil;

pub use calibration::{
    CalibrationConfig, CalibrationEntry, CalibrationGenerator, CalibrationStore,
    CalibrationTable, SizeClass,
};
pub use config::{AggregationWeights, CsrConflictConfig, ScoreConfig};
pub use error::ScoreError;
pub use explanation::{generate_explanation, Explanation};
pub use guild::Guild;
pub use metrics::{compute_raw_scores, Metric, RawScoreVector};
pub use scorer::{ClimateSummary, GuildScorer, ScoreResult};
pub use species::{ClimateTier, Species, SpeciesId, TierSet};
pub use store::{BiocontrolTables, KnowledgePaths, SpeciesStore};
