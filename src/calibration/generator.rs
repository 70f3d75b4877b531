//! Offline calibration pipeline
//!
//! For every (climate tier × guild-size class) stratum: sample guilds,
//! compute raw score vectors through the canonical metric code path, and
//! summarize each metric's distribution into a `CalibrationEntry`.
//!
//! Raw-score computation across guilds shares no mutable state, so the work
//! fans out over rayon and merges by plain concatenation; percentiles are
//! computed after the merge. A stratum that cannot reach the sample floor is
//! halted — an under-sampled table is never published.
//!
//! Tables must be regenerated whenever the knowledge base changes.

use crate::calibration::sample_size::{MIN_SAMPLES, RECOMMENDED_SAMPLES};
use crate::calibration::{
    CalibrationEntry, CalibrationStore, CalibrationTable, GuildSampler, SizeClass,
};
use crate::config::CsrConflictConfig;
use crate::error::ScoreError;
use crate::metrics::{compute_raw_scores, Metric, RawScoreVector};
use crate::species::{ClimateTier, Species, SpeciesId};
use crate::store::{BiocontrolTables, SpeciesStore};
use rayon::prelude::*;

/// Calibration run parameters.
#[derive(Debug, Clone)]
pub struct CalibrationConfig {
    /// Guilds sampled per (tier, size class) stratum.
    pub guilds_per_stratum: usize,
    /// Member count used for the community size class.
    pub community_size: usize,
    /// Valid samples below this halt the stratum.
    pub sample_floor: u64,
    /// Seed for reproducible sampling.
    pub seed: u64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        CalibrationConfig {
            guilds_per_stratum: RECOMMENDED_SAMPLES as usize,
            community_size: 5,
            sample_floor: MIN_SAMPLES,
            seed: 0x5eed,
        }
    }
}

/// Drives calibration over a knowledge-base snapshot.
pub struct CalibrationGenerator<'a> {
    store: &'a SpeciesStore,
    relations: &'a BiocontrolTables,
    csr: CsrConflictConfig,
    config: CalibrationConfig,
}

impl<'a> CalibrationGenerator<'a> {
    pub fn new(
        store: &'a SpeciesStore,
        relations: &'a BiocontrolTables,
        csr: CsrConflictConfig,
        config: CalibrationConfig,
    ) -> Self {
        CalibrationGenerator {
            store,
            relations,
            csr,
            config,
        }
    }

    /// Calibrate every tier and size class. Failed strata are reported and
    /// excluded; the returned store only ever holds tables that met the
    /// floor.
    pub fn run(&self) -> (CalibrationStore, Vec<ScoreError>) {
        let mut store = CalibrationStore::new();
        let mut failures = Vec::new();

        for tier in ClimateTier::ALL {
            for size_class in [SizeClass::Pair, SizeClass::Community] {
                match self.calibrate_stratum(tier, size_class) {
                    Ok(table) => store.insert(tier, size_class, table),
                    Err(err) => {
                        tracing::warn!(%tier, %size_class, %err, "stratum halted");
                        failures.push(err);
                    }
                }
            }
        }

        (store, failures)
    }

    /// Calibrate one (tier, size class) stratum.
    pub fn calibrate_stratum(
        &self,
        tier: ClimateTier,
        size_class: SizeClass,
    ) -> Result<CalibrationTable, ScoreError> {
        let guild_size = match size_class {
            SizeClass::Pair => 2,
            SizeClass::Community => self.config.community_size,
        };

        let pool = self.store.tier_members(tier);
        tracing::info!(
            %tier,
            %size_class,
            pool = pool.len(),
            "calibrating stratum"
        );

        // Stratum-specific seed keeps runs reproducible without correlating
        // the strata with one another.
        let seed = self
            .config
            .seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(tier as u64 * 31 + guild_size as u64);
        let mut sampler = GuildSampler::new(tier, pool, seed);
        let guilds = sampler.sample_guilds(guild_size, self.config.guilds_per_stratum);

        let raw_vectors = self.score_guilds(&guilds);

        if (raw_vectors.len() as u64) < self.config.sample_floor {
            return Err(ScoreError::UnderSampled {
                tier,
                size_class,
                got: raw_vectors.len() as u64,
                floor: self.config.sample_floor,
            });
        }

        Ok(build_table(&raw_vectors))
    }

    /// Compute raw vectors for sampled guilds in parallel. Guilds share no
    /// state; results merge by concatenation, order irrelevant.
    fn score_guilds(&self, guilds: &[Vec<SpeciesId>]) -> Vec<RawScoreVector> {
        guilds
            .par_iter()
            .filter_map(|guild| {
                let members: Option<Vec<&Species>> = guild
                    .iter()
                    .map(|id| self.store.get(id.as_str()))
                    .collect();
                members.map(|m| compute_raw_scores(&m, self.relations, &self.csr))
            })
            .collect()
    }
}

/// Summarize raw vectors into per-metric calibration entries.
fn build_table(raw_vectors: &[RawScoreVector]) -> CalibrationTable {
    let mut table = CalibrationTable::default();
    for metric in Metric::ALL {
        let values: Vec<f64> = raw_vectors.iter().map(|v| v.get(metric)).collect();
        table
            .entries
            .insert(metric, CalibrationEntry::from_samples(&values));
    }
    table
}
