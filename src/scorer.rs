//! Guild scorer — the online scoring pipeline
//!
//! Gatekeeper → raw scores → percentile normalization → aggregation, over an
//! immutable context assembled once at startup. The whole path is
//! synchronous and pure: cost is bounded by guild-size² (pairwise metrics
//! dominate) and there is no I/O past the initial load.

use crate::calibration::{CalibrationStore, SizeClass};
use crate::climate::{check_target_tier, check_tiers, envelope_warnings, TierCheck};
use crate::climate::VETO_INCOMPATIBLE_TIERS;
use crate::config::ScoreConfig;
use crate::error::ScoreError;
use crate::guild::Guild;
use crate::metrics::{advisory_flags, compute_raw_scores, Metric, RawScoreVector};
use crate::normalize::display_score;
use crate::species::{ClimateTier, Species, SpeciesId};
use crate::store::{BiocontrolTables, KnowledgePaths, SpeciesStore};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Immutable scoring context: knowledge base, relationship tables,
/// calibration tables and configuration. Load once at process start; rebuild
/// (never mutate) when the knowledge base version changes.
pub struct GuildScorer {
    store: SpeciesStore,
    relations: BiocontrolTables,
    calibrations: CalibrationStore,
    config: ScoreConfig,
}

/// Climate portion of a score result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateSummary {
    pub tier: ClimateTier,
    pub warnings: Vec<String>,
}

/// Complete scoring outcome for one guild request.
///
/// A veto is a terminal user-facing state: `veto == true` means no scores
/// were computed, and `veto_reason`/`veto_detail` explain why. A vetoed
/// guild is distinct from a low-scoring one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResult {
    pub veto: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub veto_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub veto_detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f64>,
    /// Display scores (0–100, higher is better) per metric.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<BTreeMap<Metric, f64>>,
    /// Raw metric values; retained for diagnostics and calibration parity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_scores: Option<RawScoreVector>,
    /// Advisory flags (nitrogen, soil pH); pass through unscored.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub flags: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub climate: Option<ClimateSummary>,
}

impl ScoreResult {
    fn vetoed(reason: &str, detail: String) -> Self {
        ScoreResult {
            veto: true,
            veto_reason: Some(reason.to_string()),
            veto_detail: Some(detail),
            overall_score: None,
            metrics: None,
            raw_scores: None,
            flags: BTreeMap::new(),
            climate: None,
        }
    }
}

impl GuildScorer {
    /// Assemble a context from already-loaded parts (tests, embedding).
    pub fn new(
        store: SpeciesStore,
        relations: BiocontrolTables,
        calibrations: CalibrationStore,
        config: ScoreConfig,
    ) -> Self {
        GuildScorer {
            store,
            relations,
            calibrations,
            config,
        }
    }

    /// Load the knowledge base and calibration artifact from disk.
    pub fn load(paths: &KnowledgePaths, calibration_path: &Path) -> Result<Self> {
        let store = SpeciesStore::load(paths).context("loading species knowledge base")?;
        let relations =
            BiocontrolTables::load(paths).context("loading biocontrol relationship tables")?;
        let calibrations =
            CalibrationStore::load(calibration_path).context("loading calibration artifact")?;

        tracing::info!(
            species = store.len(),
            "guild scorer initialized"
        );

        Ok(GuildScorer::new(
            store,
            relations,
            calibrations,
            ScoreConfig::default(),
        ))
    }

    pub fn store(&self) -> &SpeciesStore {
        &self.store
    }

    pub fn relations(&self) -> &BiocontrolTables {
        &self.relations
    }

    pub fn config(&self) -> &ScoreConfig {
        &self.config
    }

    /// Score a guild of species ids against an optional explicit target tier.
    ///
    /// Input errors (too small, duplicates, unknown ids) fail fast. A climate
    /// veto returns a successful `ScoreResult` in the vetoed state. A missing
    /// calibration table surfaces as `CalibrationMissing` — another tier's
    /// table is never substituted.
    pub fn score_guild(
        &self,
        ids: &[SpeciesId],
        target_tier: Option<ClimateTier>,
    ) -> Result<ScoreResult, ScoreError> {
        let guild = Guild::new(ids, self.config.max_guild_size)?;
        let members = self.resolve(&guild)?;

        // Climate tier gatekeeper
        let check = match target_tier {
            Some(tier) => check_target_tier(&members, tier),
            None => check_tiers(&members),
        };
        let shared = match check {
            TierCheck::Shared(shared) => shared,
            TierCheck::Veto { detail } => {
                return Ok(ScoreResult::vetoed(VETO_INCOMPATIBLE_TIERS, detail));
            }
        };

        let size_class = SizeClass::of(guild.len());
        let (tier, table) = self.pick_calibrated_tier(shared, size_class)?;

        // Raw scores through the canonical metric path
        let raw = compute_raw_scores(&members, &self.relations, &self.config.csr);

        // Percentile-normalize each metric against its calibration entry
        let mut display = BTreeMap::new();
        for metric in Metric::ALL {
            let entry =
                table
                    .entry(metric)
                    .ok_or(ScoreError::CalibrationSchemaMismatch {
                        tier,
                        size_class,
                        metric,
                    })?;
            display.insert(metric, display_score(metric, raw.get(metric), entry));
        }

        let overall = self.config.weights.overall(&display);

        Ok(ScoreResult {
            veto: false,
            veto_reason: None,
            veto_detail: None,
            overall_score: Some(overall),
            metrics: Some(display),
            raw_scores: Some(raw),
            flags: advisory_flags(&members),
            climate: Some(ClimateSummary {
                tier,
                warnings: envelope_warnings(&members),
            }),
        })
    }

    /// Raw scores only, bypassing calibration — the entry point the offline
    /// calibration pipeline shares with production scoring.
    pub fn compute_raw(&self, ids: &[SpeciesId]) -> Result<RawScoreVector, ScoreError> {
        let guild = Guild::new(ids, self.config.max_guild_size)?;
        let members = self.resolve(&guild)?;
        Ok(compute_raw_scores(
            &members,
            &self.relations,
            &self.config.csr,
        ))
    }

    fn resolve(&self, guild: &Guild) -> Result<Vec<&Species>, ScoreError> {
        guild
            .members()
            .iter()
            .map(|id| {
                self.store
                    .get(id.as_str())
                    .ok_or_else(|| ScoreError::UnknownSpecies(id.clone()))
            })
            .collect()
    }

    /// Choose the scoring tier: the first shared tier (canonical order) with
    /// a calibration table. When none of the shared tiers is calibrated the
    /// first shared tier is reported as missing; a non-shared tier's table
    /// is never substituted.
    fn pick_calibrated_tier(
        &self,
        shared: crate::species::TierSet,
        size_class: SizeClass,
    ) -> Result<(ClimateTier, &crate::calibration::CalibrationTable), ScoreError> {
        let mut first = None;
        for tier in shared.iter() {
            first.get_or_insert(tier);
            if let Ok(table) = self.calibrations.table(tier, size_class) {
                return Ok((tier, table));
            }
        }
        match first {
            Some(tier) => Err(ScoreError::CalibrationMissing { tier, size_class }),
            // The gatekeeper only passes non-empty tier sets; an empty set
            // here means the guild itself was empty, caught at validation.
            None => Err(ScoreError::GuildTooSmall(0)),
        }
    }
}
