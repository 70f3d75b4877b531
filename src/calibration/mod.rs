//! Calibration tables
//!
//! Raw metric values are meaningless in isolation; they acquire meaning as a
//! rank within a distribution of comparable guilds. That distribution is
//! stratified by (climate tier × guild-size class) and persisted offline as
//! one JSON artifact: per metric, 13 percentile breakpoints plus mean, std
//! and sample count.
//!
//! Loading validates two invariants: every table covers the scorer's full
//! metric set (schema mismatch is a hard failure) and every entry meets the
//! documented sample-size floor.

pub mod generator;
pub mod sample_size;
pub mod sampler;

pub use generator::{CalibrationConfig, CalibrationGenerator};
pub use sampler::GuildSampler;

use crate::error::ScoreError;
use crate::metrics::Metric;
use crate::normalize::PERCENTILES;
use crate::species::ClimateTier;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Guild-size calibration stratum. Pairs behave statistically unlike larger
/// plantings, so they get their own distributions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SizeClass {
    #[serde(rename = "pair")]
    Pair,
    #[serde(rename = "community")]
    Community,
}

impl SizeClass {
    pub fn of(guild_size: usize) -> SizeClass {
        if guild_size <= 2 {
            SizeClass::Pair
        } else {
            SizeClass::Community
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            SizeClass::Pair => "pair",
            SizeClass::Community => "community",
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Calibration distribution summary for one metric in one stratum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationEntry {
    pub p1: f64,
    pub p5: f64,
    pub p10: f64,
    pub p20: f64,
    pub p30: f64,
    pub p40: f64,
    pub p50: f64,
    pub p60: f64,
    pub p70: f64,
    pub p80: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
    pub mean: f64,
    pub std: f64,
    pub n_samples: u64,
}

impl CalibrationEntry {
    /// Breakpoints aligned with `normalize::PERCENTILES`.
    pub fn breakpoints(&self) -> [f64; 13] {
        [
            self.p1, self.p5, self.p10, self.p20, self.p30, self.p40, self.p50, self.p60,
            self.p70, self.p80, self.p90, self.p95, self.p99,
        ]
    }

    pub fn from_breakpoints(breakpoints: [f64; 13], mean: f64, std: f64, n_samples: u64) -> Self {
        let [p1, p5, p10, p20, p30, p40, p50, p60, p70, p80, p90, p95, p99] = breakpoints;
        CalibrationEntry {
            p1,
            p5,
            p10,
            p20,
            p30,
            p40,
            p50,
            p60,
            p70,
            p80,
            p90,
            p95,
            p99,
            mean,
            std,
            n_samples,
        }
    }

    /// Summarize a sample of raw values. Breakpoint at level p is the sorted
    /// value at index `round(p/100 × (n−1))`.
    pub fn from_samples(values: &[f64]) -> CalibrationEntry {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mut breakpoints = [0.0; 13];
        if !sorted.is_empty() {
            for (slot, &p) in breakpoints.iter_mut().zip(PERCENTILES.iter()) {
                let index = (p / 100.0 * (sorted.len() - 1) as f64).round() as usize;
                *slot = sorted[index.min(sorted.len() - 1)];
            }
        }

        let n = sorted.len() as f64;
        let mean = if n > 0.0 { sorted.iter().sum::<f64>() / n } else { 0.0 };
        let variance = if n > 0.0 {
            sorted.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n
        } else {
            0.0
        };

        CalibrationEntry::from_breakpoints(breakpoints, mean, variance.sqrt(), sorted.len() as u64)
    }
}

/// Per-metric entries for one (tier, size class) stratum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalibrationTable {
    pub entries: BTreeMap<Metric, CalibrationEntry>,
}

impl CalibrationTable {
    pub fn entry(&self, metric: Metric) -> Option<&CalibrationEntry> {
        self.entries.get(&metric)
    }
}

/// All calibration tables known to the process, keyed by tier and size class.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalibrationStore {
    tiers: BTreeMap<ClimateTier, BTreeMap<SizeClass, CalibrationTable>>,
}

impl CalibrationStore {
    pub fn new() -> Self {
        CalibrationStore::default()
    }

    pub fn insert(&mut self, tier: ClimateTier, size_class: SizeClass, table: CalibrationTable) {
        self.tiers.entry(tier).or_default().insert(size_class, table);
    }

    /// Table for a stratum. A missing table is an explicit uncalibrated
    /// state; a neighbouring tier's table is never substituted.
    pub fn table(
        &self,
        tier: ClimateTier,
        size_class: SizeClass,
    ) -> Result<&CalibrationTable, ScoreError> {
        self.tiers
            .get(&tier)
            .and_then(|by_class| by_class.get(&size_class))
            .ok_or(ScoreError::CalibrationMissing { tier, size_class })
    }

    pub fn has_table(&self, tier: ClimateTier, size_class: SizeClass) -> bool {
        self.table(tier, size_class).is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Validate schema and sample-size invariants for every stored table.
    pub fn validate(&self, floor: u64) -> Result<(), ScoreError> {
        for (&tier, by_class) in &self.tiers {
            for (&size_class, table) in by_class {
                for metric in Metric::ALL {
                    let entry = table.entry(metric).ok_or(
                        ScoreError::CalibrationSchemaMismatch {
                            tier,
                            size_class,
                            metric,
                        },
                    )?;
                    if entry.n_samples < floor {
                        return Err(ScoreError::UnderSampled {
                            tier,
                            size_class,
                            got: entry.n_samples,
                            floor,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Load and validate the persisted artifact.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read calibration file: {:?}", path))?;
        let store: CalibrationStore = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse calibration JSON: {:?}", path))?;
        store
            .validate(sample_size::MIN_SAMPLES)
            .context("calibration artifact failed validation")?;
        tracing::info!(tiers = store.tiers.len(), "calibration store loaded");
        Ok(store)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write calibration file: {:?}", path))?;
        Ok(())
    }
}
