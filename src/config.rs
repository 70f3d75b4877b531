//! Scoring configuration
//!
//! The CSR conflict weights and the aggregation weights originate from an
//! external agronomic lookup, so they are injectable data rather than code.
//! The defaults reproduce the published framework values.

use crate::guild::DEFAULT_MAX_GUILD_SIZE;
use crate::metrics::Metric;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Thresholds and pairwise weights for the CSR conflict metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrConflictConfig {
    /// A member counts as competitive / stress-tolerant / ruderal above these.
    pub high_c: f64,
    pub high_s: f64,
    pub high_r: f64,

    /// Two canopy competitors contesting the same space.
    pub weight_cc: f64,
    /// Competitor over a shade-adapted stress-tolerator: no conflict.
    pub weight_cs_shade: f64,
    /// Competitor over a stress-tolerator of unknown or flexible light needs.
    pub weight_cs_neutral: f64,
    /// Competitor shading out a sun-demanding stress-tolerator.
    pub weight_cs_sun: f64,
    /// Competitor suppressing a ruderal.
    pub weight_cr: f64,
    /// Two short-lived ruderals; mild.
    pub weight_rr: f64,

    /// Light-preference cutoffs on the 0–9 indicator scale.
    pub shade_below: f64,
    pub sun_above: f64,
}

impl Default for CsrConflictConfig {
    fn default() -> Self {
        CsrConflictConfig {
            high_c: 60.0,
            high_s: 60.0,
            high_r: 50.0,
            weight_cc: 1.0,
            weight_cs_shade: 0.0,
            weight_cs_neutral: 0.6,
            weight_cs_sun: 0.9,
            weight_cr: 0.8,
            weight_rr: 0.3,
            shade_below: 3.2,
            sun_above: 7.5,
        }
    }
}

/// Fixed per-metric weights for the overall score.
///
/// The overall score is the weighted mean of display scores; it is never
/// re-percentiled. Weights are relative and normalized by their sum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationWeights {
    weights: BTreeMap<Metric, f64>,
}

impl Default for AggregationWeights {
    fn default() -> Self {
        let weights = BTreeMap::from([
            (Metric::PathogenOverlap, 0.35),
            (Metric::HerbivoreOverlap, 0.35),
            (Metric::CsrConflict, 0.20),
            (Metric::Biocontrol, 0.25),
            (Metric::PathogenControl, 0.20),
            (Metric::BeneficialFungi, 0.15),
            (Metric::PhyloDiversity, 0.20),
            (Metric::Stratification, 0.10),
            (Metric::PollinatorSharing, 0.10),
        ]);
        AggregationWeights { weights }
    }
}

impl AggregationWeights {
    pub fn weight(&self, metric: Metric) -> f64 {
        self.weights.get(&metric).copied().unwrap_or(0.0)
    }

    /// Weighted mean of display scores. Display scores are already in
    /// [0, 100], so the mean is too.
    pub fn overall(&self, display: &BTreeMap<Metric, f64>) -> f64 {
        let mut weighted = 0.0;
        let mut total = 0.0;
        for (metric, score) in display {
            let w = self.weight(*metric);
            weighted += w * score;
            total += w;
        }
        if total > 0.0 {
            weighted / total
        } else {
            0.0
        }
    }
}

/// Online scoring configuration bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreConfig {
    pub max_guild_size: usize,
    pub csr: CsrConflictConfig,
    pub weights: AggregationWeights,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        ScoreConfig {
            max_guild_size: DEFAULT_MAX_GUILD_SIZE,
            csr: CsrConflictConfig::default(),
            weights: AggregationWeights::default(),
        }
    }
}
