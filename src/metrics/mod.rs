//! Metric modules for guild scoring
//!
//! One pure, order-independent function per metric, all defined for guild
//! size ≥ 2. Raw scores are unbounded scalars that only acquire meaning
//! relative to their calibration distribution; no saturation transform is
//! applied here. Missing association data contributes zero.

pub mod advisory;
pub mod n1_pathogen_overlap;
pub mod n2_herbivore_overlap;
pub mod n4_csr_conflicts;
pub mod p12_biocontrol;
pub mod p3_beneficial_fungi;
pub mod p4_phylo_diversity;
pub mod p5_stratification;
pub mod p6_pollinator_overlap;
pub mod shared;

pub use advisory::{advisory_flags, AdvisoryFlags};
pub use n1_pathogen_overlap::pathogen_overlap;
pub use n2_herbivore_overlap::herbivore_overlap;
pub use n4_csr_conflicts::csr_conflicts;
pub use p12_biocontrol::{biocontrol, pathogen_control};
pub use p3_beneficial_fungi::beneficial_fungi;
pub use p4_phylo_diversity::phylo_diversity;
pub use p5_stratification::stratification;
pub use p6_pollinator_overlap::pollinator_sharing;
pub use shared::count_shared_organisms;

use crate::config::CsrConflictConfig;
use crate::species::Species;
use crate::store::BiocontrolTables;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Percentile-scored compatibility metrics.
///
/// N-metrics measure shared risk (displayed inverted); P-metrics measure
/// shared benefit. The nitrogen and soil-pH checks are advisory flags, not
/// metrics, and never appear here.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Metric {
    #[serde(rename = "n1")]
    PathogenOverlap,
    #[serde(rename = "n2")]
    HerbivoreOverlap,
    #[serde(rename = "n4")]
    CsrConflict,
    #[serde(rename = "p1")]
    Biocontrol,
    #[serde(rename = "p2")]
    PathogenControl,
    #[serde(rename = "p3")]
    BeneficialFungi,
    #[serde(rename = "p4")]
    PhyloDiversity,
    #[serde(rename = "p5")]
    Stratification,
    #[serde(rename = "p6")]
    PollinatorSharing,
}

impl Metric {
    pub const ALL: [Metric; 9] = [
        Metric::PathogenOverlap,
        Metric::HerbivoreOverlap,
        Metric::CsrConflict,
        Metric::Biocontrol,
        Metric::PathogenControl,
        Metric::BeneficialFungi,
        Metric::PhyloDiversity,
        Metric::Stratification,
        Metric::PollinatorSharing,
    ];

    /// Stable key used in calibration artifacts and payloads.
    pub fn key(self) -> &'static str {
        match self {
            Metric::PathogenOverlap => "n1",
            Metric::HerbivoreOverlap => "n2",
            Metric::CsrConflict => "n4",
            Metric::Biocontrol => "p1",
            Metric::PathogenControl => "p2",
            Metric::BeneficialFungi => "p3",
            Metric::PhyloDiversity => "p4",
            Metric::Stratification => "p5",
            Metric::PollinatorSharing => "p6",
        }
    }

    /// Risk metrics display as `100 − percentile rank`.
    pub fn is_risk(self) -> bool {
        matches!(
            self,
            Metric::PathogenOverlap | Metric::HerbivoreOverlap | Metric::CsrConflict
        )
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Metric::PathogenOverlap => "Shared Disease Pressure",
            Metric::HerbivoreOverlap => "Shared Pest Pressure",
            Metric::CsrConflict => "Growth Strategy Conflicts",
            Metric::Biocontrol => "Natural Pest Control",
            Metric::PathogenControl => "Disease Suppression",
            Metric::BeneficialFungi => "Beneficial Fungal Networks",
            Metric::PhyloDiversity => "Phylogenetic Diversity",
            Metric::Stratification => "Vertical Structure",
            Metric::PollinatorSharing => "Pollinator Support",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Raw metric values for one guild. Deterministic and invariant under
/// permutation of the member list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawScoreVector {
    pub n1: f64,
    pub n2: f64,
    pub n4: f64,
    pub p1: f64,
    pub p2: f64,
    pub p3: f64,
    pub p4: f64,
    pub p5: f64,
    pub p6: f64,
}

impl RawScoreVector {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::PathogenOverlap => self.n1,
            Metric::HerbivoreOverlap => self.n2,
            Metric::CsrConflict => self.n4,
            Metric::Biocontrol => self.p1,
            Metric::PathogenControl => self.p2,
            Metric::BeneficialFungi => self.p3,
            Metric::PhyloDiversity => self.p4,
            Metric::Stratification => self.p5,
            Metric::PollinatorSharing => self.p6,
        }
    }
}

/// Compute all raw metric values for a resolved guild.
///
/// This is the canonical code path: the online scorer and the offline
/// calibration pipeline both call it, so calibration distributions and
/// production scores are always produced by identical logic.
pub fn compute_raw_scores(
    members: &[&Species],
    relations: &BiocontrolTables,
    csr: &CsrConflictConfig,
) -> RawScoreVector {
    RawScoreVector {
        n1: pathogen_overlap(members),
        n2: herbivore_overlap(members),
        n4: csr_conflicts(members, csr),
        p1: biocontrol(members, relations),
        p2: pathogen_control(members, relations),
        p3: beneficial_fungi(members),
        p4: phylo_diversity(members),
        p5: stratification(members),
        p6: pollinator_sharing(members),
    }
}
