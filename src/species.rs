//! Species records and climate tier membership
//!
//! A `Species` is the immutable per-taxon record assembled by the upstream
//! knowledge-base pipeline: taxonomy, structural traits, CSR strategy,
//! phylogenetic embedding, climate envelope, Köppen tier membership and the
//! organism/fungus association lists the metrics consume. The scoring core
//! only ever reads these records.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

/// Stable taxon identifier assigned by the upstream pipeline.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesId(pub String);

impl SpeciesId {
    pub fn new(id: impl Into<String>) -> Self {
        SpeciesId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SpeciesId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SpeciesId {
    fn from(s: &str) -> Self {
        SpeciesId(s.to_string())
    }
}

/// Köppen-derived climate tier. Six disjoint categories; a species may belong
/// to several (membership is a `TierSet`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ClimateTier {
    #[serde(rename = "tier_1_tropical")]
    Tropical,
    #[serde(rename = "tier_2_mediterranean")]
    Mediterranean,
    #[serde(rename = "tier_3_humid_temperate")]
    HumidTemperate,
    #[serde(rename = "tier_4_continental")]
    Continental,
    #[serde(rename = "tier_5_boreal_polar")]
    BorealPolar,
    #[serde(rename = "tier_6_arid")]
    Arid,
}

impl ClimateTier {
    pub const ALL: [ClimateTier; 6] = [
        ClimateTier::Tropical,
        ClimateTier::Mediterranean,
        ClimateTier::HumidTemperate,
        ClimateTier::Continental,
        ClimateTier::BorealPolar,
        ClimateTier::Arid,
    ];

    /// Stable key used in calibration artifacts and data columns.
    pub fn key(self) -> &'static str {
        match self {
            ClimateTier::Tropical => "tier_1_tropical",
            ClimateTier::Mediterranean => "tier_2_mediterranean",
            ClimateTier::HumidTemperate => "tier_3_humid_temperate",
            ClimateTier::Continental => "tier_4_continental",
            ClimateTier::BorealPolar => "tier_5_boreal_polar",
            ClimateTier::Arid => "tier_6_arid",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ClimateTier::Tropical => "Tier 1 (Tropical)",
            ClimateTier::Mediterranean => "Tier 2 (Mediterranean)",
            ClimateTier::HumidTemperate => "Tier 3 (Humid Temperate)",
            ClimateTier::Continental => "Tier 4 (Continental)",
            ClimateTier::BorealPolar => "Tier 5 (Boreal/Polar)",
            ClimateTier::Arid => "Tier 6 (Arid)",
        }
    }

    fn bit(self) -> u8 {
        match self {
            ClimateTier::Tropical => 1 << 0,
            ClimateTier::Mediterranean => 1 << 1,
            ClimateTier::HumidTemperate => 1 << 2,
            ClimateTier::Continental => 1 << 3,
            ClimateTier::BorealPolar => 1 << 4,
            ClimateTier::Arid => 1 << 5,
        }
    }
}

impl fmt::Display for ClimateTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Climate tier membership bitset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierSet(u8);

impl TierSet {
    pub const EMPTY: TierSet = TierSet(0);

    pub fn from_tiers(tiers: &[ClimateTier]) -> Self {
        let mut set = TierSet::EMPTY;
        for &t in tiers {
            set.insert(t);
        }
        set
    }

    pub fn insert(&mut self, tier: ClimateTier) {
        self.0 |= tier.bit();
    }

    pub fn contains(self, tier: ClimateTier) -> bool {
        self.0 & tier.bit() != 0
    }

    pub fn intersection(self, other: TierSet) -> TierSet {
        TierSet(self.0 & other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_disjoint(self, other: TierSet) -> bool {
        self.intersection(other).is_empty()
    }

    /// Member tiers in canonical order.
    pub fn iter(self) -> impl Iterator<Item = ClimateTier> {
        ClimateTier::ALL.into_iter().filter(move |t| self.contains(*t))
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }
}

impl fmt::Display for TierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for tier in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(tier.display_name())?;
            first = false;
        }
        if first {
            f.write_str("none")?;
        }
        Ok(())
    }
}

/// Occurrence-derived climate tolerance envelope (q05–q95 quantiles).
///
/// Used by the calibration sampler's compatibility index and for non-fatal
/// climate warnings. Never a veto criterion: the tier gatekeeper governs that.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimateEnvelope {
    /// Mean annual temperature bounds (°C).
    pub temp_min: f64,
    pub temp_max: f64,
    /// Annual precipitation bounds (mm).
    pub precip_min: f64,
    pub precip_max: f64,
}

impl ClimateEnvelope {
    /// Shared temperature window width against another envelope (°C).
    /// Negative when the envelopes do not overlap.
    pub fn temp_overlap(&self, other: &ClimateEnvelope) -> f64 {
        self.temp_max.min(other.temp_max) - self.temp_min.max(other.temp_min)
    }

    /// Shared precipitation window width against another envelope (mm).
    pub fn precip_overlap(&self, other: &ClimateEnvelope) -> f64 {
        self.precip_max.min(other.precip_max) - self.precip_min.max(other.precip_min)
    }

    /// Both envelopes overlap in temperature and precipitation.
    pub fn is_compatible(&self, other: &ClimateEnvelope) -> bool {
        self.temp_overlap(other) > 0.0 && self.precip_overlap(other) > 0.0
    }
}

/// Soil pH tolerance range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhRange {
    pub min: f64,
    pub max: f64,
}

impl PhRange {
    /// Intersection of two tolerance ranges, if any.
    pub fn intersect(&self, other: &PhRange) -> Option<PhRange> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        (min <= max).then_some(PhRange { min, max })
    }
}

/// Nitrogen-fixation record: the imputed flag plus model confidence in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NitrogenFixation {
    pub fixer: bool,
    pub confidence: f64,
}

impl NitrogenFixation {
    /// A fixer the advisory check is willing to rely on.
    pub fn is_confident_fixer(&self) -> bool {
        self.fixer && self.confidence >= 0.5
    }
}

/// Grime CSR strategy triple; components are percentages summing to ~100.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CsrTriple {
    pub c: f64,
    pub s: f64,
    pub r: f64,
}

/// Immutable per-species record from the knowledge base.
///
/// All association lists are owned sets of organism identifiers; an empty set
/// means no recorded interactions and contributes zero to every metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Species {
    pub id: SpeciesId,
    pub scientific_name: String,
    pub family: String,
    pub genus: String,

    pub height_m: f64,
    pub growth_form: String,
    pub csr: CsrTriple,
    /// Light preference on the 0–9 indicator scale; `None` when unscored.
    pub light_pref: Option<f64>,
    pub nitrogen: NitrogenFixation,
    pub ph_tolerance: Option<PhRange>,

    /// Full retained phylogenetic eigenvector coordinates. The whole set is
    /// kept; distance over a truncated subset would skew calibration.
    pub phylo_coords: Vec<f64>,

    pub tiers: TierSet,
    pub envelope: Option<ClimateEnvelope>,

    // Fungal associations
    pub pathogenic_fungi: BTreeSet<String>,
    pub host_specific_pathogens: BTreeSet<String>,
    pub mycorrhizal_fungi: BTreeSet<String>,
    pub endophytic_fungi: BTreeSet<String>,
    pub saprotrophic_fungi: BTreeSet<String>,
    pub mycoparasite_fungi: BTreeSet<String>,
    pub entomopathogenic_fungi: BTreeSet<String>,

    // Animal and non-fungal associations
    pub herbivores: BTreeSet<String>,
    pub pollinators: BTreeSet<String>,
    pub flower_visitors: BTreeSet<String>,
    pub other_pathogens: BTreeSet<String>,
}

impl Species {
    /// Whether the species carries any beneficial fungus
    /// (mycorrhizal, endophytic or saprotrophic).
    pub fn has_beneficial_fungi(&self) -> bool {
        !self.mycorrhizal_fungi.is_empty()
            || !self.endophytic_fungi.is_empty()
            || !self.saprotrophic_fungi.is_empty()
    }

    /// Scientific name when recorded, id otherwise; for user-facing messages.
    pub fn scientific_name_or_id(&self) -> &str {
        if self.scientific_name.is_empty() {
            self.id.as_str()
        } else {
            &self.scientific_name
        }
    }
}
