//! Knowledge-base loading
//!
//! Loads the upstream pipeline's artifacts into typed, immutable records:
//! a species Parquet (traits, CSR, climate tiers, envelope, phylogenetic
//! eigenvectors), an interactions CSV (pipe-separated association lists) and
//! three relationship CSVs (pest→predator, pest→fungal parasite,
//! pathogen→antagonist). Everything is read once at startup; the resulting
//! store is read-only for the life of the process.

use crate::species::{
    ClimateEnvelope, ClimateTier, CsrTriple, NitrogenFixation, PhRange, Species, SpeciesId,
    TierSet,
};
use anyhow::{Context, Result};
use polars::prelude::*;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// File locations for one knowledge-base snapshot.
#[derive(Debug, Clone)]
pub struct KnowledgePaths {
    pub species_parquet: PathBuf,
    pub interactions_csv: PathBuf,
    pub herbivore_predators_csv: PathBuf,
    pub herbivore_parasites_csv: PathBuf,
    pub pathogen_antagonists_csv: PathBuf,
}

/// External cross-species relationship tables backing P1/P2.
///
/// Key → pipe-separated agent lists in the source CSVs; injected data, never
/// inferred by the scorer.
#[derive(Debug, Clone, Default)]
pub struct BiocontrolTables {
    /// Herbivore id → predator ids.
    pub herbivore_predators: FxHashMap<String, Vec<String>>,
    /// Herbivore id → entomopathogenic fungus ids.
    pub herbivore_parasites: FxHashMap<String, Vec<String>>,
    /// Pathogen id → antagonist fungus ids.
    pub pathogen_antagonists: FxHashMap<String, Vec<String>>,
}

impl BiocontrolTables {
    pub fn load(paths: &KnowledgePaths) -> Result<Self> {
        Ok(BiocontrolTables {
            herbivore_predators: load_lookup_table(
                &paths.herbivore_predators_csv,
                "herbivore",
                "predators",
            )?,
            herbivore_parasites: load_lookup_table(
                &paths.herbivore_parasites_csv,
                "herbivore",
                "entomopathogenic_fungi",
            )?,
            pathogen_antagonists: load_lookup_table(
                &paths.pathogen_antagonists_csv,
                "pathogen",
                "antagonists",
            )?,
        })
    }
}

/// Immutable in-memory species store with lookup-by-id.
#[derive(Debug, Default)]
pub struct SpeciesStore {
    by_id: FxHashMap<SpeciesId, Species>,
}

impl SpeciesStore {
    /// Build a store from already-materialized records (tests, embedding).
    pub fn from_species(records: impl IntoIterator<Item = Species>) -> Self {
        let by_id = records.into_iter().map(|s| (s.id.clone(), s)).collect();
        SpeciesStore { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&Species> {
        self.by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Species> {
        self.by_id.values()
    }

    /// Species belonging to a climate tier, in deterministic id order.
    pub fn tier_members(&self, tier: ClimateTier) -> Vec<&Species> {
        let mut members: Vec<&Species> = self
            .by_id
            .values()
            .filter(|s| s.tiers.contains(tier))
            .collect();
        members.sort_by(|a, b| a.id.cmp(&b.id));
        members
    }

    /// Load the species Parquet and merge in the interactions CSV.
    pub fn load(paths: &KnowledgePaths) -> Result<Self> {
        let species_df = scan_species(&paths.species_parquet)?;
        let mut by_id = materialize_species(&species_df)
            .with_context(|| format!("reading {:?}", paths.species_parquet))?;

        let interactions_df = read_csv(&paths.interactions_csv)?;
        merge_interactions(&mut by_id, &interactions_df)
            .with_context(|| format!("reading {:?}", paths.interactions_csv))?;

        tracing::info!(species = by_id.len(), "species store loaded");
        Ok(SpeciesStore { by_id })
    }
}

fn scan_species(path: &Path) -> Result<DataFrame> {
    LazyFrame::scan_parquet(path, Default::default())
        .with_context(|| format!("failed to scan parquet: {:?}", path))?
        .collect()
        .with_context(|| format!("failed to load species parquet: {:?}", path))
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("failed to open CSV: {:?}", path))?
        .finish()
        .with_context(|| format!("failed to read CSV: {:?}", path))
}

/// Column helpers tolerating absent optional columns.
fn opt_f64(df: &DataFrame, name: &str, idx: usize) -> Option<f64> {
    df.column(name).ok()?.f64().ok()?.get(idx)
}

fn opt_str(df: &DataFrame, name: &str, idx: usize) -> Option<String> {
    df.column(name)
        .ok()?
        .str()
        .ok()?
        .get(idx)
        .map(|s| s.to_string())
}

fn opt_bool(df: &DataFrame, name: &str, idx: usize) -> Option<bool> {
    let col = df.column(name).ok()?;
    if let Ok(bools) = col.bool() {
        bools.get(idx)
    } else if let Ok(ints) = col.i32() {
        ints.get(idx).map(|v| v == 1)
    } else if let Ok(ints) = col.i64() {
        ints.get(idx).map(|v| v == 1)
    } else {
        None
    }
}

fn materialize_species(df: &DataFrame) -> Result<FxHashMap<SpeciesId, Species>> {
    let ids = df
        .column("species_id")
        .context("species parquet missing 'species_id'")?
        .str()
        .context("'species_id' is not a string column")?;

    // The embedding dimension is whatever the pipeline retained; discover the
    // full set so no coordinate is dropped.
    let mut ev_columns: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|c| c.to_string())
        .filter(|c| c.starts_with("phylo_ev"))
        .collect();
    ev_columns.sort_by_key(|c| {
        c.trim_start_matches("phylo_ev")
            .parse::<usize>()
            .unwrap_or(usize::MAX)
    });

    let mut by_id: FxHashMap<SpeciesId, Species> = FxHashMap::default();

    for idx in 0..df.height() {
        let Some(raw_id) = ids.get(idx) else { continue };
        let id = SpeciesId::new(raw_id);

        let mut tiers = TierSet::EMPTY;
        for tier in ClimateTier::ALL {
            if opt_bool(df, tier.key(), idx).unwrap_or(false) {
                tiers.insert(tier);
            }
        }

        let envelope = match (
            opt_f64(df, "temp_q05", idx),
            opt_f64(df, "temp_q95", idx),
            opt_f64(df, "precip_q05", idx),
            opt_f64(df, "precip_q95", idx),
        ) {
            (Some(temp_min), Some(temp_max), Some(precip_min), Some(precip_max)) => {
                Some(ClimateEnvelope {
                    temp_min,
                    temp_max,
                    precip_min,
                    precip_max,
                })
            }
            _ => None,
        };

        let ph_tolerance = match (opt_f64(df, "ph_min", idx), opt_f64(df, "ph_max", idx)) {
            (Some(min), Some(max)) if min <= max => Some(PhRange { min, max }),
            _ => None,
        };

        let mut phylo_coords = Vec::with_capacity(ev_columns.len());
        for col in &ev_columns {
            match opt_f64(df, col, idx) {
                Some(v) => phylo_coords.push(v),
                None => {
                    // A species with a partial embedding cannot be placed in
                    // eigenvector space; drop the coordinates entirely.
                    phylo_coords.clear();
                    break;
                }
            }
        }

        let species = Species {
            id: id.clone(),
            scientific_name: opt_str(df, "scientific_name", idx).unwrap_or_default(),
            family: opt_str(df, "family", idx).unwrap_or_default(),
            genus: opt_str(df, "genus", idx).unwrap_or_default(),
            height_m: opt_f64(df, "height_m", idx).unwrap_or(f64::NAN),
            growth_form: opt_str(df, "growth_form", idx).unwrap_or_default(),
            csr: CsrTriple {
                c: opt_f64(df, "csr_c", idx).unwrap_or(0.0),
                s: opt_f64(df, "csr_s", idx).unwrap_or(0.0),
                r: opt_f64(df, "csr_r", idx).unwrap_or(0.0),
            },
            light_pref: opt_f64(df, "light_pref", idx),
            nitrogen: NitrogenFixation {
                fixer: opt_bool(df, "nitrogen_fixer", idx).unwrap_or(false),
                confidence: opt_f64(df, "nitrogen_confidence", idx).unwrap_or(0.0),
            },
            ph_tolerance,
            phylo_coords,
            tiers,
            envelope,
            pathogenic_fungi: BTreeSet::new(),
            host_specific_pathogens: BTreeSet::new(),
            mycorrhizal_fungi: BTreeSet::new(),
            endophytic_fungi: BTreeSet::new(),
            saprotrophic_fungi: BTreeSet::new(),
            mycoparasite_fungi: BTreeSet::new(),
            entomopathogenic_fungi: BTreeSet::new(),
            herbivores: BTreeSet::new(),
            pollinators: BTreeSet::new(),
            flower_visitors: BTreeSet::new(),
            other_pathogens: BTreeSet::new(),
        };

        by_id.insert(id, species);
    }

    Ok(by_id)
}

/// Pipe-separated interaction columns keyed by species id. Absent columns or
/// rows simply leave the corresponding sets empty.
fn merge_interactions(
    by_id: &mut FxHashMap<SpeciesId, Species>,
    df: &DataFrame,
) -> Result<()> {
    let ids = df
        .column("species_id")
        .context("interactions CSV missing 'species_id'")?
        .str()
        .context("'species_id' is not a string column")?;

    type ListField = (
        &'static str,
        fn(&mut Species) -> &mut BTreeSet<String>,
    );
    let fields: [ListField; 11] = [
        ("pathogenic_fungi", |s| &mut s.pathogenic_fungi),
        ("pathogenic_fungi_host_specific", |s| {
            &mut s.host_specific_pathogens
        }),
        ("mycorrhizal_fungi", |s| &mut s.mycorrhizal_fungi),
        ("endophytic_fungi", |s| &mut s.endophytic_fungi),
        ("saprotrophic_fungi", |s| &mut s.saprotrophic_fungi),
        ("mycoparasite_fungi", |s| &mut s.mycoparasite_fungi),
        ("entomopathogenic_fungi", |s| &mut s.entomopathogenic_fungi),
        ("herbivores", |s| &mut s.herbivores),
        ("pollinators", |s| &mut s.pollinators),
        ("flower_visitors", |s| &mut s.flower_visitors),
        ("other_pathogens", |s| &mut s.other_pathogens),
    ];

    for idx in 0..df.height() {
        let Some(raw_id) = ids.get(idx) else { continue };
        let Some(species) = by_id.get_mut(raw_id) else {
            continue; // interaction row for a species outside the snapshot
        };

        for &(column, accessor) in &fields {
            if let Some(cell) = opt_str(df, column, idx) {
                let set = accessor(species);
                for organism in cell.split('|').filter(|s| !s.is_empty()) {
                    set.insert(organism.to_string());
                }
            }
        }
    }

    Ok(())
}

/// Load a key → pipe-separated-values CSV into a lookup map.
fn load_lookup_table(
    path: &Path,
    key_col: &str,
    value_col: &str,
) -> Result<FxHashMap<String, Vec<String>>> {
    let df = read_csv(path)?;

    let keys = df
        .column(key_col)
        .with_context(|| format!("column '{key_col}' not found in {:?}", path))?
        .str()
        .with_context(|| format!("column '{key_col}' is not a string column"))?;
    let values = df
        .column(value_col)
        .with_context(|| format!("column '{value_col}' not found in {:?}", path))?
        .str()
        .with_context(|| format!("column '{value_col}' is not a string column"))?;

    let mut map = FxHashMap::default();
    for idx in 0..df.height() {
        if let (Some(key), Some(value_str)) = (keys.get(idx), values.get(idx)) {
            let agents: Vec<String> = value_str
                .split('|')
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
                .collect();
            if !agents.is_empty() {
                map.insert(key.to_string(), agents);
            }
        }
    }

    Ok(map)
}
