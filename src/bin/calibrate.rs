//! Calibration pipeline driver
//!
//! Samples guilds per (climate tier × size class) stratum, scores them
//! through the canonical metric path, and writes the percentile artifact the
//! online scorer loads. Strata that cannot meet the sample floor are halted
//! and reported; an under-sampled table is never written.
//!
//! Usage:
//!   calibrate <data_dir> [output.json]
//!
//! Expects in <data_dir>: species.parquet, interactions.csv,
//! herbivore_predators.csv, herbivore_parasites.csv, pathogen_antagonists.csv

use anyhow::{bail, Context, Result};
use guildscore::calibration::{CalibrationConfig, CalibrationGenerator};
use guildscore::config::CsrConflictConfig;
use guildscore::store::{BiocontrolTables, KnowledgePaths, SpeciesStore};
use std::path::PathBuf;
use std::time::Instant;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let data_dir = PathBuf::from(
        args.next()
            .context("usage: calibrate <data_dir> [output.json]")?,
    );
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| data_dir.join("calibration.json"));

    let paths = KnowledgePaths {
        species_parquet: data_dir.join("species.parquet"),
        interactions_csv: data_dir.join("interactions.csv"),
        herbivore_predators_csv: data_dir.join("herbivore_predators.csv"),
        herbivore_parasites_csv: data_dir.join("herbivore_parasites.csv"),
        pathogen_antagonists_csv: data_dir.join("pathogen_antagonists.csv"),
    };

    let total_start = Instant::now();

    tracing::info!("loading knowledge base from {:?}", data_dir);
    let store = SpeciesStore::load(&paths)?;
    let relations = BiocontrolTables::load(&paths)?;

    let config = CalibrationConfig::default();
    tracing::info!(
        guilds_per_stratum = config.guilds_per_stratum,
        community_size = config.community_size,
        sample_floor = config.sample_floor,
        "starting calibration"
    );

    let generator =
        CalibrationGenerator::new(&store, &relations, CsrConflictConfig::default(), config);
    let (calibrations, failures) = generator.run();

    for failure in &failures {
        tracing::error!(%failure, "stratum not published");
    }

    if calibrations.is_empty() {
        bail!("no stratum reached the sample floor; nothing to publish");
    }

    calibrations
        .save(&output)
        .with_context(|| format!("writing {:?}", output))?;

    tracing::info!(
        elapsed_s = total_start.elapsed().as_secs_f64(),
        failed_strata = failures.len(),
        "calibration artifact written to {:?}",
        output
    );

    if !failures.is_empty() {
        bail!(
            "{} stratum/strata halted below the sample floor; artifact covers the rest",
            failures.len()
        );
    }

    Ok(())
}
