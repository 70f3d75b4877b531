//! Shared test fixtures

use crate::species::{CsrTriple, NitrogenFixation, Species, SpeciesId, TierSet};
use std::collections::BTreeSet;

/// Build a minimal species record and let the caller fill in what the test
/// needs. Defaults are deliberately inert: no associations, no tiers, no
/// embedding, neutral CSR.
pub fn species_with(id: &str, customize: impl FnOnce(&mut Species)) -> Species {
    let mut species = Species {
        id: SpeciesId::from(id),
        scientific_name: String::new(),
        family: String::new(),
        genus: String::new(),
        height_m: 1.0,
        growth_form: String::new(),
        csr: CsrTriple::default(),
        light_pref: None,
        nitrogen: NitrogenFixation::default(),
        ph_tolerance: None,
        phylo_coords: Vec::new(),
        tiers: TierSet::EMPTY,
        envelope: None,
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
    customize(&mut species);
    species
}
