//! P1/P2: Cross-member biocontrol and pathogen antagonism
//!
//! Counts protective relationships where a pest or pathogen of one member is
//! controlled by an agent hosted on a DIFFERENT member. The pest→agent and
//! pathogen→antagonist mappings are external relationship tables injected via
//! `BiocontrolTables`; the guild only supplies who hosts what.

use crate::species::Species;
use crate::store::BiocontrolTables;

/// Raw P1 value: count of cross-member (herbivore on A, control agent on B≠A)
/// relationships.
///
/// Two mechanisms, both from the relationship tables:
/// - a predator of A's herbivore visiting B's flowers;
/// - an entomopathogenic fungus of A's herbivore hosted by B.
pub fn biocontrol(members: &[&Species], relations: &BiocontrolTables) -> f64 {
    let mut matches = 0usize;

    for (ai, vulnerable) in members.iter().enumerate() {
        if vulnerable.herbivores.is_empty() {
            continue;
        }
        for (bi, protector) in members.iter().enumerate() {
            if ai == bi {
                continue;
            }
            for herbivore in &vulnerable.herbivores {
                if let Some(predators) = relations.herbivore_predators.get(herbivore.as_str()) {
                    matches += predators
                        .iter()
                        .filter(|p| {
                            protector.flower_visitors.contains(*p)
                                || protector.pollinators.contains(*p)
                        })
                        .count();
                }
                if let Some(parasites) = relations.herbivore_parasites.get(herbivore.as_str()) {
                    matches += parasites
                        .iter()
                        .filter(|f| protector.entomopathogenic_fungi.contains(*f))
                        .count();
                }
            }
        }
    }

    matches as f64
}

/// Raw P2 value: count of cross-member (pathogen on A, antagonist fungus on
/// B≠A) relationships, covering fungal and non-fungal pathogens.
pub fn pathogen_control(members: &[&Species], relations: &BiocontrolTables) -> f64 {
    let mut matches = 0usize;

    for (ai, vulnerable) in members.iter().enumerate() {
        for (bi, protector) in members.iter().enumerate() {
            if ai == bi || protector.mycoparasite_fungi.is_empty() {
                continue;
            }
            for pathogen in vulnerable
                .pathogenic_fungi
                .iter()
                .chain(&vulnerable.other_pathogens)
            {
                if let Some(antagonists) = relations.pathogen_antagonists.get(pathogen.as_str()) {
                    matches += antagonists
                        .iter()
                        .filter(|a| protector.mycoparasite_fungi.contains(*a))
                        .count();
                }
            }
        }
    }

    matches as f64
}
