//! P4: Phylogenetic diversity
//!
//! Mean pairwise Euclidean distance between members in phylogenetic
//! eigenvector space. Distances use every retained coordinate: truncating the
//! embedding compresses distances unevenly across clades and skews the
//! calibration distribution.

use crate::species::Species;

/// Raw P4 value: mean pairwise Euclidean distance over all retained
/// eigenvector coordinates. Members without an embedding are skipped; fewer
/// than two embedded members scores zero.
pub fn phylo_diversity(members: &[&Species]) -> f64 {
    let embedded: Vec<&[f64]> = members
        .iter()
        .filter(|s| !s.phylo_coords.is_empty())
        .map(|s| s.phylo_coords.as_slice())
        .collect();

    if embedded.len() < 2 {
        return 0.0;
    }

    let mut total = 0.0;
    let mut pairs = 0usize;
    for i in 0..embedded.len() {
        for j in i + 1..embedded.len() {
            total += euclidean(embedded[i], embedded[j]);
            pairs += 1;
        }
    }

    total / pairs as f64
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
