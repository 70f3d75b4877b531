//! Stratified guild sampling for calibration
//!
//! Draws sample guilds from one climate tier's species pool using three
//! strata:
//! - climate-compatible anchor sampling (majority): pick an anchor species,
//!   then co-members whose occurrence envelopes overlap the anchor's —
//!   realistic plantings dominate the distribution;
//! - uniform random (minority): unconstrained draws for range coverage;
//! - same-family (minority): low-diversity guilds so the bottom tail of the
//!   diversity metrics is actually observed.
//!
//! Sampling is seeded so a calibration run is reproducible.

use crate::species::{ClimateTier, Species, SpeciesId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;

/// Stratum shares of the total sample.
pub const ANCHORED_FRACTION: f64 = 0.8;
pub const UNIFORM_FRACTION: f64 = 0.1;
// Remainder goes to the same-family stratum.

const MAX_ANCHOR_ATTEMPTS: usize = 50;

/// Sampler over one tier's species pool.
pub struct GuildSampler<'a> {
    tier: ClimateTier,
    pool: Vec<&'a Species>,
    /// Pool index → indices of envelope-compatible pool members.
    compatible: Vec<Vec<usize>>,
    /// Family name → pool indices, families with ≥2 members only.
    families: FxHashMap<&'a str, Vec<usize>>,
    rng: StdRng,
}

impl<'a> GuildSampler<'a> {
    /// Build the sampler and its pairwise climate-compatibility index.
    ///
    /// `pool` must be the tier's member list (see `SpeciesStore::tier_members`);
    /// the index is O(n²) in the pool size and built once per tier.
    pub fn new(tier: ClimateTier, pool: Vec<&'a Species>, seed: u64) -> Self {
        let compatible = build_compatibility_index(&pool);

        let mut families: FxHashMap<&str, Vec<usize>> = FxHashMap::default();
        for (idx, species) in pool.iter().enumerate() {
            if !species.family.is_empty() {
                families.entry(species.family.as_str()).or_default().push(idx);
            }
        }
        families.retain(|_, members| members.len() >= 2);

        GuildSampler {
            tier,
            pool,
            compatible,
            families,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn tier(&self) -> ClimateTier {
        self.tier
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// Draw `count` guilds of `guild_size` members across the three strata.
    /// Returns fewer than `count` only when the pool itself is too small.
    pub fn sample_guilds(&mut self, guild_size: usize, count: usize) -> Vec<Vec<SpeciesId>> {
        if self.pool.len() < guild_size {
            return Vec::new();
        }

        let n_anchored = (count as f64 * ANCHORED_FRACTION).round() as usize;
        let n_uniform = (count as f64 * UNIFORM_FRACTION).round() as usize;
        let n_family = count.saturating_sub(n_anchored + n_uniform);

        let mut guilds = Vec::with_capacity(count);
        for _ in 0..n_anchored {
            guilds.push(self.sample_anchored(guild_size));
        }
        for _ in 0..n_uniform {
            guilds.push(self.sample_uniform(guild_size));
        }
        for _ in 0..n_family {
            guilds.push(self.sample_same_family(guild_size));
        }
        guilds
    }

    /// Anchor on a random species and fill from its compatibility list.
    /// Falls back to uniform when no anchor has enough compatible partners.
    fn sample_anchored(&mut self, guild_size: usize) -> Vec<SpeciesId> {
        for _ in 0..MAX_ANCHOR_ATTEMPTS {
            let anchor = self.rng.gen_range(0..self.pool.len());
            let partners = &self.compatible[anchor];
            if partners.len() < guild_size - 1 {
                continue;
            }

            let mut choices = partners.clone();
            choices.shuffle(&mut self.rng);
            let mut indices: Vec<usize> = choices.into_iter().take(guild_size - 1).collect();
            indices.push(anchor);
            return self.to_ids(&indices);
        }
        self.sample_uniform(guild_size)
    }

    /// Unconstrained draw without replacement.
    fn sample_uniform(&mut self, guild_size: usize) -> Vec<SpeciesId> {
        let indices =
            rand::seq::index::sample(&mut self.rng, self.pool.len(), guild_size).into_vec();
        self.to_ids(&indices)
    }

    /// Draw from a single family where possible, padding with uniform picks
    /// when the family runs short.
    fn sample_same_family(&mut self, guild_size: usize) -> Vec<SpeciesId> {
        let family_keys: Vec<&str> = self.families.keys().copied().collect();
        if family_keys.is_empty() {
            return self.sample_uniform(guild_size);
        }

        let family = family_keys[self.rng.gen_range(0..family_keys.len())];
        let mut indices = self.families[family].clone();
        indices.shuffle(&mut self.rng);
        indices.truncate(guild_size);

        // Pad from the whole pool when the family is smaller than the guild
        while indices.len() < guild_size {
            let pick = self.rng.gen_range(0..self.pool.len());
            if !indices.contains(&pick) {
                indices.push(pick);
            }
        }

        self.to_ids(&indices)
    }

    fn to_ids(&self, indices: &[usize]) -> Vec<SpeciesId> {
        indices.iter().map(|&i| self.pool[i].id.clone()).collect()
    }
}

/// For each pool member, the indices of members whose climate envelopes
/// overlap in both temperature and precipitation. Members without an
/// envelope are treated as compatible with everything rather than excluded.
fn build_compatibility_index(pool: &[&Species]) -> Vec<Vec<usize>> {
    let mut index = vec![Vec::new(); pool.len()];

    for i in 0..pool.len() {
        for j in 0..pool.len() {
            if i == j {
                continue;
            }
            let compatible = match (&pool[i].envelope, &pool[j].envelope) {
                (Some(a), Some(b)) => a.is_compatible(b),
                _ => true,
            };
            if compatible {
                index[i].push(j);
            }
        }
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::ClimateEnvelope;
    use crate::testutil::species_with;
    use rustc_hash::FxHashSet;

    fn pool_species(n: usize) -> Vec<Species> {
        (0..n)
            .map(|i| {
                species_with(&format!("sp-{i:02}"), |s| {
                    s.family = if i % 2 == 0 { "Rosaceae".into() } else { "Fabaceae".into() };
                    s.tiers.insert(ClimateTier::HumidTemperate);
                    s.envelope = Some(ClimateEnvelope {
                        temp_min: 5.0,
                        temp_max: 20.0,
                        precip_min: 400.0,
                        precip_max: 1500.0,
                    });
                })
            })
            .collect()
    }

    #[test]
    fn guilds_have_requested_size_and_no_duplicates() {
        let species = pool_species(12);
        let refs: Vec<&Species> = species.iter().collect();
        let mut sampler = GuildSampler::new(ClimateTier::HumidTemperate, refs, 42);

        for guild in sampler.sample_guilds(5, 60) {
            assert_eq!(guild.len(), 5);
            let unique: FxHashSet<&str> = guild.iter().map(|id| id.as_str()).collect();
            assert_eq!(unique.len(), 5);
        }
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let species = pool_species(10);

        let refs_a: Vec<&Species> = species.iter().collect();
        let mut sampler_a = GuildSampler::new(ClimateTier::HumidTemperate, refs_a, 7);
        let run_a = sampler_a.sample_guilds(3, 20);

        let refs_b: Vec<&Species> = species.iter().collect();
        let mut sampler_b = GuildSampler::new(ClimateTier::HumidTemperate, refs_b, 7);
        let run_b = sampler_b.sample_guilds(3, 20);

        assert_eq!(run_a, run_b);
    }

    #[test]
    fn undersized_pool_yields_nothing() {
        let species = pool_species(3);
        let refs: Vec<&Species> = species.iter().collect();
        let mut sampler = GuildSampler::new(ClimateTier::HumidTemperate, refs, 1);
        assert!(sampler.sample_guilds(5, 100).is_empty());
    }

    #[test]
    fn incompatible_envelopes_are_excluded_from_anchoring() {
        let warm = species_with("sp-warm", |s| {
            s.envelope = Some(ClimateEnvelope {
                temp_min: 18.0,
                temp_max: 30.0,
                precip_min: 1000.0,
                precip_max: 3000.0,
            });
        });
        let cold = species_with("sp-cold", |s| {
            s.envelope = Some(ClimateEnvelope {
                temp_min: -10.0,
                temp_max: 5.0,
                precip_min: 200.0,
                precip_max: 600.0,
            });
        });
        let index = build_compatibility_index(&[&warm, &cold]);
        assert!(index[0].is_empty());
        assert!(index[1].is_empty());
    }
}
