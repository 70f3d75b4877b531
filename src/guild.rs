//! Guild input validation
//!
//! A guild is an unordered, duplicate-free set of 2..=max species ids
//! supplied per request. Validation happens once at the boundary; everything
//! downstream can assume a well-formed member list.

use crate::error::ScoreError;
use crate::species::SpeciesId;
use rustc_hash::FxHashSet;

/// Default ceiling on guild size; pairwise metrics grow quadratically.
pub const DEFAULT_MAX_GUILD_SIZE: usize = 10;

/// Validated guild member list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    members: Vec<SpeciesId>,
}

impl Guild {
    /// Validate a requested member list: at least 2 ids, no duplicates,
    /// size within `max_size`.
    pub fn new(ids: &[SpeciesId], max_size: usize) -> Result<Self, ScoreError> {
        if ids.len() < 2 {
            return Err(ScoreError::GuildTooSmall(ids.len()));
        }
        if ids.len() > max_size {
            return Err(ScoreError::GuildTooLarge {
                got: ids.len(),
                max: max_size,
            });
        }

        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for id in ids {
            if !seen.insert(id.as_str()) {
                return Err(ScoreError::DuplicateSpecies(id.clone()));
            }
        }

        Ok(Guild {
            members: ids.to_vec(),
        })
    }

    pub fn members(&self) -> &[SpeciesId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<SpeciesId> {
        names.iter().map(|n| SpeciesId::from(*n)).collect()
    }

    #[test]
    fn rejects_single_member() {
        let err = Guild::new(&ids(&["sp-1"]), DEFAULT_MAX_GUILD_SIZE).unwrap_err();
        assert!(matches!(err, ScoreError::GuildTooSmall(1)));
    }

    #[test]
    fn rejects_duplicates() {
        let err = Guild::new(&ids(&["sp-1", "sp-2", "sp-1"]), DEFAULT_MAX_GUILD_SIZE).unwrap_err();
        match err {
            ScoreError::DuplicateSpecies(id) => assert_eq!(id.as_str(), "sp-1"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_oversized() {
        let many: Vec<SpeciesId> = (0..11).map(|i| SpeciesId::new(format!("sp-{i}"))).collect();
        let err = Guild::new(&many, DEFAULT_MAX_GUILD_SIZE).unwrap_err();
        assert!(matches!(err, ScoreError::GuildTooLarge { got: 11, max: 10 }));
    }

    #[test]
    fn accepts_pair() {
        let guild = Guild::new(&ids(&["sp-1", "sp-2"]), DEFAULT_MAX_GUILD_SIZE).unwrap();
        assert_eq!(guild.len(), 2);
    }
}
