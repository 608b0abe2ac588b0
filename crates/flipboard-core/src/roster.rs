#![forbid(unsafe_code)]

//! The fixed roster of identities and the ranked-entry registry.
//!
//! Identities are known up front and never change while a board is mounted.
//! The [`Registry`] owns one [`RankedEntry`] per identity; the view
//! controller passes it by reference into the normalizer and ranking policy.
//!
//! # Invariants
//!
//! 1. A roster holds at least one identity.
//! 2. Identities are unique under case-insensitive comparison.
//! 3. The registry holds exactly one entry per roster identity, in roster
//!    order, for its whole lifetime.

use std::fmt;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::score::Score;

/// Stable identity of a ranked entry (a house name).
///
/// Stored in canonical upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HouseId(String);

impl HouseId {
    /// Canonicalize a raw identity.
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HouseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HouseId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Problems building a roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// No identities were given.
    Empty,
    /// The same identity appeared twice (case-insensitively).
    Duplicate(HouseId),
    /// An identity was blank.
    Blank,
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("roster must contain at least one identity"),
            Self::Duplicate(id) => write!(f, "duplicate roster identity: {id}"),
            Self::Blank => f.write_str("roster identities must not be blank"),
        }
    }
}

impl std::error::Error for RosterError {}

/// The fixed set of identities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    ids: Vec<HouseId>,
}

impl Roster {
    /// Build a roster from raw names.
    pub fn new<I, S>(names: I) -> Result<Self, RosterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ids: Vec<HouseId> = Vec::new();
        for name in names {
            let id = HouseId::new(name.as_ref());
            if id.as_str().is_empty() {
                return Err(RosterError::Blank);
            }
            if ids.contains(&id) {
                return Err(RosterError::Duplicate(id));
            }
            ids.push(id);
        }
        if ids.is_empty() {
            return Err(RosterError::Empty);
        }
        Ok(Self { ids })
    }

    /// Identities in declared order.
    #[inline]
    pub fn ids(&self) -> &[HouseId] {
        &self.ids
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Match a raw key against the roster, ignoring case.
    pub fn resolve(&self, raw: &str) -> Option<&HouseId> {
        let probe = HouseId::new(raw);
        self.ids.iter().find(|id| **id == probe)
    }

    /// The arrangement cards take when first mounted.
    pub fn arrange(&self, order: InitialOrder) -> Vec<HouseId> {
        let mut ids = self.ids.clone();
        if let InitialOrder::Shuffled { seed } = order {
            let mut rng = match seed {
                Some(seed) => SmallRng::seed_from_u64(seed),
                None => SmallRng::from_os_rng(),
            };
            ids.shuffle(&mut rng);
        }
        ids
    }
}

/// How cards are arranged before the first refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum InitialOrder {
    /// Roster order.
    Declared,
    /// Random permutation; a seed makes it reproducible.
    Shuffled {
        #[serde(default)]
        seed: Option<u64>,
    },
}

impl Default for InitialOrder {
    fn default() -> Self {
        Self::Shuffled { seed: None }
    }
}

/// One ranked identity and its current score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub id: HouseId,
    pub score: Score,
}

/// Owner of every [`RankedEntry`] for a mounted board.
#[derive(Debug, Clone)]
pub struct Registry {
    roster: Roster,
    entries: Vec<RankedEntry>,
}

impl Registry {
    /// Create a registry with every score Unknown.
    pub fn new(roster: Roster) -> Self {
        let entries = roster
            .ids()
            .iter()
            .map(|id| RankedEntry {
                id: id.clone(),
                score: Score::Unknown,
            })
            .collect();
        Self { roster, entries }
    }

    #[inline]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Entries in roster order.
    #[inline]
    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    pub fn get(&self, id: &HouseId) -> Option<&RankedEntry> {
        self.entries.iter().find(|e| e.id == *id)
    }

    pub fn score(&self, id: &HouseId) -> Option<Score> {
        self.get(id).map(|e| e.score)
    }

    /// Overwrite the score of a roster identity. Returns `false` for
    /// identities outside the roster.
    pub fn set_score(&mut self, id: &HouseId, score: Score) -> bool {
        match self.entries.iter_mut().find(|e| e.id == *id) {
            Some(entry) => {
                entry.score = score;
                true
            }
            None => false,
        }
    }

    /// Entries arranged in `order`, skipping identities the registry does
    /// not own.
    pub fn in_order<'a>(&'a self, order: &'a [HouseId]) -> impl Iterator<Item = &'a RankedEntry> + 'a {
        order.iter().filter_map(|id| self.get(id))
    }
}
