//! Stat identifiers and character stat snapshots

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric identifier of a character or item stat, as used by the item
/// database and the character profile subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatId(pub i32);

impl StatId {
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    pub const fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for StatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match stat_name(*self) {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "Stat {}", self.0),
        }
    }
}

impl From<i32> for StatId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

/// Well-known stat identifiers shared by every planner in the suite.
///
/// The numbering is owned by the upstream item database; only the stats the
/// planners name in UI or requirements are listed here.
pub mod stats {
    use super::StatId;

    pub const BREED: StatId = StatId(4);
    pub const STRENGTH: StatId = StatId(16);
    pub const AGILITY: StatId = StatId(17);
    pub const STAMINA: StatId = StatId(18);
    pub const INTELLIGENCE: StatId = StatId(19);
    pub const SENSE: StatId = StatId(20);
    pub const PSYCHE: StatId = StatId(21);
    pub const LEVEL: StatId = StatId(54);
    pub const PROFESSION: StatId = StatId(60);
    pub const GENDER: StatId = StatId(59);
    pub const TITLE_LEVEL: StatId = StatId(37);
    pub const EXPANSION: StatId = StatId(389);

    /// Pseudo-stats addressed by function-operator leaves. These are never
    /// looked up in a snapshot; they name the external-state channel a
    /// resolver answers for (active effects, worn items).
    pub const RUNNING_EFFECTS: StatId = StatId(998);
    pub const WORN_ITEMS: StatId = StatId(999);
}

/// Human-readable name for a well-known stat, if there is one.
pub fn stat_name(stat: StatId) -> Option<&'static str> {
    let name = match stat {
        stats::BREED => "Breed",
        stats::STRENGTH => "Strength",
        stats::AGILITY => "Agility",
        stats::STAMINA => "Stamina",
        stats::INTELLIGENCE => "Intelligence",
        stats::SENSE => "Sense",
        stats::PSYCHE => "Psyche",
        stats::LEVEL => "Level",
        stats::PROFESSION => "Profession",
        stats::GENDER => "Gender",
        stats::TITLE_LEVEL => "Title level",
        stats::EXPANSION => "Expansion",
        stats::RUNNING_EFFECTS => "Running effects",
        stats::WORN_ITEMS => "Worn items",
        _ => return None,
    };
    Some(name)
}

/// Immutable `StatId -> value` mapping for one entity (self or target) at one
/// instant.
///
/// Snapshots are produced by the character/profile subsystem; the engine only
/// ever reads them. A stat absent from the snapshot is reported as `None`,
/// which the evaluator surfaces as `Unknown` rather than a failed check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatSnapshot {
    values: HashMap<StatId, i32>,
}

impl StatSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a stat value. `None` means the provider had no value, not zero.
    pub fn lookup(&self, stat: StatId) -> Option<i32> {
        self.values.get(&stat).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

impl FromIterator<(StatId, i32)> for StatSnapshot {
    fn from_iter<I: IntoIterator<Item = (StatId, i32)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[(StatId, i32); N]> for StatSnapshot {
    fn from(entries: [(StatId, i32); N]) -> Self {
        entries.into_iter().collect()
    }
}
