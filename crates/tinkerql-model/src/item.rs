//! Item variants, interpolated items, and variant-family partitioning

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::criterion::Criterion;
use crate::stat::StatId;

/// One concrete item record from the item database: a named item at a single
/// quality level, with its stat block and requirement criteria.
///
/// The engine never writes these back; interpolation produces fresh
/// `InterpolatedItem` values instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemVariant {
    pub name: String,
    pub quality_level: i32,
    /// Stat block in the order the item database lists it.
    pub stat_block: IndexMap<StatId, i32>,
    #[serde(default)]
    pub criteria: Vec<Criterion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ItemVariant {
    pub fn stat(&self, stat: StatId) -> Option<i32> {
        self.stat_block.get(&stat).copied()
    }
}

/// An `ItemVariant` whose stat block was computed between two known variants,
/// plus enough provenance for consumers to disclose that stats are estimated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpolatedItem {
    pub variant: ItemVariant,
    pub source_low_ql: i32,
    pub source_high_ql: i32,
    /// `false` when the target QL coincided with a source variant, in which
    /// case the stat block is that variant's, bit for bit.
    pub interpolated: bool,
}

/// Declarative partition rule for a variant family whose members share one
/// display name but are gated to different characters (typically by
/// profession).
///
/// A variant belongs to the sub-family keyed by the value of its `Equal`
/// criterion on `stat`; variants without such a criterion form the open
/// sub-family. `fallback` names the sub-family to use when the character
/// matches none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionRule {
    pub stat: StatId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<i32>,
}
