//! Four-valued requirement status
//!
//! Truth tables extend classic three-valued logic with `Partial` for
//! operator nodes whose children are mixed. `Unknown` means "insufficient
//! data to decide" and is never coerced to `Unmet`.

use serde::{Deserialize, Serialize};

/// Outcome of evaluating one node of a requirement tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementStatus {
    Met,
    Unmet,
    /// Operator node with mixed or undecided children
    Partial,
    /// A needed snapshot value or external reference was unavailable
    Unknown,
}

impl RequirementStatus {
    pub fn from_bool(met: bool) -> Self {
        if met { Self::Met } else { Self::Unmet }
    }

    pub fn is_met(self) -> bool {
        self == Self::Met
    }

    /// AND aggregation: `Met` iff all children `Met`, `Unmet` if any child
    /// `Unmet`, else `Partial`.
    pub fn all_of(children: impl IntoIterator<Item = Self>) -> Self {
        let mut all_met = true;
        for child in children {
            match child {
                Self::Unmet => return Self::Unmet,
                Self::Met => {}
                Self::Partial | Self::Unknown => all_met = false,
            }
        }
        if all_met { Self::Met } else { Self::Partial }
    }

    /// OR aggregation: `Met` if any child `Met`, `Unmet` iff all children
    /// `Unmet`, else `Partial`.
    pub fn any_of(children: impl IntoIterator<Item = Self>) -> Self {
        let mut all_unmet = true;
        let mut any = false;
        for child in children {
            any = true;
            match child {
                Self::Met => return Self::Met,
                Self::Unmet => {}
                Self::Partial | Self::Unknown => all_unmet = false,
            }
        }
        if any && all_unmet {
            Self::Unmet
        } else if !any {
            // An or-node with no children cannot be satisfied.
            Self::Unmet
        } else {
            Self::Partial
        }
    }

    /// NOT: complement of `Met`/`Unmet`; `Unknown` and `Partial` are never
    /// guessed at.
    pub fn complement(self) -> Self {
        match self {
            Self::Met => Self::Unmet,
            Self::Unmet => Self::Met,
            Self::Partial => Self::Partial,
            Self::Unknown => Self::Unknown,
        }
    }
}
