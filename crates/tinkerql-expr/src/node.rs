//! Expression tree nodes for item requirements

use serde::{Deserialize, Serialize};
use tinkerql_model::StatId;

/// Comparison applied by a requirement leaf against a snapshot value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    Equal,
    NotEqual,
    LessThanOrEqual,
    GreaterThanOrEqual,
    /// Bit test: met iff every required bit is set
    BitSet,
    /// Bit test: met iff no required bit is set
    BitClear,
}

impl Comparator {
    /// Apply the comparison to a concrete snapshot value.
    pub fn compare(self, current: i32, required: i32) -> bool {
        match self {
            Self::Equal => current == required,
            Self::NotEqual => current != required,
            Self::LessThanOrEqual => current <= required,
            Self::GreaterThanOrEqual => current >= required,
            Self::BitSet => current & required == required,
            Self::BitClear => current & required == 0,
        }
    }

    /// Display symbol used by verdict rendering.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "≠",
            Self::LessThanOrEqual => "≤",
            Self::GreaterThanOrEqual => "≥",
            Self::BitSet => "has",
            Self::BitClear => "lacks",
        }
    }
}

/// Structural boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatorKind {
    And,
    Or,
    Not,
}

impl OperatorKind {
    /// Number of operands popped from the working stack.
    pub const fn arity(self) -> usize {
        match self {
            Self::And | Self::Or => 2,
            Self::Not => 1,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
        }
    }
}

/// External-state channel a function leaf checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionKind {
    /// Is the referenced effect (nano program, buff) currently active?
    RunningEffect,
    /// Is the referenced item currently worn?
    WornItem,
}

/// Reference to dynamic external state, resolved outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionRef {
    pub kind: FunctionKind,
    pub object_id: i32,
}

/// One requirement leaf.
///
/// For ordinary leaves the check is `snapshot[stat] <comparator> value`; the
/// snapshot is the target's rather than the character's own when
/// `target_scoped` is set. Function leaves carry a [`FunctionRef`] instead
/// and are answered by the injected external resolver, with `stat` naming
/// the pseudo-stat channel (see `tinkerql_model::stat::stats`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Requirement {
    pub stat: StatId,
    pub value: i32,
    pub comparator: Comparator,
    pub target_scoped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_ref: Option<FunctionRef>,
}

/// Immutable boolean expression tree over requirement leaves.
///
/// Built once from a criteria list by [`crate::build`]; evaluation never
/// mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExpressionNode {
    Requirement(Requirement),
    Operator {
        op: OperatorKind,
        children: Vec<ExpressionNode>,
    },
    /// Implicit AND over sibling leaves never joined by an explicit operator.
    Group { children: Vec<ExpressionNode> },
}

impl ExpressionNode {
    /// Number of requirement leaves in the tree.
    pub fn requirement_count(&self) -> usize {
        match self {
            Self::Requirement(_) => 1,
            Self::Operator { children, .. } | Self::Group { children } => {
                children.iter().map(Self::requirement_count).sum()
            }
        }
    }

    /// Visit every requirement leaf, left to right.
    pub fn for_each_requirement<'a>(&'a self, f: &mut impl FnMut(&'a Requirement)) {
        match self {
            Self::Requirement(req) => f(req),
            Self::Operator { children, .. } | Self::Group { children } => {
                for child in children {
                    child.for_each_requirement(f);
                }
            }
        }
    }

    pub(crate) fn scope_to_target(&mut self) {
        match self {
            Self::Requirement(req) => req.target_scoped = true,
            Self::Operator { children, .. } | Self::Group { children } => {
                for child in children {
                    child.scope_to_target();
                }
            }
        }
    }
}
