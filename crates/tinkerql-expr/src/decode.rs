//! Criterion decoding against the operator-code table
//!
//! The numeric code table is owned by the upstream item database; this module
//! honors it as a closed set. Every raw triple decodes to exactly one typed
//! entry, and codes outside the table fail the parse instead of degrading to
//! a no-op.

use tinkerql_model::Criterion;
use tinkerql_model::stat::stats;

use crate::error::{Result, StructureError};
use crate::node::{Comparator, FunctionKind, FunctionRef, OperatorKind, Requirement};

mod codes {
    pub const EQUAL: i32 = 0;
    pub const LESS_THAN_OR_EQUAL: i32 = 1;
    pub const GREATER_THAN_OR_EQUAL: i32 = 2;
    pub const OR: i32 = 3;
    pub const AND: i32 = 4;
    pub const ON_TARGET: i32 = 18;
    pub const ON_SELF: i32 = 19;
    pub const BIT_SET: i32 = 22;
    pub const NOT_EQUAL: i32 = 24;
    pub const NOT: i32 = 42;
    pub const RUNNING_EFFECT: i32 = 86;
    pub const WORN_ITEM: i32 = 101;
    pub const BIT_CLEAR: i32 = 107;
}

/// Scope markers re-scope the node below them on the working stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeMarker {
    /// Evaluate against the character's own snapshot (the default; a no-op)
    SelfScope,
    /// Evaluate against the opponent/target entity's snapshot
    TargetScope,
}

/// One decoded, typed criteria entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// Pushes a requirement leaf
    Leaf(Requirement),
    /// Pops `arity()` operands, pushes a composite
    Structural(OperatorKind),
    /// Re-scopes the top of the stack
    Scope(ScopeMarker),
}

/// Validate and type one raw criterion.
pub fn decode(criterion: Criterion) -> Result<Decoded> {
    let comparator = match criterion.operator {
        codes::EQUAL => Comparator::Equal,
        codes::NOT_EQUAL => Comparator::NotEqual,
        codes::LESS_THAN_OR_EQUAL => Comparator::LessThanOrEqual,
        codes::GREATER_THAN_OR_EQUAL => Comparator::GreaterThanOrEqual,
        codes::BIT_SET => Comparator::BitSet,
        codes::BIT_CLEAR => Comparator::BitClear,

        codes::AND => return Ok(Decoded::Structural(OperatorKind::And)),
        codes::OR => return Ok(Decoded::Structural(OperatorKind::Or)),
        codes::NOT => return Ok(Decoded::Structural(OperatorKind::Not)),

        codes::ON_SELF => return Ok(Decoded::Scope(ScopeMarker::SelfScope)),
        codes::ON_TARGET => return Ok(Decoded::Scope(ScopeMarker::TargetScope)),

        codes::RUNNING_EFFECT => {
            return Ok(Decoded::Leaf(function_leaf(
                FunctionKind::RunningEffect,
                criterion.value1,
            )));
        }
        codes::WORN_ITEM => {
            return Ok(Decoded::Leaf(function_leaf(
                FunctionKind::WornItem,
                criterion.value1,
            )));
        }

        code => return Err(StructureError::UnknownOperator { code }),
    };

    Ok(Decoded::Leaf(Requirement {
        stat: criterion.value1.into(),
        value: criterion.value2,
        comparator,
        target_scoped: false,
        function_ref: None,
    }))
}

fn function_leaf(kind: FunctionKind, object_id: i32) -> Requirement {
    let stat = match kind {
        FunctionKind::RunningEffect => stats::RUNNING_EFFECTS,
        FunctionKind::WornItem => stats::WORN_ITEMS,
    };
    Requirement {
        stat,
        value: object_id,
        comparator: Comparator::Equal,
        target_scoped: false,
        function_ref: Some(FunctionRef { kind, object_id }),
    }
}
