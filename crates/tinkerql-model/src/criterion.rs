//! Raw requirement criteria as stored by the item database

use serde::{Deserialize, Serialize};

/// One entry of a flat, stack-based requirement expression, verbatim from the
/// item database.
///
/// The triple is untyped on purpose: the operator-code table is an externally
/// owned contract, and `tinkerql-expr` is the single place that gives these
/// numbers meaning. For comparator entries `value1` is the stat id and
/// `value2` the threshold; for function-operator entries `value1` is the
/// referenced object id (a nano program, a worn item, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Criterion {
    pub value1: i32,
    pub value2: i32,
    pub operator: i32,
}

impl Criterion {
    pub const fn new(value1: i32, value2: i32, operator: i32) -> Self {
        Self {
            value1,
            value2,
            operator,
        }
    }
}
