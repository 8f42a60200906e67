//! Structural errors for requirement-expression building

use thiserror::Error;

/// Result type for decode/build operations
pub type Result<T> = std::result::Result<T, StructureError>;

/// A malformed postfix criteria list.
///
/// Any of these aborts the whole parse; the builder never hands back a
/// best-effort partial tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// Operator code outside the known table
    #[error("unrecognized operator code {code}")]
    UnknownOperator { code: i32 },

    /// Operator encountered with too few operands on the working stack
    #[error("operator '{operator}' needs {needed} operand(s) but only {available} available")]
    OperandUnderflow {
        operator: &'static str,
        needed: usize,
        available: usize,
    },

    /// Criteria list with no leaf-producing entries at all
    #[error("criteria list produced no expression")]
    EmptyCriteria,
}
