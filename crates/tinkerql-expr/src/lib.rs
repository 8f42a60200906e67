//! Requirement-expression decoding and tree building
//!
//! The item database stores an item's requirements as a flat, postfix
//! (stack-based) list of `{value1, value2, operator}` triples. This crate
//! turns that list into an immutable boolean expression tree:
//!
//! 1. [`decode`] validates and types each raw triple against the closed
//!    operator-code table.
//! 2. [`build`] runs the postfix stack machine and produces an
//!    [`ExpressionNode`] tree, or a [`StructureError`] if the list is
//!    malformed. Partial trees are never returned.
//!
//! Evaluation of the tree lives in `tinkerql-eval`.

pub mod builder;
pub mod decode;
pub mod error;
pub mod node;

pub use builder::build;
pub use decode::{Decoded, ScopeMarker, decode};
pub use error::{Result, StructureError};
pub use node::{Comparator, ExpressionNode, FunctionKind, FunctionRef, OperatorKind, Requirement};
