//! Shared data model for the TinkerQL equipability engine
//!
//! This crate defines the types every planner in the suite exchanges with the
//! engine:
//! - Stat identifiers and read-only character stat snapshots
//! - Raw requirement criteria as stored by the item database
//! - Item variants, interpolated items, and variant-family partition rules
//!
//! Everything here is plain immutable data; decoding, evaluation, and
//! interpolation live in `tinkerql-expr` and `tinkerql-eval`.

pub mod criterion;
pub mod item;
pub mod stat;

pub use criterion::Criterion;
pub use item::{InterpolatedItem, ItemVariant, PartitionRule};
pub use stat::{StatId, StatSnapshot};
