//! Item compatibility & quality-level interpolation engine
//!
//! tinkerql answers the question every planner in the companion suite asks:
//! **can this character use item X, and at what quality level?**
//!
//! - `model`: stat ids, snapshots, raw criteria, item variants
//! - `expr`: postfix criteria decoding and expression-tree building
//! - `eval`: tree evaluation, QL interpolation, best-variant resolution
//!
//! # Example
//!
//! ```
//! use tinkerql::model::stat::stats;
//! use tinkerql::model::{Criterion, StatSnapshot};
//! use tinkerql::{NullResolver, build, evaluate};
//!
//! # async fn usable() -> Result<bool, tinkerql::StructureError> {
//! // "Strength >= 400", as the item database stores it.
//! let tree = build(&[Criterion::new(16, 400, 2)])?;
//! let character = StatSnapshot::from([(stats::STRENGTH, 500)]);
//! let verdict = evaluate(&tree, &character, None, &NullResolver).await;
//! # Ok(verdict.is_usable())
//! # }
//! ```

pub use tinkerql_eval as eval;
pub use tinkerql_expr as expr;
pub use tinkerql_model as model;

// Convenience re-exports
pub use tinkerql_eval::{
    BestVariant, EvaluatedTree, ExternalResolver, InterpolationCache, InterpolationError,
    NullResolver, RequirementStatus, UnmetRequirement, evaluate, find_best_variant, interpolate,
};
pub use tinkerql_expr::{ExpressionNode, StructureError, build};
pub use tinkerql_model::{
    Criterion, InterpolatedItem, ItemVariant, PartitionRule, StatId, StatSnapshot,
};
