//! Requirement evaluation, quality-level interpolation, and equipability
//! resolution
//!
//! This crate is the decision half of the engine:
//!
//! - [`evaluate`] walks an expression tree against one or two stat snapshots
//!   and an injected [`ExternalResolver`], producing an [`EvaluatedTree`]
//!   with a per-node [`RequirementStatus`], a flat unmet-requirement list,
//!   and met/total counts.
//! - [`interpolate`] computes the stat block (and requirement thresholds) of
//!   a same-named item at an arbitrary quality level between two known
//!   variants, in exact integer arithmetic.
//! - [`find_best_variant`] combines the two to answer "what is the highest
//!   quality level of this item family the character can use".
//!
//! Everything is pure and per-call; the single suspension point is the
//! external-reference resolve phase, and dropping the returned future there
//! cancels the evaluation with no partial result.

pub mod cache;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod interpolate;
pub mod resolver;
pub mod status;

pub use cache::InterpolationCache;
pub use context::{ExternalResolver, NullResolver};
pub use error::InterpolationError;
pub use evaluator::{EvaluatedNode, EvaluatedTree, UnmetRequirement, evaluate};
pub use interpolate::interpolate;
pub use resolver::{BestVariant, find_best_variant};
pub use status::RequirementStatus;
