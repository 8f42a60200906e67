//! Injected capabilities for evaluation

use async_trait::async_trait;
use tinkerql_expr::FunctionRef;

/// Capability answering function leaves against live game state ("is effect
/// X active", "is item Y worn").
///
/// Supplied by a collaborator outside the engine. `None` means the resolver
/// could not determine the answer; the leaf evaluates to
/// [`crate::RequirementStatus::Unknown`], never to `Unmet`.
#[async_trait]
pub trait ExternalResolver: Send + Sync {
    async fn resolve(&self, reference: FunctionRef) -> Option<bool>;
}

/// Resolver with no game-state access; every function leaf stays `Unknown`.
///
/// Useful for offline planners that only look at static stats.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

#[async_trait]
impl ExternalResolver for NullResolver {
    async fn resolve(&self, _reference: FunctionRef) -> Option<bool> {
        None
    }
}
