//! Two-phase requirement evaluation
//!
//! Evaluation runs in three steps so external lookups never block tree
//! traversal:
//!
//! 1. **Collect**: post-order walk gathering every [`FunctionRef`].
//! 2. **Resolve**: all collected references are issued concurrently through
//!    the injected [`ExternalResolver`]; the phases join at a single await
//!    point. Dropping the future here abandons the evaluation with no
//!    partial result.
//! 3. **Compute**: synchronous post-order walk assigning a
//!    [`RequirementStatus`] to every node.

use std::collections::HashMap;

use futures::future::join_all;
use serde::Serialize;
use smallvec::SmallVec;
use tinkerql_expr::{Comparator, ExpressionNode, FunctionRef, OperatorKind, Requirement};
use tinkerql_model::{StatId, StatSnapshot};

use crate::context::ExternalResolver;
use crate::status::RequirementStatus;

/// A requirement tree annotated with per-node statuses, for rendering
/// pass/fail chips with their logical grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvaluatedNode {
    Requirement {
        requirement: Requirement,
        status: RequirementStatus,
        /// Snapshot value the leaf was checked against, when one was found
        current: Option<i32>,
    },
    Operator {
        op: OperatorKind,
        status: RequirementStatus,
        children: Vec<EvaluatedNode>,
    },
    Group {
        status: RequirementStatus,
        children: Vec<EvaluatedNode>,
    },
}

impl EvaluatedNode {
    pub fn status(&self) -> RequirementStatus {
        match self {
            Self::Requirement { status, .. }
            | Self::Operator { status, .. }
            | Self::Group { status, .. } => *status,
        }
    }
}

/// One unmet leaf, flattened for "what's missing" displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnmetRequirement {
    pub stat: StatId,
    pub comparator: Comparator,
    pub required: i32,
    /// `None` for function leaves and snapshot misses
    pub current: Option<i32>,
}

/// Aggregate verdict of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluatedTree {
    pub root: EvaluatedNode,
    pub unmet: Vec<UnmetRequirement>,
    /// Requirement leaves currently `Met`
    pub met_count: usize,
    /// All requirement leaves
    pub total_count: usize,
}

impl EvaluatedTree {
    pub fn status(&self) -> RequirementStatus {
        self.root.status()
    }

    pub fn is_usable(&self) -> bool {
        self.status().is_met()
    }
}

/// Evaluate a requirement tree against the character's snapshot, an optional
/// target snapshot, and an external-reference resolver.
///
/// The tree is never mutated; concurrent evaluations against different
/// snapshots are independent.
pub async fn evaluate(
    root: &ExpressionNode,
    self_snapshot: &StatSnapshot,
    target_snapshot: Option<&StatSnapshot>,
    resolver: &dyn ExternalResolver,
) -> EvaluatedTree {
    // Collect phase: no statuses are computed yet.
    let references = collect_references(root);

    // Resolve phase: all lookups issued concurrently, order-independent.
    // This is the evaluation's only suspension point.
    let resolutions = join_all(
        references
            .iter()
            .map(|&reference| async move { (reference, resolver.resolve(reference).await) }),
    )
    .await;
    let resolved: HashMap<FunctionRef, bool> = resolutions
        .into_iter()
        .filter_map(|(reference, answer)| answer.map(|met| (reference, met)))
        .collect();

    // Compute phase: synchronous post-order walk.
    let ctx = ComputeContext {
        self_snapshot,
        target_snapshot,
        resolved: &resolved,
    };
    let root = compute(root, &ctx);

    let mut unmet = Vec::new();
    let mut met_count = 0;
    let mut total_count = 0;
    summarize(&root, &mut unmet, &mut met_count, &mut total_count);

    EvaluatedTree {
        root,
        unmet,
        met_count,
        total_count,
    }
}

fn collect_references(node: &ExpressionNode) -> SmallVec<[FunctionRef; 4]> {
    let mut references = SmallVec::new();
    node.for_each_requirement(&mut |req| {
        if let Some(reference) = req.function_ref {
            if !references.contains(&reference) {
                references.push(reference);
            }
        }
    });
    references
}

struct ComputeContext<'a> {
    self_snapshot: &'a StatSnapshot,
    target_snapshot: Option<&'a StatSnapshot>,
    resolved: &'a HashMap<FunctionRef, bool>,
}

fn compute(node: &ExpressionNode, ctx: &ComputeContext<'_>) -> EvaluatedNode {
    match node {
        ExpressionNode::Requirement(req) => compute_leaf(req, ctx),
        ExpressionNode::Operator { op, children } => {
            let children: Vec<EvaluatedNode> =
                children.iter().map(|child| compute(child, ctx)).collect();
            let statuses = children.iter().map(EvaluatedNode::status);
            let status = match op {
                OperatorKind::And => RequirementStatus::all_of(statuses),
                OperatorKind::Or => RequirementStatus::any_of(statuses),
                OperatorKind::Not => {
                    // Arity is enforced at build time.
                    children
                        .first()
                        .map(|child| child.status().complement())
                        .unwrap_or(RequirementStatus::Unknown)
                }
            };
            EvaluatedNode::Operator {
                op: *op,
                status,
                children,
            }
        }
        ExpressionNode::Group { children } => {
            let children: Vec<EvaluatedNode> =
                children.iter().map(|child| compute(child, ctx)).collect();
            let status = RequirementStatus::all_of(children.iter().map(EvaluatedNode::status));
            EvaluatedNode::Group { status, children }
        }
    }
}

fn compute_leaf(req: &Requirement, ctx: &ComputeContext<'_>) -> EvaluatedNode {
    if let Some(reference) = req.function_ref {
        let status = match ctx.resolved.get(&reference) {
            Some(&met) => RequirementStatus::from_bool(met),
            None => RequirementStatus::Unknown,
        };
        return EvaluatedNode::Requirement {
            requirement: *req,
            status,
            current: None,
        };
    }

    let snapshot = if req.target_scoped {
        ctx.target_snapshot
    } else {
        Some(ctx.self_snapshot)
    };
    let current = snapshot.and_then(|snapshot| snapshot.lookup(req.stat));
    let status = match current {
        Some(value) => RequirementStatus::from_bool(req.comparator.compare(value, req.value)),
        // A lookup miss is insufficient data, never a failed check.
        None => RequirementStatus::Unknown,
    };
    EvaluatedNode::Requirement {
        requirement: *req,
        status,
        current,
    }
}

fn summarize(
    node: &EvaluatedNode,
    unmet: &mut Vec<UnmetRequirement>,
    met_count: &mut usize,
    total_count: &mut usize,
) {
    match node {
        EvaluatedNode::Requirement {
            requirement,
            status,
            current,
        } => {
            *total_count += 1;
            match status {
                RequirementStatus::Met => *met_count += 1,
                RequirementStatus::Unmet => unmet.push(UnmetRequirement {
                    stat: requirement.stat,
                    comparator: requirement.comparator,
                    required: requirement.value,
                    current: *current,
                }),
                RequirementStatus::Partial | RequirementStatus::Unknown => {}
            }
        }
        EvaluatedNode::Operator { children, .. } | EvaluatedNode::Group { children, .. } => {
            for child in children {
                summarize(child, unmet, met_count, total_count);
            }
        }
    }
}
