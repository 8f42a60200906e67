//! Evaluator tests: snapshots, scoping, external resolution, cancellation

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tinkerql_eval::{
    EvaluatedNode, ExternalResolver, NullResolver, RequirementStatus, UnmetRequirement, evaluate,
};
use tinkerql_expr::{Comparator, ExpressionNode, FunctionRef, build};
use tinkerql_model::stat::stats;
use tinkerql_model::{Criterion, StatSnapshot};

const GE: i32 = 2;
const BIT_SET: i32 = 22;
const BIT_CLEAR: i32 = 107;
const AND: i32 = 4;
const OR: i32 = 3;
const NOT: i32 = 42;
const ON_TARGET: i32 = 18;
const RUNNING_EFFECT: i32 = 86;
const WORN_ITEM: i32 = 101;

fn ge(stat: i32, value: i32) -> Criterion {
    Criterion::new(stat, value, GE)
}

fn op(code: i32) -> Criterion {
    Criterion::new(0, 0, code)
}

fn tree(criteria: &[Criterion]) -> ExpressionNode {
    build(criteria).expect("well-formed criteria")
}

/// Resolver answering from a fixed table, counting calls.
struct TableResolver {
    answers: HashMap<FunctionRef, bool>,
    calls: Arc<AtomicUsize>,
}

impl TableResolver {
    fn new(answers: impl IntoIterator<Item = (FunctionRef, bool)>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl ExternalResolver for TableResolver {
    async fn resolve(&self, reference: FunctionRef) -> Option<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers.get(&reference).copied()
    }
}

/// Resolver that signals each incoming call and then never answers.
struct StalledResolver {
    started: Arc<AtomicUsize>,
    release: Arc<tokio::sync::Notify>,
}

#[async_trait]
impl ExternalResolver for StalledResolver {
    async fn resolve(&self, _reference: FunctionRef) -> Option<bool> {
        self.started.fetch_add(1, Ordering::SeqCst);
        self.release.notified().await;
        Some(true)
    }
}

// === Leaf evaluation ===

#[tokio::test]
async fn end_to_end_met_with_empty_unmet_list() {
    let root = tree(&[ge(16, 400)]);
    let snapshot = StatSnapshot::from([(stats::STRENGTH, 500)]);
    let result = evaluate(&root, &snapshot, None, &NullResolver).await;
    assert_eq!(result.status(), RequirementStatus::Met);
    assert!(result.is_usable());
    assert_eq!(result.unmet, vec![]);
    assert_eq!((result.met_count, result.total_count), (1, 1));
}

#[tokio::test]
async fn end_to_end_unmet_lists_the_missing_stat() {
    let root = tree(&[ge(16, 400)]);
    let snapshot = StatSnapshot::from([(stats::STRENGTH, 300)]);
    let result = evaluate(&root, &snapshot, None, &NullResolver).await;
    assert_eq!(result.status(), RequirementStatus::Unmet);
    assert_eq!(
        result.unmet,
        vec![UnmetRequirement {
            stat: stats::STRENGTH,
            comparator: Comparator::GreaterThanOrEqual,
            required: 400,
            current: Some(300),
        }]
    );
    assert_eq!((result.met_count, result.total_count), (0, 1));
}

#[tokio::test]
async fn snapshot_miss_is_unknown_not_unmet() {
    let root = tree(&[ge(16, 400)]);
    let result = evaluate(&root, &StatSnapshot::new(), None, &NullResolver).await;
    assert_eq!(result.status(), RequirementStatus::Unknown);
    assert_eq!(result.unmet, vec![]);
}

#[tokio::test]
async fn bit_set_leaf_requires_every_required_bit() {
    let root = tree(&[Criterion::new(389, 0b0011, BIT_SET)]);
    // A strict superset of the required bits still qualifies.
    let superset = StatSnapshot::from([(stats::EXPANSION, 0b0111)]);
    let partial = StatSnapshot::from([(stats::EXPANSION, 0b0110)]);

    let met = evaluate(&root, &superset, None, &NullResolver).await;
    assert_eq!(met.status(), RequirementStatus::Met);

    let unmet = evaluate(&root, &partial, None, &NullResolver).await;
    assert_eq!(unmet.status(), RequirementStatus::Unmet);
    assert_eq!(
        unmet.unmet,
        vec![UnmetRequirement {
            stat: stats::EXPANSION,
            comparator: Comparator::BitSet,
            required: 0b0011,
            current: Some(0b0110),
        }]
    );
}

#[tokio::test]
async fn bit_clear_leaf_rejects_any_overlapping_bit() {
    let root = tree(&[Criterion::new(389, 0b0011, BIT_CLEAR)]);
    let disjoint = StatSnapshot::from([(stats::EXPANSION, 0b0100)]);
    let overlapping = StatSnapshot::from([(stats::EXPANSION, 0b0110)]);

    let met = evaluate(&root, &disjoint, None, &NullResolver).await;
    assert_eq!(met.status(), RequirementStatus::Met);

    let unmet = evaluate(&root, &overlapping, None, &NullResolver).await;
    assert_eq!(unmet.status(), RequirementStatus::Unmet);
    assert_eq!(
        unmet.unmet,
        vec![UnmetRequirement {
            stat: stats::EXPANSION,
            comparator: Comparator::BitClear,
            required: 0b0011,
            current: Some(0b0110),
        }]
    );
}

#[tokio::test]
async fn target_scoped_leaf_reads_the_target_snapshot() {
    let root = tree(&[ge(54, 100), op(ON_TARGET)]);
    let self_snapshot = StatSnapshot::from([(stats::LEVEL, 1)]);
    let target = StatSnapshot::from([(stats::LEVEL, 150)]);
    let result = evaluate(&root, &self_snapshot, Some(&target), &NullResolver).await;
    assert_eq!(result.status(), RequirementStatus::Met);
}

#[tokio::test]
async fn target_scoped_leaf_without_target_snapshot_is_unknown() {
    let root = tree(&[ge(54, 100), op(ON_TARGET)]);
    let self_snapshot = StatSnapshot::from([(stats::LEVEL, 150)]);
    let result = evaluate(&root, &self_snapshot, None, &NullResolver).await;
    assert_eq!(result.status(), RequirementStatus::Unknown);
}

// === Aggregation over built trees ===

#[tokio::test]
async fn pure_and_tree_is_met_iff_every_leaf_is_met() {
    let root = tree(&[ge(16, 400), ge(18, 300), op(AND)]);
    let all_met = StatSnapshot::from([(stats::STRENGTH, 400), (stats::STAMINA, 300)]);
    let one_short = StatSnapshot::from([(stats::STRENGTH, 400), (stats::STAMINA, 299)]);

    let met = evaluate(&root, &all_met, None, &NullResolver).await;
    assert_eq!(met.status(), RequirementStatus::Met);

    let unmet = evaluate(&root, &one_short, None, &NullResolver).await;
    assert_eq!(unmet.status(), RequirementStatus::Unmet);
    assert_eq!((unmet.met_count, unmet.total_count), (1, 2));
}

#[tokio::test]
async fn pure_or_tree_is_met_if_any_leaf_is_met() {
    let root = tree(&[ge(16, 400), ge(18, 300), op(OR)]);
    let snapshot = StatSnapshot::from([(stats::STRENGTH, 100), (stats::STAMINA, 300)]);
    let result = evaluate(&root, &snapshot, None, &NullResolver).await;
    assert_eq!(result.status(), RequirementStatus::Met);
}

#[tokio::test]
async fn implicit_group_aggregates_as_and() {
    let root = tree(&[ge(16, 400), ge(18, 300)]);
    let snapshot = StatSnapshot::from([(stats::STRENGTH, 500), (stats::STAMINA, 100)]);
    let result = evaluate(&root, &snapshot, None, &NullResolver).await;
    assert_eq!(result.status(), RequirementStatus::Unmet);
}

#[tokio::test]
async fn not_of_unknown_stays_unknown() {
    let root = tree(&[ge(16, 400), op(NOT)]);
    let result = evaluate(&root, &StatSnapshot::new(), None, &NullResolver).await;
    assert_eq!(result.status(), RequirementStatus::Unknown);
}

#[tokio::test]
async fn not_complements_a_decided_child() {
    let root = tree(&[ge(16, 400), op(NOT)]);
    let strong = StatSnapshot::from([(stats::STRENGTH, 500)]);
    let weak = StatSnapshot::from([(stats::STRENGTH, 100)]);
    let negated_met = evaluate(&root, &strong, None, &NullResolver).await;
    assert_eq!(negated_met.status(), RequirementStatus::Unmet);
    let negated_unmet = evaluate(&root, &weak, None, &NullResolver).await;
    assert_eq!(negated_unmet.status(), RequirementStatus::Met);
}

#[tokio::test]
async fn mixed_and_with_unknown_is_partial() {
    let root = tree(&[ge(16, 400), ge(18, 300), op(AND)]);
    let snapshot = StatSnapshot::from([(stats::STRENGTH, 500)]);
    let result = evaluate(&root, &snapshot, None, &NullResolver).await;
    assert_eq!(result.status(), RequirementStatus::Partial);
}

#[tokio::test]
async fn evaluated_tree_keeps_logical_grouping_for_rendering() {
    let root = tree(&[ge(16, 400), ge(18, 300), op(AND), ge(54, 180), op(OR)]);
    let snapshot = StatSnapshot::from([
        (stats::STRENGTH, 100),
        (stats::STAMINA, 100),
        (stats::LEVEL, 200),
    ]);
    let result = evaluate(&root, &snapshot, None, &NullResolver).await;
    assert_eq!(result.status(), RequirementStatus::Met);
    match &result.root {
        EvaluatedNode::Operator { children, .. } => {
            assert_eq!(children[0].status(), RequirementStatus::Unmet);
            assert_eq!(children[1].status(), RequirementStatus::Met);
        }
        other => panic!("expected operator root, got {other:?}"),
    }
}

// === External references ===

#[tokio::test]
async fn function_leaf_uses_the_resolved_answer() {
    let criteria = [Criterion::new(201_833, 0, RUNNING_EFFECT)];
    let root = tree(&criteria);
    let reference = match &root {
        ExpressionNode::Requirement(req) => req.function_ref.expect("function leaf"),
        other => panic!("expected leaf, got {other:?}"),
    };

    let active = TableResolver::new([(reference, true)]);
    let result = evaluate(&root, &StatSnapshot::new(), None, &active).await;
    assert_eq!(result.status(), RequirementStatus::Met);

    let inactive = TableResolver::new([(reference, false)]);
    let result = evaluate(&root, &StatSnapshot::new(), None, &inactive).await;
    assert_eq!(result.status(), RequirementStatus::Unmet);
}

#[tokio::test]
async fn unresolvable_function_leaf_is_unknown() {
    let root = tree(&[Criterion::new(201_833, 0, RUNNING_EFFECT)]);
    let resolver = TableResolver::new([]);
    let result = evaluate(&root, &StatSnapshot::new(), None, &resolver).await;
    assert_eq!(result.status(), RequirementStatus::Unknown);
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn duplicate_references_resolve_once() {
    let criteria = [
        Criterion::new(201_833, 0, RUNNING_EFFECT),
        Criterion::new(201_833, 0, RUNNING_EFFECT),
        op(AND),
    ];
    let root = tree(&criteria);
    let resolver = TableResolver::new([]);
    let _ = evaluate(&root, &StatSnapshot::new(), None, &resolver).await;
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn lookups_are_issued_concurrently() {
    let criteria = [
        Criterion::new(201_833, 0, RUNNING_EFFECT),
        Criterion::new(246_660, 0, WORN_ITEM),
        op(AND),
    ];
    let root = tree(&criteria);
    let started = Arc::new(AtomicUsize::new(0));
    let release = Arc::new(tokio::sync::Notify::new());
    let resolver = StalledResolver {
        started: Arc::clone(&started),
        release: Arc::clone(&release),
    };

    let snapshot = StatSnapshot::new();
    let evaluation = evaluate(&root, &snapshot, None, &resolver);
    tokio::pin!(evaluation);

    // Both lookups must be in flight before either has answered.
    loop {
        tokio::select! {
            biased;
            _ = &mut evaluation => panic!("evaluation finished with stalled lookups"),
            _ = tokio::time::sleep(Duration::from_millis(1)) => {
                if started.load(Ordering::SeqCst) == 2 {
                    break;
                }
            }
        }
    }

    release.notify_waiters();
    let result = evaluation.await;
    assert_eq!(result.status(), RequirementStatus::Met);
}

#[tokio::test]
async fn dropping_the_evaluation_mid_resolve_leaks_nothing() {
    let criteria = [
        Criterion::new(201_833, 0, RUNNING_EFFECT),
        Criterion::new(246_660, 0, WORN_ITEM),
        op(AND),
    ];
    let root = tree(&criteria);
    let started = Arc::new(AtomicUsize::new(0));
    let resolver = StalledResolver {
        started: Arc::clone(&started),
        release: Arc::new(tokio::sync::Notify::new()),
    };

    let snapshot = StatSnapshot::new();
    let abandoned = tokio::time::timeout(
        Duration::from_millis(20),
        evaluate(&root, &snapshot, None, &resolver),
    )
    .await;
    assert!(abandoned.is_err(), "stalled evaluation must not complete");

    // Both lookups had started; after the drop no further work advances.
    let after_drop = started.load(Ordering::SeqCst);
    assert_eq!(after_drop, 2);
    tokio::time::sleep(Duration::from_millis(5)).await;
    assert_eq!(started.load(Ordering::SeqCst), after_drop);
}

// === Structural property ===

#[tokio::test]
async fn total_count_equals_leaf_count() {
    let criteria = [ge(16, 400), ge(18, 300), op(AND), ge(54, 180), op(OR)];
    let root = tree(&criteria);
    let result = evaluate(&root, &StatSnapshot::new(), None, &NullResolver).await;
    assert_eq!(result.total_count, root.requirement_count());
    assert_eq!(result.total_count, 3);
}
