//! Postfix stack machine building the expression tree

use smallvec::SmallVec;
use tinkerql_model::Criterion;

use crate::decode::{Decoded, ScopeMarker, decode};
use crate::error::{Result, StructureError};
use crate::node::{ExpressionNode, OperatorKind};

/// Build an immutable expression tree from a postfix criteria list.
///
/// Leaf entries push a requirement node; structural operators pop their
/// operands and push a composite; scope markers re-scope the node below
/// them. Sibling nodes still on the stack after the final entry are flushed
/// into an implicit-AND [`ExpressionNode::Group`].
///
/// The parse is all-or-nothing: an unknown code or an operand underflow
/// aborts with [`StructureError`] and no tree.
pub fn build(criteria: &[Criterion]) -> Result<ExpressionNode> {
    let mut stack: SmallVec<[ExpressionNode; 8]> = SmallVec::new();

    for &criterion in criteria {
        match decode(criterion)? {
            Decoded::Leaf(req) => stack.push(ExpressionNode::Requirement(req)),
            Decoded::Structural(op) => apply_operator(&mut stack, op)?,
            Decoded::Scope(ScopeMarker::SelfScope) => {
                // Self scope is the default; the marker only has to have
                // something to mark.
                if stack.is_empty() {
                    return Err(underflow("on self", 1, 0));
                }
            }
            Decoded::Scope(ScopeMarker::TargetScope) => match stack.last_mut() {
                Some(node) => node.scope_to_target(),
                None => return Err(underflow("on target", 1, 0)),
            },
        }
    }

    match stack.len() {
        0 => Err(StructureError::EmptyCriteria),
        1 => Ok(stack.remove(0)),
        _ => Ok(ExpressionNode::Group {
            children: stack.into_vec(),
        }),
    }
}

fn apply_operator(
    stack: &mut SmallVec<[ExpressionNode; 8]>,
    op: OperatorKind,
) -> Result<()> {
    let needed = op.arity();
    if stack.len() < needed {
        return Err(underflow(op.as_str(), needed, stack.len()));
    }
    // Pop in reverse so children keep their original (push) order.
    let at = stack.len() - needed;
    let children: Vec<ExpressionNode> = stack.drain(at..).collect();
    stack.push(ExpressionNode::Operator { op, children });
    Ok(())
}

fn underflow(operator: &'static str, needed: usize, available: usize) -> StructureError {
    StructureError::OperandUnderflow {
        operator,
        needed,
        available,
    }
}
