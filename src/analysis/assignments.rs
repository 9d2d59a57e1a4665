//! Field-write resolution: `this.a.b = x` anywhere inside a member.

use tracing::trace;

use super::types::{WriteRecord, WriteScope};
use super::{one_line, unique_by_key};
use crate::tree::{NodeId, SyntaxTreeIndex};

const ASSIGNMENT_KINDS: &[&str] = &["assignment_expression", "augmented_assignment_expression"];

/// Writes in `body` whose left-hand side is rooted at `this` (or, under
/// [`WriteScope::WithLocals`], at one of `locals`), deduplicated by path.
pub fn resolve_writes(
    index: &SyntaxTreeIndex,
    body: NodeId,
    locals: &[String],
    scope: WriteScope,
) -> Vec<WriteRecord> {
    let mut writes = Vec::new();

    for assignment in index.descendants_of_kind(body, ASSIGNMENT_KINDS) {
        let Some(left) = index.child_by_field(assignment, "left") else {
            trace!(assignment = index.text(assignment), "Assignment without left operand");
            continue;
        };
        let root = lhs_root(index, left);
        let is_self = match index.kind(root) {
            "this" => true,
            "identifier"
                if scope == WriteScope::WithLocals
                    && locals.iter().any(|l| l == index.text(root)) =>
            {
                false
            }
            _ => continue,
        };

        let target = extend_member_path(index, root);
        writes.push(WriteRecord {
            receiver_path: one_line(index.text(target)),
            is_self,
        });
    }

    unique_by_key(writes, |w| w.receiver_path.clone())
}

/// Leftmost primary of an assignment target.
fn lhs_root(index: &SyntaxTreeIndex, mut node: NodeId) -> NodeId {
    loop {
        let next = match index.kind(node) {
            "member_expression" | "subscript_expression" => index.child_by_field(node, "object"),
            "non_null_expression" | "parenthesized_expression" => index.immediate_children(node).next(),
            _ => None,
        };
        match next {
            Some(n) => node = n,
            None => return node,
        }
    }
}

/// Climb from the root through consecutive member accesses it is the object
/// of; a subscript ends the path (`this.a[0].b` → `this.a`).
fn extend_member_path(index: &SyntaxTreeIndex, root: NodeId) -> NodeId {
    let mut current = root;
    while let Some(parent) = index.parent(current) {
        if index.kind(parent) == "member_expression"
            && index.child_by_field(parent, "object") == Some(current)
        {
            current = parent;
        } else {
            break;
        }
    }
    current
}
