//! Call-chain resolution: which calls inside a member a test must intercept.
//!
//! Every `call_expression` in the member is visited in source order. Its
//! receiver chain (`a.b().c().subscribe(cb)`) is walked down to the root with
//! an explicit worklist; all calls met on the way are consumed so one chain
//! yields at most one record:
//!
//! - when a call in the chain invokes the subscription marker, the record is
//!   the subscription itself (`a.b().c.subscribe`), and the stream producer
//!   (`a.b().c()`) is what the test stubs;
//! - otherwise the record is the deepest call of the chain (`this.a.b` for
//!   `this.a.b().c()`).

use std::collections::{HashSet, VecDeque};

use tracing::trace;

use super::types::{CallRecord, MemberRef};
use super::{one_line, unique_by_key};
use crate::tree::{NodeId, SyntaxTreeIndex};
use crate::GeneratorConfig;

/// How the chain's root receiver qualifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RootKind {
    SelfRef,
    Allowed,
    Parameter,
}

/// Calls on one receiver chain, outermost first, plus the chain's root.
#[derive(Debug)]
struct ChainWalk {
    calls: Vec<NodeId>,
    root: Option<NodeId>,
}

/// Resolve the calls in `body` into deduplicated records, in discovery order.
///
/// `params` are the member's parameter names; calls rooted at one of them are
/// kept only when `config.spy_on_method_params` is set.
pub fn resolve_calls(
    index: &SyntaxTreeIndex,
    body: NodeId,
    params: &[String],
    config: &GeneratorConfig,
) -> Vec<CallRecord> {
    let mut consumed: HashSet<NodeId> = HashSet::new();
    let mut records = Vec::new();

    for call in index.descendants_of_kind(body, &["call_expression"]) {
        if consumed.contains(&call) {
            continue;
        }
        let chain = walk_chain(index, call);
        consumed.extend(chain.calls.iter().copied());

        let Some(root_kind) = classify_root(index, chain.root, params, config) else {
            trace!(call = index.text(call), "Skipping call with unqualified receiver");
            continue;
        };
        let Some(mut record) = chain_record(index, &chain, config) else {
            trace!(call = index.text(call), "Skipping call without receiver/method pair");
            continue;
        };
        if config.is_ignored_method(record.intercepted_method()) {
            continue;
        }
        record.uses_parameter = root_kind == RootKind::Parameter;
        records.push(record);
    }

    unique_by_key(records, |r| r.canonical_signature.clone())
}

// ─── Chain walking ──────────────────────────────────────────────────

/// Follow the receiver side of `call` down to its root expression.
fn walk_chain(index: &SyntaxTreeIndex, call: NodeId) -> ChainWalk {
    let mut calls = Vec::new();
    let mut root = None;
    let mut worklist = VecDeque::from([call]);

    while let Some(node) = worklist.pop_front() {
        let next = match index.kind(node) {
            "call_expression" => {
                calls.push(node);
                index.child_by_field(node, "function")
            }
            "member_expression" | "subscript_expression" => index.child_by_field(node, "object"),
            "non_null_expression" | "parenthesized_expression" | "await_expression" => {
                index.immediate_children(node).next()
            }
            _ => {
                root = Some(node);
                None
            }
        };
        worklist.extend(next);
    }

    ChainWalk { calls, root }
}

fn classify_root(
    index: &SyntaxTreeIndex,
    root: Option<NodeId>,
    params: &[String],
    config: &GeneratorConfig,
) -> Option<RootKind> {
    let root = root?;
    match index.kind(root) {
        "this" => Some(RootKind::SelfRef),
        "identifier" => {
            let name = index.text(root);
            if config.is_excluded(name) {
                None
            } else if config.is_included(name) {
                Some(RootKind::Allowed)
            } else if params.iter().any(|p| p == name) {
                config.spy_on_method_params.then_some(RootKind::Parameter)
            } else {
                None
            }
        }
        _ => None,
    }
}

// ─── Record construction ────────────────────────────────────────────

fn chain_record(
    index: &SyntaxTreeIndex,
    chain: &ChainWalk,
    config: &GeneratorConfig,
) -> Option<CallRecord> {
    let marker = config.subscription_marker.as_str();

    // the subscription closest to the root is the one applied to the stream
    let subscription = chain
        .calls
        .iter()
        .rev()
        .copied()
        .find(|&c| callee_member(index, c).is_some_and(|m| index.text(m.1) == marker));

    match subscription {
        Some(sub_call) => subscription_record(index, sub_call, marker),
        None => {
            let deepest = *chain.calls.last()?;
            let (object, property) = callee_member(index, deepest)?;
            Some(record(
                one_line(index.text(object)),
                index.text(property).to_string(),
                false,
                None,
            ))
        }
    }
}

fn subscription_record(index: &SyntaxTreeIndex, sub_call: NodeId, marker: &str) -> Option<CallRecord> {
    let (observable, _) = callee_member(index, sub_call)?;
    let stream = unwrap_expression(index, observable);

    if index.kind(stream) == "call_expression" {
        let producer_callee = index.child_by_field(stream, "function")?;
        let (object, property) = member_parts(index, producer_callee)?;
        let producer = MemberRef {
            object: one_line(index.text(object)),
            property: index.text(property).to_string(),
        };
        Some(record(
            one_line(index.text(producer_callee)),
            marker.to_string(),
            true,
            Some(producer),
        ))
    } else {
        Some(record(one_line(index.text(observable)), marker.to_string(), true, None))
    }
}

fn record(
    receiver_path: String,
    method_name: String,
    is_async_subscription: bool,
    producer: Option<MemberRef>,
) -> CallRecord {
    CallRecord {
        canonical_signature: format!("{}.{}", receiver_path, method_name),
        receiver_path,
        method_name,
        is_async_subscription,
        has_nested_call: producer.is_some(),
        uses_parameter: false,
        producer,
    }
}

// ─── Helper utilities ───────────────────────────────────────────────

/// `(object, property)` of a call's callee, when the callee is a member access.
fn callee_member(index: &SyntaxTreeIndex, call: NodeId) -> Option<(NodeId, NodeId)> {
    let callee = index.child_by_field(call, "function")?;
    member_parts(index, callee)
}

fn member_parts(index: &SyntaxTreeIndex, node: NodeId) -> Option<(NodeId, NodeId)> {
    if index.kind(node) != "member_expression" {
        return None;
    }
    Some((
        index.child_by_field(node, "object")?,
        index.child_by_field(node, "property")?,
    ))
}

/// Strip `(...)`, `x!` and `await` wrappers around an expression.
fn unwrap_expression(index: &SyntaxTreeIndex, mut node: NodeId) -> NodeId {
    while matches!(
        index.kind(node),
        "parenthesized_expression" | "non_null_expression" | "await_expression"
    ) {
        match index.immediate_children(node).next() {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}
