//! Class analysis over a [`SyntaxTreeIndex`]: finds the class under test, its
//! members and constructor dependencies, and resolves the calls and field
//! writes each member performs.

mod assignments;
mod calls;
mod dependencies;
mod types;

pub use assignments::resolve_writes;
pub use calls::resolve_calls;
pub use dependencies::extract_dependencies;
pub use types::*;

use std::collections::HashSet;
use std::hash::Hash;

use tracing::debug;

use crate::tree::{NodeId, SyntaxTreeIndex};
use crate::{GenError, GeneratorConfig, Variant};

const CLASS_KINDS: &[&str] = &["class_declaration", "abstract_class_declaration"];
const PARAMETER_KINDS: &[&str] = &["required_parameter", "optional_parameter"];

// ─── Class discovery ────────────────────────────────────────────────

/// Find the one class the variant applies to and derive its model.
pub fn discover_class(
    index: &SyntaxTreeIndex,
    variant: Variant,
    config: &GeneratorConfig,
) -> Result<ClassUnderTest, GenError> {
    let template = variant.template();
    let candidates: Vec<NodeId> = index.descendants_of_kind(index.root(), CLASS_KINDS).collect();

    let matching: Vec<NodeId> = match template.decorator {
        Some(decorator) => candidates
            .into_iter()
            .filter(|&class| {
                class_decorators(index, class)
                    .iter()
                    .any(|&d| decorator_name(index, d) == Some(decorator))
            })
            .collect(),
        None => candidates,
    };

    let class = match matching.as_slice() {
        [] => {
            return Err(GenError::ClassNotFound {
                requirement: match template.decorator {
                    Some(d) => format!("decorated with @{}", d),
                    None => "declaration".to_string(),
                },
            });
        }
        [one] => *one,
        many => {
            return Err(GenError::TooManyClasses {
                variant: variant.to_string(),
                count: many.len(),
            });
        }
    };

    let name_node = index.child_by_field(class, "name").ok_or(GenError::MissingClassName)?;
    let name = index.text(name_node).to_string();
    let constructor_params = extract_dependencies(index, class, config)?;
    let members = class_members(index, class);

    debug!(
        class = %name,
        variant = %variant,
        dependencies = constructor_params.len(),
        members = members.len(),
        "Discovered class under test"
    );

    Ok(ClassUnderTest {
        name,
        node: class,
        constructor_params,
        members,
    })
}

/// Decorators on the class itself, plus those written before `export`
/// (tree-sitter attaches those to the `export_statement`).
fn class_decorators(index: &SyntaxTreeIndex, class: NodeId) -> Vec<NodeId> {
    let mut decorators: Vec<NodeId> = index
        .immediate_children(class)
        .filter(|&c| index.kind(c) == "decorator")
        .collect();

    if let Some(parent) = index.parent(class) {
        if index.kind(parent) == "export_statement" {
            decorators.extend(
                index
                    .siblings(class)
                    .previous
                    .into_iter()
                    .filter(|&s| index.parent(s) == Some(parent) && index.kind(s) == "decorator"),
            );
        }
    }
    decorators
}

/// Callee name of a decorator: `@Component(...)`, `@Pipe`, `@core.Injectable()`.
pub(crate) fn decorator_name<'s>(index: &SyntaxTreeIndex<'s>, decorator: NodeId) -> Option<&'s str> {
    let expr = index.immediate_children(decorator).next()?;
    let callee = if index.kind(expr) == "call_expression" {
        index.child_by_field(expr, "function")?
    } else {
        expr
    };
    match index.kind(callee) {
        "identifier" => Some(index.text(callee)),
        "member_expression" => index.child_by_field(callee, "property").map(|p| index.text(p)),
        _ => None,
    }
}

// ─── Members ────────────────────────────────────────────────────────

fn class_members(index: &SyntaxTreeIndex, class: NodeId) -> Vec<MemberNode> {
    let Some(body) = index.child_by_field(class, "body") else {
        return Vec::new();
    };
    index
        .immediate_children(body)
        .filter_map(|m| match index.kind(m) {
            "method_definition" => method_member(index, m),
            "public_field_definition" => arrow_member(index, m),
            _ => None,
        })
        .collect()
}

fn method_member(index: &SyntaxTreeIndex, node: NodeId) -> Option<MemberNode> {
    let name_node = index.child_by_field(node, "name")?;
    let name = index.text(name_node).to_string();
    if name == "constructor" {
        return None;
    }

    let words = leading_words(index, node, name_node);
    let kind = if words.contains(&"get") {
        MemberKind::Getter
    } else if words.contains(&"set") {
        MemberKind::Setter
    } else {
        MemberKind::Method
    };

    let params = index
        .child_by_field(node, "parameters")
        .map(|p| formal_parameters(index, p))
        .unwrap_or_default();

    let mut member = build_member(index, node, name, kind, words.contains(&"async"), params);
    member.is_static = words.contains(&"static");
    Some(member)
}

/// `async`, `get`, `set` and `static` are anonymous tokens, so read them from
/// the text between the member start and its name.
fn leading_words<'s>(index: &SyntaxTreeIndex<'s>, node: NodeId, name_node: NodeId) -> Vec<&'s str> {
    index
        .source()
        .get(index.node(node).start..index.node(name_node).start)
        .unwrap_or("")
        .split_whitespace()
        .collect()
}

fn arrow_member(index: &SyntaxTreeIndex, node: NodeId) -> Option<MemberNode> {
    let value = index.child_by_field(node, "value")?;
    if index.kind(value) != "arrow_function" {
        return None;
    }
    let name_node = index.child_by_field(node, "name")?;
    let name = index.text(name_node).to_string();

    let params = if let Some(p) = index.child_by_field(value, "parameters") {
        formal_parameters(index, p)
    } else if let Some(p) = index.child_by_field(value, "parameter") {
        vec![Parameter {
            name: index.text(p).to_string(),
            type_text: None,
            initializer: None,
        }]
    } else {
        Vec::new()
    };
    let is_async = index.text(value).trim_start().starts_with("async");

    let mut member = build_member(index, node, name, MemberKind::ArrowProperty, is_async, params);
    member.is_static = leading_words(index, node, name_node).contains(&"static");
    Some(member)
}

fn build_member(
    index: &SyntaxTreeIndex,
    node: NodeId,
    name: String,
    kind: MemberKind,
    is_async: bool,
    params: Vec<Parameter>,
) -> MemberNode {
    let mut locals: Vec<String> = params.iter().map(|p| p.name.clone()).collect();
    for decl in index.descendants_of_kind(node, &["variable_declarator"]) {
        if let Some(n) = index.child_by_field(decl, "name") {
            if index.kind(n) == "identifier" {
                locals.push(index.text(n).to_string());
            }
        }
    }
    let locals = unique_by_key(locals, |l| l.clone());

    MemberNode {
        node,
        name,
        kind,
        is_async,
        is_static: false,
        params,
        locals,
    }
}

// ─── Parameters ─────────────────────────────────────────────────────

pub(crate) fn formal_parameters(index: &SyntaxTreeIndex, params: NodeId) -> Vec<Parameter> {
    index
        .immediate_children(params)
        .filter(|&p| PARAMETER_KINDS.contains(&index.kind(p)))
        .filter_map(|p| parameter(index, p))
        .collect()
}

fn parameter(index: &SyntaxTreeIndex, param: NodeId) -> Option<Parameter> {
    let pattern = index
        .child_by_field(param, "pattern")
        .or_else(|| index.child_of_kind(param, "identifier"))?;
    if index.kind(pattern) == "this" {
        return None;
    }
    let type_text = index
        .child_by_field(param, "type")
        .or_else(|| index.child_of_kind(param, "type_annotation"))
        .and_then(|t| index.immediate_children(t).next())
        .map(|t| one_line(index.text(t)));
    let initializer = index.child_by_field(param, "value").map(|v| one_line(index.text(v)));

    Some(Parameter {
        name: index.text(pattern).to_string(),
        type_text,
        initializer,
    })
}

// ─── Returns ────────────────────────────────────────────────────────

/// A `return <expr>` inside the member that is not nested in a call
/// expression (callbacks passed to `filter`, `subscribe`, ... don't count).
pub fn returns_value(index: &SyntaxTreeIndex, member: &MemberNode) -> bool {
    index
        .descendants_of_kind(member.node, &["return_statement"])
        .any(|ret| {
            index.immediate_children(ret).next().is_some()
                && !index
                    .ancestors(ret)
                    .take_while(|&a| a != member.node)
                    .any(|a| index.kind(a) == "call_expression")
        })
}

// ─── Helper utilities ───────────────────────────────────────────────

/// Keep the first item per key, preserving order.
pub(crate) fn unique_by_key<T, K, F>(items: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(key(item))).collect()
}

/// Join a multi-line expression (`this.http\n  .get`) onto one line.
pub(crate) fn one_line(text: &str) -> String {
    text.lines().map(str::trim).collect::<Vec<_>>().join("")
}

#[cfg(test)]
#[path = "analysis_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "analysis_tests_calls.rs"]
mod tests_calls;

#[cfg(test)]
#[path = "analysis_tests_dependencies.rs"]
mod tests_dependencies;
