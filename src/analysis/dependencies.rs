//! Constructor dependency extraction.

use tracing::debug;

use super::types::DependencyRef;
use super::{decorator_name, one_line, unique_by_key, PARAMETER_KINDS};
use crate::tree::{NodeId, SyntaxTreeIndex};
use crate::{GenError, GeneratorConfig};

const INJECT_DECORATOR: &str = "Inject";

/// One [`DependencyRef`] per constructor parameter, in declaration order.
///
/// A class without a constructor has no dependencies. A parameter with
/// neither `@Inject(token)` nor a type annotation is a structural error.
pub fn extract_dependencies(
    index: &SyntaxTreeIndex,
    class: NodeId,
    config: &GeneratorConfig,
) -> Result<Vec<DependencyRef>, GenError> {
    let Some(constructor) = find_constructor(index, class) else {
        return Ok(Vec::new());
    };
    let Some(params) = index.child_by_field(constructor, "parameters") else {
        return Ok(Vec::new());
    };
    let invoked = member_calls(index, class);

    index
        .immediate_children(params)
        .filter(|&p| PARAMETER_KINDS.contains(&index.kind(p)))
        .map(|param| {
            let identifier = param_identifier(index, param)?;
            let declared_type = index
                .child_by_field(param, "type")
                .or_else(|| index.child_of_kind(param, "type_annotation"))
                .and_then(|t| index.immediate_children(t).next());
            let override_token = inject_token(index, param);

            let (provide, injectable) = match (&override_token, declared_type) {
                (Some(token), _) => (token.clone(), true),
                (None, Some(ty)) => type_name(index, ty),
                (None, None) => return Err(GenError::UntypedDependency { name: identifier }),
            };

            let receiver = format!("this.{}", identifier);
            let methods = unique_by_key(
                invoked
                    .iter()
                    .filter(|(object, _)| *object == receiver)
                    .map(|(_, method)| method.clone())
                    .collect(),
                |m| m.clone(),
            );
            let mocked = override_token.is_none() && injectable && !config.is_real_provider(&provide);

            debug!(
                identifier = %identifier,
                provide = %provide,
                token = override_token.is_some(),
                injectable,
                methods = methods.len(),
                "Constructor dependency"
            );

            Ok(DependencyRef {
                identifier,
                declared_type: declared_type.map(|t| one_line(index.text(t))),
                override_token,
                provide,
                methods,
                injectable,
                mocked,
            })
        })
        .collect()
}

fn find_constructor(index: &SyntaxTreeIndex, class: NodeId) -> Option<NodeId> {
    let body = index.child_by_field(class, "body")?;
    index.immediate_children(body).find(|&m| {
        index.kind(m) == "method_definition"
            && index
                .child_by_field(m, "name")
                .is_some_and(|n| index.text(n) == "constructor")
    })
}

fn param_identifier(index: &SyntaxTreeIndex, param: NodeId) -> Result<String, GenError> {
    index
        .child_by_field(param, "pattern")
        .or_else(|| index.child_of_kind(param, "identifier"))
        .map(|p| index.text(p).to_string())
        .ok_or_else(|| GenError::UntypedDependency {
            name: one_line(index.text(param)),
        })
}

/// Raw text of the last argument of an `@Inject(...)` decorator.
fn inject_token(index: &SyntaxTreeIndex, param: NodeId) -> Option<String> {
    let decorator = index
        .immediate_children(param)
        .filter(|&c| index.kind(c) == "decorator")
        .find(|&d| decorator_name(index, d) == Some(INJECT_DECORATOR))?;
    let call = index.child_of_kind(decorator, "call_expression")?;
    let args = index.child_by_field(call, "arguments")?;
    let token = index.immediate_children(args).last()?;
    Some(one_line(index.text(token)))
}

/// Type name and whether it can be provided by class: `Http`,
/// `Store<State>` → `Store`, `ns.Service`. Predefined types (`any`,
/// `number`), unions and literal types keep their text and are not
/// injectable.
fn type_name(index: &SyntaxTreeIndex, ty: NodeId) -> (String, bool) {
    match index.kind(ty) {
        "type_identifier" | "nested_type_identifier" => (index.text(ty).to_string(), true),
        "generic_type" => {
            let name = index
                .child_by_field(ty, "name")
                .or_else(|| index.immediate_children(ty).next())
                .unwrap_or(ty);
            (index.text(name).to_string(), true)
        }
        _ => (one_line(index.text(ty)), false),
    }
}

/// `(object text, method)` for every member call in the class.
fn member_calls(index: &SyntaxTreeIndex, class: NodeId) -> Vec<(String, String)> {
    index
        .descendants_of_kind(class, &["call_expression"])
        .filter_map(|call| {
            let callee = index.child_by_field(call, "function")?;
            if index.kind(callee) != "member_expression" {
                return None;
            }
            let object = index.child_by_field(callee, "object")?;
            let property = index.child_by_field(callee, "property")?;
            Some((one_line(index.text(object)), index.text(property).to_string()))
        })
        .collect()
}
