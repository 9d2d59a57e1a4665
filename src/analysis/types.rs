//! Records derived from one class during one generation pass.

use crate::tree::NodeId;

// ─── Class model ────────────────────────────────────────────────────

/// The single decorated class a skeleton is generated for.
#[derive(Debug, Clone)]
pub struct ClassUnderTest {
    pub name: String,
    /// `class_declaration` node.
    pub node: NodeId,
    pub constructor_params: Vec<DependencyRef>,
    pub members: Vec<MemberNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Method,
    Getter,
    Setter,
    /// Field initialized with an arrow function: `onClick = (e) => { ... }`.
    ArrowProperty,
}

/// A member that gets its own test block.
#[derive(Debug, Clone)]
pub struct MemberNode {
    /// `method_definition` or `public_field_definition` node; its subtree is
    /// what the resolvers walk.
    pub node: NodeId,
    pub name: String,
    pub kind: MemberKind,
    pub is_async: bool,
    /// Reached through the class name rather than the instance.
    pub is_static: bool,
    pub params: Vec<Parameter>,
    /// Parameter names plus every `let`/`const`/`var` declared in the member.
    pub locals: Vec<String>,
}

impl MemberNode {
    pub fn param_names(&self) -> Vec<String> {
        self.params.iter().map(|p| p.name.clone()).collect()
    }
}

/// Formal parameter of a member or constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    /// Type annotation text without the leading `:`.
    pub type_text: Option<String>,
    /// Default value expression text.
    pub initializer: Option<String>,
}

// ─── Dependencies ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// `@Inject(TOKEN)`: provided as a value.
    Token,
    /// Injected by declared type: provided as a stand-in class.
    Type,
}

/// One constructor parameter, as a dependency to provide in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRef {
    /// Parameter name, i.e. the field reached through `this.<identifier>`.
    pub identifier: String,
    /// Raw type annotation, if any.
    pub declared_type: Option<String>,
    /// Raw token text from `@Inject(...)`; quotes kept for string tokens.
    pub override_token: Option<String>,
    /// Injection identity: the token, else the type name.
    pub provide: String,
    /// Distinct methods invoked on `this.<identifier>`, first appearance first.
    pub methods: Vec<String>,
    /// Declared type names a class. False for predefined types (`number`,
    /// `any`), unions and literal types.
    pub injectable: bool,
    /// False for token-based dependencies, non-injectable types and
    /// configured real providers.
    pub mocked: bool,
}

impl DependencyRef {
    pub fn kind(&self) -> ProviderKind {
        if self.override_token.is_some() {
            ProviderKind::Token
        } else {
            ProviderKind::Type
        }
    }
}

// ─── Calls and writes ───────────────────────────────────────────────

/// `object.property` split of a member access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRef {
    pub object: String,
    pub property: String,
}

/// A test-relevant call, after chain collapsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    pub receiver_path: String,
    pub method_name: String,
    /// `receiver_path.method_name`; the deduplication key.
    pub canonical_signature: String,
    pub is_async_subscription: bool,
    /// The subscribed stream is itself produced by a call (see `producer`).
    pub has_nested_call: bool,
    /// Rooted at a method parameter rather than `this` or an allowed receiver.
    pub uses_parameter: bool,
    /// Call that yields the subscribed stream, when `has_nested_call`.
    pub producer: Option<MemberRef>,
}

impl CallRecord {
    /// Method a test intercepts for this record.
    pub fn intercepted_method(&self) -> &str {
        match &self.producer {
            Some(p) => &p.property,
            None => &self.method_name,
        }
    }
}

/// Which left-hand roots count as writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteScope {
    /// Only `this.<field>` writes.
    SelfOnly,
    /// Also writes to the member's own locals/parameters.
    WithLocals,
}

/// A field write reachable anywhere inside a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    pub receiver_path: String,
    pub is_self: bool,
}
