//! Test-skeleton emission.
//!
//! Layout of the generated text, top to bottom: stand-in classes for mocked
//! dependencies, the `describe` wrapper with the variant's state variables,
//! the `TestBed` setup block (variants that use one), the initialization
//! block, the `should create` test, then one test per member.

mod writer;

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::analysis::{
    resolve_calls, resolve_writes, returns_value, unique_by_key, CallRecord, ClassUnderTest,
    DependencyRef, MemberKind, MemberNode, Parameter, ProviderKind, WriteScope,
};
use crate::tree::SyntaxTreeIndex;
use crate::variant::SetupTemplate;
use crate::{GeneratorConfig, Variant};
use writer::CodeWriter;

const SELF_PREFIXES: &[&str] = &["this.", "this?.", "this["];

/// Composes one analyzed class into a Jasmine/`TestBed` test skeleton.
pub struct SkeletonEmitter<'a, 'src> {
    index: &'a SyntaxTreeIndex<'src>,
    class: &'a ClassUnderTest,
    variant: Variant,
    config: &'a GeneratorConfig,
}

impl<'a, 'src> SkeletonEmitter<'a, 'src> {
    pub fn new(
        index: &'a SyntaxTreeIndex<'src>,
        class: &'a ClassUnderTest,
        variant: Variant,
        config: &'a GeneratorConfig,
    ) -> Self {
        Self {
            index,
            class,
            variant,
            config,
        }
    }

    pub fn emit(&self) -> String {
        let template = self.variant.template();
        let stand_ins = stand_in_names(&self.class.constructor_params);
        let mut w = CodeWriter::new(&self.config.indent);

        self.emit_stand_ins(&mut w, &stand_ins);

        w.open(&format!("describe('{}', () => {{", self.class.name));
        for line in template.state_vars {
            w.line(&self.fill(line, ""));
        }

        if let Some(setup) = &template.setup {
            w.blank();
            self.emit_setup(&mut w, setup, &stand_ins);
        }

        w.blank();
        let args = self.constructor_args(&stand_ins);
        w.open("beforeEach(() => {");
        for line in template.init {
            w.line(&self.fill(line, &args));
        }
        w.close("});");

        w.blank();
        w.open("it('should create', () => {");
        w.line(&format!("expect({}).toBeTruthy();", template.var_name));
        w.close("});");

        if self.config.generate_member_tests {
            for member in &self.class.members {
                self.emit_member_test(&mut w, member);
            }
        }

        w.close("});");
        w.finish()
    }

    // ─── File-level blocks ──────────────────────────────────────────

    fn emit_stand_ins(&self, w: &mut CodeWriter, stand_ins: &[Option<String>]) {
        for (dep, name) in self.class.constructor_params.iter().zip(stand_ins) {
            let Some(name) = name else { continue };
            w.line("@Injectable()");
            if dep.methods.is_empty() {
                w.line(&format!("class {} {{ }}", name));
            } else {
                w.open(&format!("class {} {{", name));
                for method in &dep.methods {
                    w.line(&format!("{}() {{ }}", method));
                }
                w.close("}");
            }
            w.blank();
        }
    }

    fn emit_setup(&self, w: &mut CodeWriter, setup: &SetupTemplate, stand_ins: &[Option<String>]) {
        let class = &self.class.name;
        let mut providers = Vec::new();
        if !setup.declares_class {
            providers.push(class.clone());
        }
        for (dep, stand_in) in self.class.constructor_params.iter().zip(stand_ins) {
            if dep.kind() == ProviderKind::Type && !dep.injectable {
                debug!(identifier = %dep.identifier, provide = %dep.provide, "Type is not injectable, no provider");
                continue;
            }
            providers.push(provider_entry(dep, stand_in.as_deref()));
        }

        if setup.compiles {
            w.open("beforeEach(async () => {");
            w.open("await TestBed.configureTestingModule({");
        } else {
            w.open("beforeEach(() => {");
            w.open("TestBed.configureTestingModule({");
        }
        if !setup.imports.is_empty() {
            w.line(&format!("imports: [{}],", setup.imports.join(", ")));
        }
        if setup.declares_class {
            w.line(&format!("declarations: [{}],", class));
        }
        if !setup.schemas.is_empty() {
            w.line(&format!("schemas: [{}],", setup.schemas.join(", ")));
        }
        if providers.is_empty() {
            w.line("providers: []");
        } else {
            w.open("providers: [");
            for provider in &providers {
                w.line(&format!("{},", provider));
            }
            w.close("]");
        }
        w.close(if setup.compiles { "}).compileComponents();" } else { "});" });
        w.close("});");
    }

    /// Arguments for variants that construct the class directly.
    fn constructor_args(&self, stand_ins: &[Option<String>]) -> String {
        self.class
            .constructor_params
            .iter()
            .zip(stand_ins)
            .map(|(dep, stand_in)| match (dep.kind(), stand_in) {
                (ProviderKind::Token, _) => "{}".to_string(),
                (ProviderKind::Type, Some(name)) => format!("new {}()", name),
                (ProviderKind::Type, None) if !dep.injectable => type_default(Some(&dep.provide)).to_string(),
                (ProviderKind::Type, None) => format!("{{}} as {}", dep.provide),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn fill(&self, line: &str, args: &str) -> String {
        line.replace("{class}", &self.class.name)
            .replace("{var}", self.variant.template().var_name)
            .replace("{args}", args)
    }

    // ─── Member tests ───────────────────────────────────────────────

    fn emit_member_test(&self, w: &mut CodeWriter, member: &MemberNode) {
        let var = if member.is_static {
            self.class.name.as_str()
        } else {
            self.variant.template().var_name
        };
        let calls = resolve_calls(self.index, member.node, &member.param_names(), self.config);
        let writes = resolve_writes(self.index, member.node, &member.locals, WriteScope::SelfOnly);
        let result = (member.kind != MemberKind::Setter && returns_value(self.index, member))
            .then(|| self.result_slot(member));

        if calls.is_empty() && writes.is_empty() && result.is_none() {
            debug!(member = %member.name, "Nothing to intercept or assert, skipping member test");
            return;
        }
        debug!(
            member = %member.name,
            calls = calls.len(),
            writes = writes.len(),
            captures_result = result.is_some(),
            is_static = member.is_static,
            "Emitting member test"
        );

        let params: Vec<String> = member
            .params
            .iter()
            .map(|p| format!("let {} = {};", p.name, stand_in_value(p)))
            .collect();
        let spies = unique_by_key(calls.iter().map(|c| spy_line(c, var)).collect::<Vec<_>>(), |l| l.clone());
        let invoke = vec![invocation(member, var, result.as_deref())];
        let result_check: Vec<String> = result
            .iter()
            .map(|slot| format!("expect({}).toBeDefined();", slot))
            .collect();
        let call_checks = unique_by_key(
            calls.iter().map(|c| call_assertion(c, var)).collect::<Vec<_>>(),
            |l| l.clone(),
        );
        let write_checks: Vec<String> = writes
            .iter()
            .map(|wr| format!("expect({}).toBeUndefined();", rewrite_self(&wr.receiver_path, var)))
            .collect();

        w.blank();
        if self.config.wrap_in_describe {
            w.open(&format!("describe('#{}', () => {{", member.name));
        }
        w.open(&format!("it('{}', async () => {{", test_title(member)));
        w.groups(&[params, spies, invoke, result_check, call_checks, write_checks]);
        w.close("});");
        if self.config.wrap_in_describe {
            w.close("});");
        }
    }

    /// Name of the variable capturing the member's return value.
    fn result_slot(&self, member: &MemberNode) -> String {
        let base = &self.config.result_variable;
        let taken = |name: &str| member.params.iter().any(|p| p.name == name);
        if !taken(base) {
            return base.clone();
        }

        let mut n = 2;
        let mut slot = format!("{}{}", base, n);
        while taken(&slot) {
            n += 1;
            slot = format!("{}{}", base, n);
        }
        warn!(
            member = %member.name,
            setting = "result_variable",
            requested = %base,
            used = %slot,
            "Result variable collides with a parameter name"
        );
        slot
    }
}

// ─── Helper utilities ───────────────────────────────────────────────

/// Stand-in class name per dependency; `None` for dependencies that are not
/// mocked. Repeated types are numbered: `MockHttp`, `MockHttp2`, ...
fn stand_in_names(deps: &[DependencyRef]) -> Vec<Option<String>> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    deps.iter()
        .map(|dep| {
            if !dep.mocked {
                return None;
            }
            let type_name = dep.provide.rsplit('.').next().unwrap_or(&dep.provide);
            let base = format!("Mock{}", type_name);
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            Some(if *count == 1 { base } else { format!("{}{}", base, count) })
        })
        .collect()
}

fn provider_entry(dep: &DependencyRef, stand_in: Option<&str>) -> String {
    match (dep.kind(), stand_in) {
        (ProviderKind::Token, _) => format!("{{ provide: {}, useValue: {{}} }}", dep.provide),
        (ProviderKind::Type, Some(name)) => format!("{{ provide: {}, useClass: {} }}", dep.provide, name),
        (ProviderKind::Type, None) => dep.provide.clone(),
    }
}

/// Literal for a parameter stand-in: its default value, else one by type.
fn stand_in_value(param: &Parameter) -> String {
    if let Some(init) = &param.initializer {
        return init.clone();
    }
    type_default(param.type_text.as_deref()).to_string()
}

fn type_default(type_text: Option<&str>) -> &'static str {
    match type_text.map(str::trim) {
        Some("string") => "''",
        Some("number") => "0",
        Some("boolean") => "false",
        Some(t) if t.ends_with("[]") || t.starts_with("Array<") => "[]",
        _ => "{}",
    }
}

fn test_title(member: &MemberNode) -> String {
    match member.kind {
        MemberKind::Getter => format!("should get #{}", member.name),
        MemberKind::Setter => format!("should set #{}", member.name),
        MemberKind::Method | MemberKind::ArrowProperty => format!("should run #{}()", member.name),
    }
}

fn invocation(member: &MemberNode, var: &str, slot: Option<&str>) -> String {
    let target = format!("{}.{}", var, member.name);
    let expr = match member.kind {
        MemberKind::Getter => target,
        MemberKind::Setter => {
            let value = member.params.first().map(|p| p.name.as_str()).unwrap_or("undefined");
            return format!("{} = {};", target, value);
        }
        MemberKind::Method | MemberKind::ArrowProperty => {
            format!("{}({})", target, member.param_names().join(", "))
        }
    };
    let expr = if member.is_async { format!("await {}", expr) } else { expr };
    match slot {
        Some(slot) => format!("const {} = {};", slot, expr),
        None => format!("{};", expr),
    }
}

fn spy_line(call: &CallRecord, var: &str) -> String {
    match &call.producer {
        Some(producer) => format!(
            "spyOn({}, '{}').and.returnValue(of({{}}));",
            rewrite_self(&producer.object, var),
            producer.property
        ),
        None if call.is_async_subscription => {
            format!("{} = of({{}});", rewrite_self(&call.receiver_path, var))
        }
        None => format!("spyOn({}, '{}');", rewrite_self(&call.receiver_path, var), call.method_name),
    }
}

fn call_assertion(call: &CallRecord, var: &str) -> String {
    match &call.producer {
        Some(producer) => format!(
            "expect({}.{}).toHaveBeenCalled();",
            rewrite_self(&producer.object, var),
            producer.property
        ),
        None if call.is_async_subscription => {
            format!("expect({}).toBeDefined();", rewrite_self(&call.receiver_path, var))
        }
        None => format!(
            "expect({}.{}).toHaveBeenCalled();",
            rewrite_self(&call.receiver_path, var),
            call.method_name
        ),
    }
}

/// `this.a.b` → `component.a.b`; other roots are kept as written.
fn rewrite_self(path: &str, var: &str) -> String {
    if path == "this" {
        return var.to_string();
    }
    for prefix in SELF_PREFIXES {
        if let Some(rest) = path.strip_prefix(prefix) {
            return format!("{}{}{}", var, &prefix["this".len()..], rest);
        }
    }
    path.to_string()
}

#[cfg(test)]
#[path = "emit_tests.rs"]
mod tests;
