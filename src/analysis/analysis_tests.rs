//! Class discovery, member model, write resolution and return detection.

use super::*;
use crate::tree::index_typescript;

fn find_member<'a>(class: &'a ClassUnderTest, name: &str, kind: MemberKind) -> &'a MemberNode {
    class
        .members
        .iter()
        .find(|m| m.name == name && m.kind == kind)
        .unwrap_or_else(|| panic!("member {} ({:?}) not found", name, kind))
}

// ─── Discovery ──────────────────────────────────────────────────────

const COMPONENT_SOURCE: &str = r#"import { Component } from '@angular/core';

@Component({ selector: 'app-root', templateUrl: 'app.component.html' })
export class AppComponent {
  title = 'app';

  constructor() { }

  ngOnInit() { this.title = 'x'; }

  get label() { return this.title; }

  set label(value: string) { this.title = value; }

  onClick = (event) => { this.clicked = true; };

  async load(id: string, retries = 3) {
    const attempt = 1;
  }
}
"#;

#[test]
fn test_discover_component_decorated_before_export() {
    let index = index_typescript(COMPONENT_SOURCE).unwrap();
    let class = discover_class(&index, Variant::Component, &GeneratorConfig::default()).unwrap();
    assert_eq!(class.name, "AppComponent");
    assert!(class.constructor_params.is_empty());
    let names: Vec<_> = class.members.iter().map(|m| (m.name.as_str(), m.kind)).collect();
    assert_eq!(names, vec![
        ("ngOnInit", MemberKind::Method),
        ("label", MemberKind::Getter),
        ("label", MemberKind::Setter),
        ("onClick", MemberKind::ArrowProperty),
        ("load", MemberKind::Method),
    ]);
}

#[test]
fn test_member_params_and_async() {
    let index = index_typescript(COMPONENT_SOURCE).unwrap();
    let class = discover_class(&index, Variant::Component, &GeneratorConfig::default()).unwrap();

    let load = find_member(&class, "load", MemberKind::Method);
    assert!(load.is_async);
    assert_eq!(load.params, vec![
        Parameter { name: "id".to_string(), type_text: Some("string".to_string()), initializer: None },
        Parameter { name: "retries".to_string(), type_text: None, initializer: Some("3".to_string()) },
    ]);
    assert_eq!(load.locals, vec!["id", "retries", "attempt"]);

    let on_click = find_member(&class, "onClick", MemberKind::ArrowProperty);
    assert!(!on_click.is_async);
    assert_eq!(on_click.param_names(), vec!["event"]);

    let setter = find_member(&class, "label", MemberKind::Setter);
    assert_eq!(setter.param_names(), vec!["value"]);
    assert!(!find_member(&class, "ngOnInit", MemberKind::Method).is_async);
}

#[test]
fn test_static_members_are_flagged() {
    let source = "export class Registry {\n  static create() { }\n  public static async load() { }\n  static build = () => { };\n  run() { }\n}\n";
    let index = index_typescript(source).unwrap();
    let class = discover_class(&index, Variant::Class, &GeneratorConfig::default()).unwrap();
    let flags: Vec<_> = class.members.iter().map(|m| (m.name.as_str(), m.is_static, m.is_async)).collect();
    assert_eq!(flags, vec![
        ("create", true, false),
        ("load", true, true),
        ("build", true, false),
        ("run", false, false),
    ]);
}

#[test]
fn test_discover_decorator_on_class_without_export() {
    let source = "@Injectable()\nclass UserService {\n  load() { this.x = 1; }\n}\nclass Helper { }\n";
    let index = index_typescript(source).unwrap();
    let class = discover_class(&index, Variant::Service, &GeneratorConfig::default()).unwrap();
    assert_eq!(class.name, "UserService");
    assert_eq!(class.members.len(), 1);
}

#[test]
fn test_discover_missing_decorator_is_fatal() {
    let source = "export class Plain { run() { } }";
    let index = index_typescript(source).unwrap();
    let err = discover_class(&index, Variant::Pipe, &GeneratorConfig::default()).unwrap_err();
    assert!(matches!(err, GenError::ClassNotFound { ref requirement } if requirement == "decorated with @Pipe"));
}

#[test]
fn test_discover_two_components_is_fatal() {
    let source = "@Component({})\nexport class A { }\n@Component({})\nexport class B { }\n";
    let index = index_typescript(source).unwrap();
    let err = discover_class(&index, Variant::Component, &GeneratorConfig::default()).unwrap_err();
    assert!(matches!(err, GenError::TooManyClasses { count: 2, .. }));
}

#[test]
fn test_discover_plain_class() {
    let index = index_typescript("export class Calculator { add(a: number, b: number) { return a + b; } }").unwrap();
    let class = discover_class(&index, Variant::Class, &GeneratorConfig::default()).unwrap();
    assert_eq!(class.name, "Calculator");

    let index = index_typescript("class A { }\nclass B { }").unwrap();
    assert!(matches!(
        discover_class(&index, Variant::Class, &GeneratorConfig::default()),
        Err(GenError::TooManyClasses { count: 2, .. })
    ));

    let index = index_typescript("const x = 1;").unwrap();
    assert!(matches!(
        discover_class(&index, Variant::Class, &GeneratorConfig::default()),
        Err(GenError::ClassNotFound { .. })
    ));
}

#[test]
fn test_decorator_name_forms() {
    let source = "@Pipe({ name: 'trim' })\nexport class TrimPipe { }\n@core.Injectable()\nexport class S { }\n@Sealed\nclass T { }";
    let index = index_typescript(source).unwrap();
    let names: Vec<_> = index
        .descendants_of_kind(index.root(), &["decorator"])
        .filter_map(|d| decorator_name(&index, d))
        .collect();
    assert_eq!(names, vec!["Pipe", "Injectable", "Sealed"]);
}

// ─── Writes ─────────────────────────────────────────────────────────

const WRITES_SOURCE: &str = r#"class A {
  run(param: any) {
    let local = {};
    if (this.flag) {
      this.x.y = 1;
    }
    local.value = 2;
    this.x.y = 3;
    this.items[0].name = 'a';
    this.count += 1;
    this.a = this.b = param;
    param = undefined;
  }
}
"#;

#[test]
fn test_writes_self_only() {
    let index = index_typescript(WRITES_SOURCE).unwrap();
    let class = discover_class(&index, Variant::Class, &GeneratorConfig::default()).unwrap();
    let run = find_member(&class, "run", MemberKind::Method);
    let writes = resolve_writes(&index, run.node, &run.locals, WriteScope::SelfOnly);
    let paths: Vec<_> = writes.iter().map(|w| w.receiver_path.as_str()).collect();
    assert_eq!(paths, vec!["this.x.y", "this.items", "this.count", "this.a", "this.b"]);
    assert!(writes.iter().all(|w| w.is_self));
}

#[test]
fn test_writes_with_locals() {
    let index = index_typescript(WRITES_SOURCE).unwrap();
    let class = discover_class(&index, Variant::Class, &GeneratorConfig::default()).unwrap();
    let run = find_member(&class, "run", MemberKind::Method);
    let writes = resolve_writes(&index, run.node, &run.locals, WriteScope::WithLocals);
    let paths: Vec<_> = writes.iter().map(|w| (w.receiver_path.as_str(), w.is_self)).collect();
    assert_eq!(paths, vec![
        ("this.x.y", true),
        ("local.value", false),
        ("this.items", true),
        ("this.count", true),
        ("this.a", true),
        ("this.b", true),
        ("param", false),
    ]);
}

#[test]
fn test_writes_inside_callbacks_are_found() {
    let source = "class A { init() { this.user$.subscribe(user => this.user = user); } }";
    let index = index_typescript(source).unwrap();
    let class = discover_class(&index, Variant::Class, &GeneratorConfig::default()).unwrap();
    let init = find_member(&class, "init", MemberKind::Method);
    let writes = resolve_writes(&index, init.node, &init.locals, WriteScope::SelfOnly);
    assert_eq!(writes, vec![WriteRecord { receiver_path: "this.user".to_string(), is_self: true }]);
}

// ─── Returns ────────────────────────────────────────────────────────

#[test]
fn test_returns_value() {
    let source = r#"class A {
  real() { if (a) { return "a"; } }
  bare() { return; }
  filtered() { this.items.filter(a => { return a; }); }
  arrow = () => { return 1; };
}"#;
    let index = index_typescript(source).unwrap();
    let class = discover_class(&index, Variant::Class, &GeneratorConfig::default()).unwrap();
    assert!(returns_value(&index, find_member(&class, "real", MemberKind::Method)));
    assert!(!returns_value(&index, find_member(&class, "bare", MemberKind::Method)));
    assert!(!returns_value(&index, find_member(&class, "filtered", MemberKind::Method)));
    assert!(returns_value(&index, find_member(&class, "arrow", MemberKind::ArrowProperty)));
}

// ─── Helpers ────────────────────────────────────────────────────────

#[test]
fn test_unique_by_key_keeps_first() {
    let items = vec![("a", 1), ("b", 2), ("a", 3)];
    assert_eq!(unique_by_key(items, |i| i.0), vec![("a", 1), ("b", 2)]);
}

#[test]
fn test_one_line() {
    assert_eq!(one_line("this.http\n    .get"), "this.http.get");
    assert_eq!(one_line("this.a"), "this.a");
}
