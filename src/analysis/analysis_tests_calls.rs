//! Call-chain resolution.

use super::*;
use crate::tree::index_typescript;

fn calls_in(source: &str, member: &str, config: &GeneratorConfig) -> Vec<CallRecord> {
    let index = index_typescript(source).unwrap();
    let class = discover_class(&index, Variant::Class, config).unwrap();
    let m = class.members.iter().find(|m| m.name == member).unwrap();
    resolve_calls(&index, m.node, &m.param_names(), config)
}

fn signatures(records: &[CallRecord]) -> Vec<&str> {
    records.iter().map(|r| r.canonical_signature.as_str()).collect()
}

#[test]
fn test_plain_call_on_self() {
    let source = "class A { run() { this.a.b(); this.c = 1; } }";
    let records = calls_in(source, "run", &GeneratorConfig::default());
    assert_eq!(records, vec![CallRecord {
        receiver_path: "this.a".to_string(),
        method_name: "b".to_string(),
        canonical_signature: "this.a.b".to_string(),
        is_async_subscription: false,
        has_nested_call: false,
        uses_parameter: false,
        producer: None,
    }]);
}

#[test]
fn test_chain_collapses_to_subscription_on_allowed_receiver() {
    let source = "class A { run(cb) { a.b().c().subscribe(cb); } }";
    let config = GeneratorConfig {
        include_calls: vec!["a".to_string()],
        ..GeneratorConfig::default()
    };
    let records = calls_in(source, "run", &config);
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.canonical_signature, "a.b().c.subscribe");
    assert_eq!(record.receiver_path, "a.b().c");
    assert_eq!(record.method_name, "subscribe");
    assert!(record.is_async_subscription);
    assert!(record.has_nested_call);
    assert_eq!(record.producer, Some(MemberRef {
        object: "a.b()".to_string(),
        property: "c".to_string(),
    }));
}

#[test]
fn test_unlisted_receiver_is_rejected() {
    let source = "class A { run(cb) { a.b().c().subscribe(cb); } }";
    assert!(calls_in(source, "run", &GeneratorConfig::default()).is_empty());
}

#[test]
fn test_chain_collapses_on_self() {
    let source = "class A { run(cb) { this.a.b().c().subscribe(cb); } }";
    let records = calls_in(source, "run", &GeneratorConfig::default());
    assert_eq!(signatures(&records), vec!["this.a.b().c.subscribe"]);
    assert_eq!(records[0].intercepted_method(), "c");
}

#[test]
fn test_plain_chain_records_deepest_call() {
    let source = "class A { run() { this.a.b().c(); } }";
    let records = calls_in(source, "run", &GeneratorConfig::default());
    assert_eq!(signatures(&records), vec!["this.a.b"]);
}

#[test]
fn test_subscription_forms() {
    let source = r#"class A {
  run(param1) {
    this.sub1.subscribe(data => { });
    this.subb1.subb2.subb3(param1).subscribe(data => { });
    this.sub1.subscribe(other => { });
  }
}"#;
    let records = calls_in(source, "run", &GeneratorConfig::default());
    assert_eq!(signatures(&records), vec!["this.sub1.subscribe", "this.subb1.subb2.subb3.subscribe"]);

    assert!(records[0].is_async_subscription);
    assert!(!records[0].has_nested_call);
    assert_eq!(records[0].receiver_path, "this.sub1");
    assert_eq!(records[0].producer, None);

    assert!(records[1].has_nested_call);
    assert_eq!(records[1].producer, Some(MemberRef {
        object: "this.subb1.subb2".to_string(),
        property: "subb3".to_string(),
    }));
}

#[test]
fn test_calls_inside_subscription_callbacks() {
    let source = r#"class A {
  run() {
    this.a.b.c().subscribe((params) => {
      this.testSubscribe.somefun(1).subscribe((res) => {
        this.fun();
      });
    }, (error) => { });
  }
}"#;
    let records = calls_in(source, "run", &GeneratorConfig::default());
    assert_eq!(signatures(&records), vec![
        "this.a.b.c.subscribe",
        "this.testSubscribe.somefun.subscribe",
        "this.fun",
    ]);
    assert_eq!(records[2].receiver_path, "this");
}

#[test]
fn test_parameter_rooted_calls() {
    let source = r#"class A {
  run(param1, param2) {
    param1.call();
    param2.somevalue = '';
    console.log('x');
    localVar.go();
    somefun();
  }
}"#;
    let records = calls_in(source, "run", &GeneratorConfig::default());
    assert_eq!(signatures(&records), vec!["param1.call"]);
    assert!(records[0].uses_parameter);

    let config = GeneratorConfig {
        spy_on_method_params: false,
        ..GeneratorConfig::default()
    };
    assert!(calls_in(source, "run", &config).is_empty());
}

#[test]
fn test_parameter_invoked_directly_is_dropped() {
    let source = "class A { run(cb) { cb(); cb.call(this); } }";
    let records = calls_in(source, "run", &GeneratorConfig::default());
    assert_eq!(signatures(&records), vec!["cb.call"]);
}

#[test]
fn test_deny_list_wins_over_allow_list() {
    let source = "class A { run() { window.open('x'); } }";
    let allowed = GeneratorConfig {
        include_calls: vec!["window".to_string()],
        ..GeneratorConfig::default()
    };
    assert_eq!(signatures(&calls_in(source, "run", &allowed)), vec!["window.open"]);

    let denied = GeneratorConfig {
        include_calls: vec!["window".to_string()],
        exclude_calls: vec!["window".to_string()],
        ..GeneratorConfig::default()
    };
    assert!(calls_in(source, "run", &denied).is_empty());
}

#[test]
fn test_ignored_methods() {
    let source = "class A { run() { this.items.filter(a => a); this.items.forEach(i => this.save(i)); } }";
    let records = calls_in(source, "run", &GeneratorConfig::default());
    assert_eq!(signatures(&records), vec!["this.save"]);
}

#[test]
fn test_await_and_optional_chaining() {
    let source = r#"class A {
  async run(key: string, value: any) {
    await this.ionStorage?.set(key, value);
    await this.var.func();
  }
}"#;
    let records = calls_in(source, "run", &GeneratorConfig::default());
    assert_eq!(signatures(&records), vec!["this.ionStorage.set", "this.var.func"]);
}

#[test]
fn test_subscript_receiver() {
    let source = "class A { run() { this.platform.something['value1']['value2'].hello(); } }";
    let records = calls_in(source, "run", &GeneratorConfig::default());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].receiver_path, "this.platform.something['value1']['value2']");
    assert_eq!(records[0].method_name, "hello");
}

#[test]
fn test_multiline_chain_is_one_line() {
    let source = "class A {\n  run() {\n    this.http\n      .get('/x')\n      .subscribe();\n  }\n}";
    let records = calls_in(source, "run", &GeneratorConfig::default());
    assert_eq!(signatures(&records), vec!["this.http.get.subscribe"]);
    assert_eq!(records[0].producer.as_ref().map(|p| p.object.as_str()), Some("this.http"));
}

#[test]
fn test_duplicates_collapse_and_resolution_is_stable() {
    let source = "class A { run() { this.a.b(); this.a.b(1); this.a.c(); this.a.b(); } }";
    let first = calls_in(source, "run", &GeneratorConfig::default());
    let second = calls_in(source, "run", &GeneratorConfig::default());
    assert_eq!(signatures(&first), vec!["this.a.b", "this.a.c"]);
    assert_eq!(first, second);
}
