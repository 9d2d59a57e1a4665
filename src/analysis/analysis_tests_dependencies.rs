//! Constructor dependency extraction.

use super::*;
use crate::tree::index_typescript;

fn dependencies(source: &str, config: &GeneratorConfig) -> Result<Vec<DependencyRef>, GenError> {
    let index = index_typescript(source)?;
    discover_class(&index, Variant::Component, config).map(|c| c.constructor_params)
}

const DEPENDENCY_SOURCE: &str = r#"@Component({ selector: 'app-root' })
export class AppComponent {
  constructor(
    private platform: Platform,
    private storage: StorageService,
    private http: HttpClient,
    @Inject(MAT_DIALOG_DATA) private data: any,
    @Inject('STRING_STR') private config: AppConfig,
    private store: Store<AppState>,
  ) {
    this.platform.ready();
  }

  ngOnInit() {
    this.storage.init();
    this.storage.get('k');
    this.storage.init();
    this.http.get('/x').subscribe();
    this.storage?.clear();
  }
}
"#;

#[test]
fn test_dependency_identity_and_order() {
    let deps = dependencies(DEPENDENCY_SOURCE, &GeneratorConfig::default()).unwrap();
    let summary: Vec<_> = deps
        .iter()
        .map(|d| (d.identifier.as_str(), d.provide.as_str(), d.kind()))
        .collect();
    assert_eq!(summary, vec![
        ("platform", "Platform", ProviderKind::Type),
        ("storage", "StorageService", ProviderKind::Type),
        ("http", "HttpClient", ProviderKind::Type),
        ("data", "MAT_DIALOG_DATA", ProviderKind::Token),
        ("config", "'STRING_STR'", ProviderKind::Token),
        ("store", "Store", ProviderKind::Type),
    ]);
}

#[test]
fn test_dependency_methods_are_distinct_in_order() {
    let deps = dependencies(DEPENDENCY_SOURCE, &GeneratorConfig::default()).unwrap();
    assert_eq!(deps[0].methods, vec!["ready"]);
    assert_eq!(deps[1].methods, vec!["init", "get", "clear"]);
    assert_eq!(deps[2].methods, vec!["get"]);
    assert!(deps[3].methods.is_empty());
}

#[test]
fn test_tokens_are_never_mocked() {
    let deps = dependencies(DEPENDENCY_SOURCE, &GeneratorConfig::default()).unwrap();
    assert!(deps[0].mocked);
    assert!(!deps[3].mocked);
    assert!(!deps[4].mocked);
    assert_eq!(deps[4].declared_type.as_deref(), Some("AppConfig"));
    assert_eq!(deps[5].declared_type.as_deref(), Some("Store<AppState>"));
}

#[test]
fn test_real_providers_are_not_mocked() {
    let source = "@Component({})\nexport class A {\n  constructor(private router: Router, private api: Api) { }\n}";
    let config = GeneratorConfig {
        real_providers: vec!["Router".to_string()],
        ..GeneratorConfig::default()
    };
    let deps = dependencies(source, &config).unwrap();
    assert!(!deps[0].mocked);
    assert!(deps[1].mocked);
}

#[test]
fn test_same_type_twice_gives_two_entries() {
    let source = "@Component({})\nexport class A {\n  constructor(private a: Http, private b: Http) { }\n  run() { this.a.get(); this.b.post(); }\n}";
    let deps = dependencies(source, &GeneratorConfig::default()).unwrap();
    assert_eq!(deps.len(), 2);
    assert_eq!((deps[0].identifier.as_str(), deps[0].provide.as_str()), ("a", "Http"));
    assert_eq!((deps[1].identifier.as_str(), deps[1].provide.as_str()), ("b", "Http"));
    assert_eq!(deps[0].methods, vec!["get"]);
    assert_eq!(deps[1].methods, vec!["post"]);
}

#[test]
fn test_no_constructor_means_no_dependencies() {
    let source = "@Component({})\nexport class A {\n  run() { this.a.get(); }\n}";
    assert!(dependencies(source, &GeneratorConfig::default()).unwrap().is_empty());
}

#[test]
fn test_predefined_and_union_types_are_not_injectable() {
    let source = "@Component({})\nexport class A {\n  constructor(private data: any, private count: number, private mode: 'a' | 'b', private http: Http) { }\n}";
    let deps = dependencies(source, &GeneratorConfig::default()).unwrap();
    let summary: Vec<_> = deps
        .iter()
        .map(|d| (d.provide.as_str(), d.kind(), d.injectable, d.mocked))
        .collect();
    assert_eq!(summary, vec![
        ("any", ProviderKind::Type, false, false),
        ("number", ProviderKind::Type, false, false),
        ("'a' | 'b'", ProviderKind::Type, false, false),
        ("Http", ProviderKind::Type, true, true),
    ]);
}

#[test]
fn test_unannotated_dependency_is_fatal() {
    let source = "@Component({})\nexport class A {\n  constructor(private data) { }\n}";
    let err = dependencies(source, &GeneratorConfig::default()).unwrap_err();
    assert!(matches!(err, GenError::UntypedDependency { ref name } if name == "data"));

    let source = "@Component({})\nexport class A {\n  constructor(data) { }\n}";
    assert!(matches!(
        dependencies(source, &GeneratorConfig::default()),
        Err(GenError::UntypedDependency { .. })
    ));
}
