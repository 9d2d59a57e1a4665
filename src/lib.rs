//! # specgen: unit-test skeleton generator for Angular TypeScript classes
//!
//! Reads one TypeScript file containing a single decorated class and produces
//! a Jasmine/`TestBed` test skeleton for it: stand-in dependencies, setup and
//! initialization blocks, a construction test, and one test per member with
//! call interceptions and assertions.
//!
//! ## Library usage
//!
//! [`generate`] runs a full pass. The stages are public for integration
//! testing and benchmarking: [`tree::index_typescript`] builds the
//! [`tree::SyntaxTreeIndex`], [`analysis::discover_class`] derives the class
//! model, and [`SkeletonEmitter`] renders it.

use tracing::{debug, info};

pub mod analysis;
pub mod config;
pub mod emit;
mod error;
pub mod tree;
pub mod variant;

pub use config::GeneratorConfig;
pub use emit::SkeletonEmitter;
pub use error::GenError;
pub use variant::Variant;

/// Generate the test skeleton for the one `variant` class in `source`.
pub fn generate(source: &str, variant: Variant, config: &GeneratorConfig) -> Result<String, GenError> {
    let index = tree::index_typescript(source)?;
    debug!(nodes = index.len(), bytes = source.len(), "Indexed source");

    let class = analysis::discover_class(&index, variant, config)?;
    let skeleton = SkeletonEmitter::new(&index, &class, variant, config).emit();

    info!(
        class = %class.name,
        variant = %variant,
        dependencies = class.constructor_params.len(),
        members = class.members.len(),
        "Generated test skeleton"
    );
    Ok(skeleton)
}

#[cfg(test)]
mod lib_tests {
    use super::*;

    #[test]
    fn test_generate_component() {
        let source = r#"import { Component } from '@angular/core';

@Component({ selector: 'app-root', templateUrl: './app.component.html' })
export class AppComponent {
  title = 'app';

  constructor(private http: HttpClient) { }

  ngOnInit() {
    this.http.get('/api').subscribe(data => this.data = data);
  }
}
"#;
        let output = generate(source, Variant::Component, &GeneratorConfig::default()).unwrap();
        assert!(output.starts_with("@Injectable()\nclass MockHttpClient {\n  get() { }\n}\n\n"));
        assert!(output.contains("describe('AppComponent', () => {\n"));
        assert!(output.contains("        { provide: HttpClient, useClass: MockHttpClient },\n"));
        assert!(output.contains("    spyOn(component.http, 'get').and.returnValue(of({}));\n"));
        assert!(output.contains("    component.ngOnInit();\n"));
        assert!(output.contains("    expect(component.data).toBeUndefined();\n"));
        assert!(output.ends_with("  });\n});\n"));
    }

    #[test]
    fn test_generate_reports_structural_errors() {
        let config = GeneratorConfig::default();
        assert!(matches!(
            generate("export class Plain { }", Variant::Component, &config),
            Err(GenError::ClassNotFound { .. })
        ));
        assert!(matches!(
            generate("@Injectable()\nexport class S {\n  constructor(private x) { }\n}", Variant::Service, &config),
            Err(GenError::UntypedDependency { .. })
        ));
    }

    #[test]
    fn test_generate_plain_class_with_primitive_parameters() {
        let source = "export class Point {\n  constructor(private x: number, private y: number, private label: string | null) { }\n  move() { this.x = 1; }\n}\n";
        let output = generate(source, Variant::Class, &GeneratorConfig::default()).unwrap();
        assert!(!output.contains("class Mock"));
        assert!(output.contains("    instance = new Point(0, 0, {});\n"));
        assert!(output.contains("    instance.move();\n"));
        assert!(output.contains("    expect(instance.x).toBeUndefined();\n"));
    }

    #[test]
    fn test_generate_is_deterministic() {
        let source = "@Injectable()\nexport class S {\n  constructor(private a: A, private b: A) { }\n  run() { this.a.x(); this.b.y().subscribe(); }\n}\n";
        let config = GeneratorConfig::default();
        let first = generate(source, Variant::Service, &config).unwrap();
        let second = generate(source, Variant::Service, &config).unwrap();
        assert_eq!(first, second);
    }
}

// ─── Property-based tests (proptest) ─────────────────────────────────

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Class with one method per `(field, method)` pair; each method calls
    /// `this.field_<f>.call_<m>()` and writes `this.state_<f>`.
    fn synthetic_class(members: &[(String, String)]) -> String {
        let mut src = String::from("export class Synthetic {\n");
        for (i, (field, method)) in members.iter().enumerate() {
            src.push_str(&format!(
                "  run_{}() {{\n    this.field_{}.call_{}();\n    this.state_{} = 1;\n  }}\n",
                i, field, method, field
            ));
        }
        src.push_str("}\n");
        src
    }

    proptest! {
        /// Every member with a call and a write gets exactly one test.
        #[test]
        fn one_test_per_active_member(
            members in prop::collection::vec(("[a-z][a-z0-9]{0,6}", "[a-z][a-z0-9]{0,6}"), 1..8)
        ) {
            let output = generate(&synthetic_class(&members), Variant::Class, &GeneratorConfig::default()).unwrap();
            prop_assert_eq!(output.matches("  it('should run #run_").count(), members.len());
            for (field, method) in &members {
                let assertion = format!("expect(instance.field_{}.call_{}).toHaveBeenCalled();", field, method);
                prop_assert!(output.contains(&assertion));
            }
        }

        /// Layout holds for any indent unit: no trailing whitespace, no double
        /// blank lines, output ends with the closing wrapper.
        #[test]
        fn layout_is_clean_for_any_indent(
            members in prop::collection::vec(("[a-z]{1,5}", "[a-z]{1,5}"), 0..5),
            indent in prop::sample::select(vec!["  ", "    ", "\t"]),
            wrap in any::<bool>()
        ) {
            let config = GeneratorConfig {
                indent: indent.to_string(),
                wrap_in_describe: wrap,
                ..GeneratorConfig::default()
            };
            let output = generate(&synthetic_class(&members), Variant::Class, &config).unwrap();
            for line in output.lines() {
                prop_assert_eq!(line, line.trim_end());
            }
            prop_assert!(!output.contains("\n\n\n"));
            prop_assert!(output.ends_with("});\n"), "output must end with the suite wrapper");
        }

        /// Same input and configuration always give the same text.
        #[test]
        fn generation_is_deterministic(
            members in prop::collection::vec(("[a-z]{1,5}", "[a-z]{1,5}"), 0..5)
        ) {
            let source = synthetic_class(&members);
            let config = GeneratorConfig::default();
            prop_assert_eq!(
                generate(&source, Variant::Class, &config).unwrap(),
                generate(&source, Variant::Class, &config).unwrap()
            );
        }
    }
}
