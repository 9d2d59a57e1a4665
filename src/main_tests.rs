use super::*;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use crate::cli::{execute, Cli};
use specgen::{GenError, Variant};

const PIPE_SOURCE: &str = "@Pipe({ name: 'trim' })\nexport class TrimPipe {\n  transform(value: string) { return value.trim(); }\n}\n";

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn cli_for(file: &Path, extra: &[&str]) -> Cli {
    let file = file.to_string_lossy().to_string();
    let mut argv = vec!["specgen", "--file", file.as_str()];
    argv.extend_from_slice(extra);
    Cli::try_parse_from(argv).unwrap()
}

// ─── Argument parsing ───────────────────────────────────────────────

#[test]
fn test_parse_all_flags() {
    let cli = Cli::try_parse_from([
        "specgen", "--file", "a.ts", "--config", "cfg.json", "--variant", "pipe",
        "--no-generate-method-tests", "--print-tree", "--log-level", "debug",
    ])
    .unwrap();
    assert_eq!(cli.file, PathBuf::from("a.ts"));
    assert_eq!(cli.config, Some(PathBuf::from("cfg.json")));
    assert_eq!(cli.variant, Some(Variant::Pipe));
    assert!(cli.no_generate_method_tests);
    assert!(cli.print_tree);
    assert_eq!(cli.log_level, "debug");
}

#[test]
fn test_parse_defaults() {
    let cli = Cli::try_parse_from(["specgen", "-f", "a.component.ts"]).unwrap();
    assert_eq!(cli.variant, None);
    assert_eq!(cli.config, None);
    assert!(!cli.no_generate_method_tests);
    assert_eq!(cli.log_level, "info");
}

#[test]
fn test_parse_rejects_unknown_variant_and_missing_file() {
    assert!(Cli::try_parse_from(["specgen", "--file", "a.ts", "--variant", "widget"]).is_err());
    assert!(Cli::try_parse_from(["specgen"]).is_err());
}

// ─── Execution ──────────────────────────────────────────────────────

#[test]
fn test_variant_from_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "trim.pipe.ts", PIPE_SOURCE);
    let output = execute(&cli_for(&path, &[])).unwrap();
    assert!(output.starts_with("describe('TrimPipe', () => {\n  let pipe: TrimPipe;\n"));
    assert!(output.contains("    const result = pipe.transform(value);\n"));
}

#[test]
fn test_variant_override() {
    let dir = tempfile::tempdir().unwrap();
    let source = "@Injectable()\nexport class Helper {\n  constructor(private http: Http) { }\n}\n";
    let path = write_file(dir.path(), "helper.ts", source);
    let output = execute(&cli_for(&path, &["--variant", "service"])).unwrap();
    assert!(output.contains("    service = TestBed.inject(Helper);\n"));
}

#[test]
fn test_config_file_and_member_test_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "trim.pipe.ts", PIPE_SOURCE);
    let config = write_file(dir.path(), "specgen.json", r#"{ "indent": "\t" }"#);
    let config_arg = config.to_string_lossy().to_string();

    let output = execute(&cli_for(&path, &["--config", config_arg.as_str()])).unwrap();
    assert!(output.contains("\tlet pipe: TrimPipe;\n"));
    assert!(output.contains("should run #transform()"));

    let output = execute(&cli_for(&path, &["--config", config_arg.as_str(), "--no-generate-method-tests"])).unwrap();
    assert!(!output.contains("should run #transform()"));
}

#[test]
fn test_print_tree() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "trim.pipe.ts", PIPE_SOURCE);
    let output = execute(&cli_for(&path, &["--print-tree"])).unwrap();
    assert!(output.starts_with("0(program): @Pipe({ name: 'trim' })\n"));
    assert!(output.contains("(class_declaration): class TrimPipe {\n"));
}

#[test]
fn test_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "styles.css", "body { }");
    assert!(matches!(execute(&cli_for(&path, &[])), Err(GenError::UnsupportedFile(_))));

    let missing = dir.path().join("missing.component.ts");
    assert!(matches!(execute(&cli_for(&missing, &[])), Err(GenError::Io(_))));

    let path = write_file(dir.path(), "plain.component.ts", "export class Plain { }");
    let err = execute(&cli_for(&path, &[])).unwrap_err();
    assert_eq!(err.to_string(), "No class decorated with @Component found");
}
