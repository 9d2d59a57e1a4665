//! CLI layer: argument parsing, logging setup and the generate command.

pub mod args;

pub use args::Cli;

use clap::Parser;
use tracing::info;

use specgen::{generate, tree, GenError, GeneratorConfig, Variant};

// ─── Main entry point ───────────────────────────────────────────────

pub fn run() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(parse_log_level(&cli.log_level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    match execute(&cli) {
        Ok(text) => print!("{}", text),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Run one invocation and return the text to print.
pub(crate) fn execute(cli: &Cli) -> Result<String, GenError> {
    let source = std::fs::read_to_string(&cli.file)?;

    if cli.print_tree {
        return Ok(tree::index_typescript(&source)?.render_tree());
    }

    let variant = match cli.variant {
        Some(v) => v,
        None => Variant::from_path(&cli.file)?,
    };
    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::from_json_file(path)?,
        None => GeneratorConfig::default(),
    };
    if cli.no_generate_method_tests {
        config.generate_member_tests = false;
    }

    info!(file = %cli.file.display(), variant = %variant, "Generating test skeleton");
    generate(&source, variant, &config)
}

fn parse_log_level(level: &str) -> tracing::Level {
    match level {
        "error" => tracing::Level::ERROR,
        "warn" => tracing::Level::WARN,
        "debug" => tracing::Level::DEBUG,
        "trace" => tracing::Level::TRACE,
        _ => tracing::Level::INFO,
    }
}
