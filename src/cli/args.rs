//! CLI arguments.

use std::path::PathBuf;

use clap::Parser;
use specgen::Variant;

/// Generate a Jasmine/TestBed unit-test skeleton for one Angular TypeScript file
#[derive(Parser, Debug)]
#[command(name = "specgen", version, about, after_help = r#"
VARIANTS (selected from the file name unless --variant is given):
  *.component.ts   @Component class, TestBed setup with compileComponents()
  *.service.ts     @Injectable class, resolved with TestBed.inject()
  *.guard.ts       @Injectable class, resolved with TestBed.inject()
  *.pipe.ts        @Pipe class, constructed directly
  *.ts             single plain class, constructed directly

CONFIG (JSON, every key optional):
  { "include_calls": ["window"], "exclude_calls": ["console"],
    "spy_on_method_params": true, "wrap_in_describe": false,
    "indent": "  ", "result_variable": "result", "real_providers": ["Router"] }

The skeleton is printed to stdout; logging goes to stderr.
"#)]
pub struct Cli {
    /// TypeScript file containing the class under test
    #[arg(short, long)]
    pub file: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the variant chosen from the file name [component, service, pipe, guard, class]
    #[arg(long)]
    pub variant: Option<Variant>,

    /// Emit only the boilerplate, without per-member tests
    #[arg(long)]
    pub no_generate_method_tests: bool,

    /// Print the indexed syntax tree instead of a skeleton
    #[arg(long)]
    pub print_tree: bool,

    /// Log level for stderr output (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
