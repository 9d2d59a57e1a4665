//! Unified error type for skeleton generation.

use thiserror::Error;

/// All errors that can abort a generation pass.
///
/// Anomalies inside a single call or assignment are never reported here;
/// they are dropped where they are found.
#[derive(Error, Debug)]
pub enum GenError {
    /// I/O error (source or config file read)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for `GeneratorConfig`
    #[error("Invalid config file '{path}': {source}")]
    Config {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The TypeScript grammar could not be loaded into the parser
    #[error("Failed to load TypeScript grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// tree-sitter returned no tree
    #[error("Failed to parse source")]
    Parse,

    /// Invalid regex pattern
    #[error("Invalid regex pattern '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// File name does not match any generator variant
    #[error("Invalid file type '{0}'. Only .component.ts, .service.ts, .pipe.ts, .guard.ts and plain .ts files are supported")]
    UnsupportedFile(String),

    /// No class satisfies the variant's requirement
    /// ("decorated with @Component", or "declaration" for plain classes)
    #[error("No class {requirement} found")]
    ClassNotFound { requirement: String },

    /// More than one qualifying class in one file
    #[error("Only one {variant} class per file allowed, found {count}")]
    TooManyClasses { variant: String, count: usize },

    /// Class declaration without a name (`export default class { }`)
    #[error("Class identifier not found")]
    MissingClassName,

    /// Constructor parameter with neither `@Inject(...)` nor a type annotation
    #[error("Constructor parameter '{name}' has neither an injection token nor a type annotation")]
    UntypedDependency { name: String },

    /// A non-root node whose parent cannot be derived from the node list
    #[error("Internal tree inconsistency: node {kind} at {start}..{end} has no parent")]
    OrphanNode {
        kind: String,
        start: usize,
        end: usize,
    },
}
