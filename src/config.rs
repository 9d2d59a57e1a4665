//! Generator configuration: an explicit value passed to every entry point.

use std::path::Path;

use serde::Deserialize;

use crate::GenError;

/// Data-level knobs consumed by the resolvers and the emitter.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Receivers other than `this` whose calls are intercepted (e.g. `window`).
    pub include_calls: Vec<String>,
    /// Receivers whose calls are never intercepted.
    pub exclude_calls: Vec<String>,
    /// Method names never treated as call targets (iteration helpers).
    pub ignore_methods: Vec<String>,
    /// Intercept calls rooted at a method parameter and flag them `uses_parameter`.
    pub spy_on_method_params: bool,
    /// Nest each member test in its own `describe('#member', ...)`.
    pub wrap_in_describe: bool,
    /// Emit member tests at all, or only the boilerplate.
    pub generate_member_tests: bool,
    /// Indent unit applied once per nesting depth.
    pub indent: String,
    /// Method name that marks an async subscription.
    pub subscription_marker: String,
    /// Name of the variable capturing a member's return value.
    pub result_variable: String,
    /// Dependency types provided as-is instead of through a stand-in class.
    pub real_providers: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            include_calls: Vec::new(),
            exclude_calls: vec!["console".to_string(), "alert".to_string(), "JSON".to_string()],
            ignore_methods: ["forEach", "map", "filter", "find", "some", "every", "reduce"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            spy_on_method_params: true,
            wrap_in_describe: false,
            generate_member_tests: true,
            indent: "  ".to_string(),
            subscription_marker: "subscribe".to_string(),
            result_variable: "result".to_string(),
            real_providers: Vec::new(),
        }
    }
}

impl GeneratorConfig {
    /// Load a JSON config file. Missing keys fall back to defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, GenError> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|source| GenError::Config {
            path: path.display().to_string(),
            source,
        })
    }

    pub(crate) fn is_excluded(&self, receiver: &str) -> bool {
        self.exclude_calls.iter().any(|c| c == receiver)
    }

    pub(crate) fn is_included(&self, receiver: &str) -> bool {
        self.include_calls.iter().any(|c| c == receiver)
    }

    pub(crate) fn is_ignored_method(&self, method: &str) -> bool {
        self.ignore_methods.iter().any(|m| m == method)
    }

    pub(crate) fn is_real_provider(&self, type_name: &str) -> bool {
        self.real_providers.iter().any(|p| p == type_name)
    }
}
