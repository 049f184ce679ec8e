//! Configuration types for guideline-lint.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration for guideline-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// File selection policy.
    #[serde(default)]
    pub selector: SelectorConfig,

    /// Validator settings.
    #[serde(default)]
    pub validator: ValidatorConfig,

    /// Per-rule configurations, keyed by rule name.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the configuration block of a rule, if any.
    #[must_use]
    pub fn rule(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.rules.get(rule_name)
    }
}

/// Which files are eligible for validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Directories scanned by `--all`, relative to the project root.
    #[serde(default = "default_scan_roots")]
    pub scan_roots: Vec<PathBuf>,

    /// Required file extension, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Directory names that are never entered or selected.
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,

    /// File name suffixes that mark test files.
    #[serde(default = "default_test_suffixes")]
    pub test_suffixes: Vec<String>,

    /// Extra glob patterns to exclude.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// File that must exist at the project root before anything runs.
    #[serde(default = "default_project_marker")]
    pub project_marker: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            scan_roots: default_scan_roots(),
            extension: default_extension(),
            exclude_dirs: default_exclude_dirs(),
            test_suffixes: default_test_suffixes(),
            exclude: Vec::new(),
            project_marker: default_project_marker(),
        }
    }
}

fn default_scan_roots() -> Vec<PathBuf> {
    ["src", "lib", "app"].iter().map(PathBuf::from).collect()
}

fn default_extension() -> String {
    "ts".to_string()
}

fn default_exclude_dirs() -> Vec<String> {
    ["node_modules", "dist", "build", ".git"]
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

fn default_test_suffixes() -> Vec<String> {
    vec![".spec.ts".to_string(), ".test.ts".to_string()]
}

fn default_project_marker() -> String {
    "package.json".to_string()
}

/// Validator-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Number of worker threads; `None` or `1` runs sequentially.
    #[serde(default)]
    pub parallelism: Option<usize>,
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Gets a string array option, or `None` when the key is absent.
    #[must_use]
    pub fn get_str_array(&self, key: &str) -> Option<Vec<String>> {
        self.options.get(key).and_then(|v| v.as_array()).map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    #[diagnostic(code(guideline_lint::config::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    #[diagnostic(
        code(guideline_lint::config::parse),
        help("see the [selector], [validator] and [rules.<name>] tables in guidelines.toml")
    )]
    Parse {
        /// Parse error message.
        message: String,
    },
}
