//! Check command implementation.

use anyhow::{bail, Context, Result};
use guideline_lint_core::{FileSelector, Selection, TerminalCapabilities, Validator};
use guideline_lint_rules::default_rules;
use std::path::{Path, PathBuf};

use super::output;
use crate::config_resolver;
use crate::OutputFormat;

/// Options collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Explicit files; take precedence over `all` and `branch`.
    pub files: Vec<PathBuf>,
    /// Scan the whole project.
    pub all: bool,
    /// Base for change-set selection.
    pub branch: Option<String>,
    /// Detailed report.
    pub verbose: bool,
    /// Output format.
    pub format: OutputFormat,
    /// Explicit config file.
    pub config: Option<PathBuf>,
}

impl CheckOptions {
    fn selection(&self) -> Selection {
        if !self.files.is_empty() {
            Selection::Explicit(self.files.clone())
        } else if self.all {
            Selection::FullScan
        } else {
            Selection::ChangeSet {
                base: self.branch.clone(),
            }
        }
    }
}

/// Runs validation for the project at `root`.
///
/// Returns whether the run passed (no error findings).
///
/// # Errors
///
/// Fails before any file is processed when the configuration cannot be
/// loaded or `root` is not a project root.
pub fn run(root: &Path, options: &CheckOptions) -> Result<bool> {
    let config = config_resolver::resolve(root, options.config.as_deref()).load()?;
    ensure_project_root(root, &config.selector.project_marker)?;

    let text = options.format == OutputFormat::Text;
    let capabilities = TerminalCapabilities::detect();
    if text {
        output::banner(options.verbose, capabilities);
    }

    let selection = options.selection();
    let selector =
        FileSelector::new(root, &config.selector).context("Invalid selector configuration")?;
    let outcome = selector.select(&selection);
    output::selection_warnings(&outcome.warnings)?;

    if outcome.files.is_empty() && matches!(selection, Selection::ChangeSet { .. }) {
        output::nothing_changed(options.format)?;
        return Ok(true);
    }
    if text && options.verbose {
        output::selected(&outcome.files);
    }

    let validator = Validator::builder()
        .rules(default_rules(&config))
        .config(config)
        .build();
    tracing::info!(
        "Checking {} file(s) with rules: {}",
        outcome.files.len(),
        validator.rule_names().join(", ")
    );

    let report = validator.validate(&outcome.files);
    output::print(&report, options.format, options.verbose, capabilities.renderer(root))?;

    Ok(report.success)
}

fn ensure_project_root(root: &Path, marker: &str) -> Result<()> {
    if root.join(marker).is_file() {
        return Ok(());
    }
    bail!(
        "{marker} not found in {}. Run guideline-lint from the root of your NestJS project.",
        root.display()
    )
}
