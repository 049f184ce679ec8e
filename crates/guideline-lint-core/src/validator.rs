//! Validator: runs every rule against every selected file.

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Once;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::context::FileContext;
use crate::rule::{Rule, RuleBox};
use crate::selector::FileSet;
use crate::types::{Finding, Severity, ValidationReport};

/// Builder for configuring a [`Validator`].
#[derive(Default)]
pub struct ValidatorBuilder {
    rules: Vec<RuleBox>,
    config: Option<Config>,
}

impl ValidatorBuilder {
    /// Creates a new builder with no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule. Rules run in the order they are added.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Appends a boxed rule.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Appends several boxed rules, keeping their order.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleBox>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the validator, dropping rules disabled in the configuration.
    #[must_use]
    pub fn build(self) -> Validator {
        let config = self.config.unwrap_or_default();
        let rules = self
            .rules
            .into_iter()
            .filter(|rule| {
                let enabled = config.is_rule_enabled(rule.name());
                if !enabled {
                    debug!("Skipping disabled rule: {}", rule.name());
                }
                enabled
            })
            .collect();

        Validator {
            rules,
            parallelism: config.validator.parallelism.unwrap_or(1).max(1),
        }
    }
}

/// Orchestrates validation of a [`FileSet`] with an ordered rule list.
///
/// Use [`Validator::builder()`] to construct an instance.
pub struct Validator {
    rules: Vec<RuleBox>,
    parallelism: usize,
}

impl Validator {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    /// Names of the active rules, in execution order.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Validates every file and returns the finished report.
    ///
    /// Never fails: a rule that errors or panics on a file contributes one
    /// warning finding and the run continues.
    #[must_use]
    pub fn validate(&self, files: &FileSet) -> ValidationReport {
        info!(
            "Validating {} file(s) with {} rule(s)",
            files.len(),
            self.rules.len()
        );

        let per_file = if self.parallelism > 1 && files.len() > 1 {
            self.validate_parallel(files)
        } else {
            files.iter().map(|f| self.validate_file(files, f)).collect()
        };

        let mut report = ValidationReport::new();
        for (file, findings) in files.iter().zip(per_file) {
            report.record(file, findings);
        }

        info!(
            "Validation complete: {} error(s), {} warning(s) in {} file(s)",
            report.error_count, report.warning_count, report.files_checked
        );
        report
    }

    /// Runs files on a dedicated pool. `collect` on an indexed parallel
    /// iterator keeps input order, so grouping matches the sequential run.
    fn validate_parallel(&self, files: &FileSet) -> Vec<Vec<Finding>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.parallelism)
            .build();

        match pool {
            Ok(pool) => pool.install(|| {
                files
                    .as_slice()
                    .par_iter()
                    .map(|f| self.validate_file(files, f))
                    .collect()
            }),
            Err(e) => {
                warn!("Cannot start {} worker threads ({e}); running sequentially", self.parallelism);
                files.iter().map(|f| self.validate_file(files, f)).collect()
            }
        }
    }

    /// Runs every rule on one file, in registration order.
    fn validate_file(&self, files: &FileSet, path: &Path) -> Vec<Finding> {
        debug!("Validating: {}", path.display());

        let ctx = FileContext::located(path, files.resolve(path));
        let mut findings = Vec::new();

        for rule in &self.rules {
            let outcome = contained(|| rule.check(&ctx));
            match outcome {
                Ok(Ok(rule_findings)) => findings.extend(rule_findings),
                Ok(Err(e)) => findings.push(rule_fault(rule.as_ref(), path, &e.to_string())),
                Err(payload) => {
                    let reason = panic_message(payload.as_ref());
                    findings.push(rule_fault(rule.as_ref(), path, &reason));
                }
            }
        }

        findings
    }
}

/// The single warning that stands in for a failed rule execution.
fn rule_fault(rule: &dyn Rule, path: &Path, reason: &str) -> Finding {
    warn!(
        "Rule {} failed on {}: {reason}",
        rule.name(),
        path.display()
    );
    Finding::new(
        rule.code(),
        rule.name(),
        Severity::Warning,
        path,
        format!(
            "Rule '{}' could not be applied to {}: {reason}",
            rule.name(),
            path.display()
        ),
    )
}

thread_local! {
    static IN_RULE: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// Runs `f`, catching a panic without printing it.
///
/// The process panic hook is wrapped once; it stays silent only on a thread
/// that is inside a rule, so panics elsewhere still print.
fn contained<T>(f: impl FnOnce() -> T) -> std::thread::Result<T> {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !IN_RULE.with(Cell::get) {
                previous(info);
            }
        }));
    });

    IN_RULE.with(|flag| flag.set(true));
    let outcome = panic::catch_unwind(AssertUnwindSafe(f));
    IN_RULE.with(|flag| flag.set(false));
    outcome
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "rule panicked".to_string()
    }
}
