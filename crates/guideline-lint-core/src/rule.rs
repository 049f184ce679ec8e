//! Rule trait for defining guideline rules.

use std::path::PathBuf;

use crate::context::FileContext;
use crate::types::{Finding, Severity};

/// A fault raised while a rule inspects a file.
///
/// Parse failures are not faults: rules handle them by switching to their
/// text-based fallback. Anything returned here is downgraded to a warning by
/// the [`Validator`](crate::Validator).
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// The file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The syntax tree had a shape the rule cannot handle.
    #[error("unexpected syntax in {path}: {message}")]
    Syntax {
        /// File being inspected.
        path: PathBuf,
        /// What was unexpected.
        message: String,
    },

    /// A fallback pattern failed to compile.
    #[error("invalid fallback pattern: {0}")]
    Pattern(String),
}

/// A per-file guideline rule.
///
/// Implementations are stateless: the same file always yields the same
/// findings. Rules that parse source should treat a parse failure as a signal
/// to use their regex fallback rather than returning an error.
///
/// # Example
///
/// ```ignore
/// use guideline_lint_core::{FileContext, Finding, Rule, RuleError, Severity};
///
/// pub struct NoDefaultExport;
///
/// impl Rule for NoDefaultExport {
///     fn name(&self) -> &'static str { "no-default-export" }
///     fn code(&self) -> &'static str { "GL100" }
///
///     fn check(&self, ctx: &FileContext) -> Result<Vec<Finding>, RuleError> {
///         let source = ctx.read_source()?;
///         Ok(source
///             .contains("export default")
///             .then(|| self.finding(ctx, Severity::Warning, "avoid default exports"))
///             .into_iter()
///             .collect())
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "file-naming").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "GL001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Checks a single file and returns any findings.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] when the file cannot be inspected at all.
    fn check(&self, ctx: &FileContext) -> Result<Vec<Finding>, RuleError>;

    /// Builds a finding for `ctx`'s file tagged with this rule's identity.
    fn finding(&self, ctx: &FileContext, severity: Severity, message: String) -> Finding {
        Finding::new(self.code(), self.name(), severity, ctx.path, message)
    }
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
