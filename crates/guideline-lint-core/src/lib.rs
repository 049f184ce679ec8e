//! # guideline-lint-core
//!
//! Core framework for validating coding guidelines in TypeScript backends.
//!
//! This crate provides the foundational pieces every rule and front end
//! shares:
//!
//! - [`Rule`] trait for per-file guideline rules
//! - [`walk`] generic pre-order traversal over any [`SyntaxNode`]
//! - [`FileSelector`] for explicit, full-scan, and git change-set selection
//! - [`Validator`] for running an ordered rule list over a [`FileSet`]
//! - [`ValidationReport`] and [`Reporter`] for grouping and printing findings
//!
//! ## Example
//!
//! ```ignore
//! use guideline_lint_core::{Config, FileSelector, Selection, Validator};
//!
//! let config = Config::default();
//! let selector = FileSelector::new(".", &config.selector)?;
//! let files = selector.select(&Selection::FullScan).files;
//!
//! let validator = Validator::builder()
//!     .rule(MyRule::new())
//!     .config(config)
//!     .build();
//!
//! let report = validator.validate(&files);
//! assert!(report.success);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
mod reporter;
mod rule;
mod selector;
mod types;
mod validator;
mod vcs;
mod walk;

pub use config::{Config, ConfigError, RuleConfig, SelectorConfig, ValidatorConfig};
pub use context::{line_column, FileContext};
pub use reporter::{HyperlinkLocator, LocatorRenderer, PlainLocator, Reporter, TerminalCapabilities};
pub use rule::{Rule, RuleBox, RuleError};
pub use selector::{FilePolicy, FileSelector, FileSet, Selection, SelectionOutcome, SelectorError};
pub use types::{FileFindings, Finding, Severity, ValidationReport};
pub use validator::{Validator, ValidatorBuilder};
pub use vcs::{ChangeSource, GitCli, VcsError};
pub use walk::{walk, SyntaxNode};
