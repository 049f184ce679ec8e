//! # guideline-lint-rules
//!
//! Built-in NestJS coding guideline rules for guideline-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | GL001 | `file-naming` | File names start with an uppercase letter and use PascalCase |
//! | GL002 | `interface-naming` | Interfaces are named `I` + uppercase letter |
//! | GL003 | `controller-return-type` | Controller route handlers return DTO types |
//!
//! ## Usage
//!
//! ```ignore
//! use guideline_lint_core::{Config, Validator};
//! use guideline_lint_rules::default_rules;
//!
//! let config = Config::default();
//! let validator = Validator::builder()
//!     .rules(default_rules(&config))
//!     .config(config)
//!     .build();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod controller_return_type;
pub mod file_naming;
pub mod interface_naming;
mod presets;

pub use controller_return_type::ControllerReturnType;
pub use file_naming::FileNaming;
pub use interface_naming::InterfaceNaming;
pub use presets::{all_rules, default_rules};

/// Re-export core types for convenience.
pub use guideline_lint_core::{Finding, Rule, Severity};
