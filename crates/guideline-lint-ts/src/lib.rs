//! # guideline-lint-ts
//!
//! Tree-sitter TypeScript front end for guideline-lint.
//!
//! - [`TypeScriptParser`] turns `.ts`/`.tsx` source into a [`SyntaxTree`],
//!   treating any recovered syntax error as a [`ParseError`]
//! - [`TsNode`] wraps Tree-sitter nodes so they can be traversed with
//!   [`guideline_lint_core::walk`]

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod node;
mod parser;

pub use node::TsNode;
pub use parser::{FileKind, ParseError, SyntaxTree, TypeScriptParser};
