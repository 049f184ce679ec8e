//! TypeScript parser adapter using Tree-sitter.

use std::path::Path;
use tree_sitter::{Language, Node, Parser, Tree};

use crate::node::TsNode;

/// Grammar dialect selected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Plain TypeScript (`.ts`, `.mts`, `.cts`).
    TypeScript,
    /// TypeScript with JSX markup (`.tsx`).
    Tsx,
}

impl FileKind {
    /// Picks the dialect for `path`; anything but `.tsx` is plain TypeScript.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsx") => Self::Tsx,
            _ => Self::TypeScript,
        }
    }

    fn language(self) -> Language {
        match self {
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TypeScript => write!(f, "typescript"),
            Self::Tsx => write!(f, "tsx"),
        }
    }
}

/// Why a source file could not be turned into a usable syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum ParseError {
    /// The grammar could not be loaded into the parser.
    #[error("cannot load {kind} grammar: {message}")]
    #[diagnostic(code(guideline_lint::parse::language))]
    Language {
        /// Dialect that failed to load.
        kind: FileKind,
        /// Tree-sitter's explanation.
        message: String,
    },

    /// The parser gave up without producing a tree.
    #[error("parser produced no tree")]
    #[diagnostic(code(guideline_lint::parse::aborted))]
    Aborted,

    /// The source is malformed.
    #[error("syntax error at {line}:{column}")]
    #[diagnostic(
        code(guideline_lint::parse::syntax),
        help("rules fall back to pattern matching for files that do not parse")
    )]
    Syntax {
        /// Line of the first error (1-indexed).
        line: usize,
        /// Column of the first error (1-indexed).
        column: usize,
    },
}

/// A successfully parsed file.
pub struct SyntaxTree<'src> {
    tree: Tree,
    source: &'src str,
}

impl<'src> SyntaxTree<'src> {
    /// The root (`program`) node.
    #[must_use]
    pub fn root(&self) -> TsNode<'_> {
        TsNode::new(self.tree.root_node(), self.source)
    }

    /// The parsed source text.
    #[must_use]
    pub fn source(&self) -> &'src str {
        self.source
    }
}

/// Parses TypeScript and TSX source.
///
/// Stateless: a fresh Tree-sitter parser is created per call, so one
/// instance can be shared by rules running on several threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptParser;

impl TypeScriptParser {
    /// Creates a new parser adapter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parses `source` in the given dialect.
    ///
    /// Tree-sitter recovers from errors, so a tree containing any error or
    /// missing node is reported as [`ParseError::Syntax`] at the first one.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when the grammar cannot be loaded or the source
    /// is malformed.
    pub fn parse<'src>(
        &self,
        source: &'src str,
        kind: FileKind,
    ) -> Result<SyntaxTree<'src>, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&kind.language())
            .map_err(|e| ParseError::Language {
                kind,
                message: e.to_string(),
            })?;

        let tree = parser.parse(source, None).ok_or(ParseError::Aborted)?;
        let root = tree.root_node();

        if root.has_error() {
            let at = first_error(root).unwrap_or(root);
            let pos = at.start_position();
            return Err(ParseError::Syntax {
                line: pos.row + 1,
                column: pos.column + 1,
            });
        }

        Ok(SyntaxTree { tree, source })
    }
}

/// Finds the first `ERROR` or missing node in document order.
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|c| c.has_error() || c.is_missing())
        .find_map(first_error)
}
