//! Tree-sitter node wrapper implementing [`SyntaxNode`].

use guideline_lint_core::SyntaxNode;
use tree_sitter::Node;

/// A Tree-sitter node paired with the source it was parsed from.
///
/// As a [`SyntaxNode`] it exposes only named, non-extra children: anonymous
/// tokens and comments are never walked, and parent links are not children.
#[derive(Debug, Clone, Copy)]
pub struct TsNode<'t> {
    node: Node<'t>,
    source: &'t str,
}

impl<'t> TsNode<'t> {
    pub(crate) fn new(node: Node<'t>, source: &'t str) -> Self {
        Self { node, source }
    }

    fn wrap(&self, node: Node<'t>) -> Self {
        Self::new(node, self.source)
    }

    /// Grammar kind, e.g. `interface_declaration`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.node.kind()
    }

    /// Source text covered by this node.
    #[must_use]
    pub fn text(&self) -> &'t str {
        self.node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    /// Child stored under a grammar field, e.g. `name` or `return_type`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<Self> {
        self.node.child_by_field_name(name).map(|n| self.wrap(n))
    }

    /// First named, non-extra child.
    #[must_use]
    pub fn first_child(&self) -> Option<Self> {
        self.children().into_iter().next()
    }

    /// Named children of the given kind.
    #[must_use]
    pub fn children_of_kind(&self, kind: &str) -> Vec<Self> {
        self.children()
            .into_iter()
            .filter(|c| c.kind() == kind)
            .collect()
    }

    /// True if any direct child, named or anonymous, has `kind`.
    ///
    /// Used for keyword tokens such as `async` that named-child iteration
    /// skips.
    #[must_use]
    pub fn has_token(&self, kind: &str) -> bool {
        let mut cursor = self.node.walk();
        let found = self.node.children(&mut cursor).any(|c| c.kind() == kind);
        found
    }

    /// Enclosing node.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.node.parent().map(|n| self.wrap(n))
    }

    /// Previous named sibling, skipping comments.
    #[must_use]
    pub fn prev_named_sibling(&self) -> Option<Self> {
        let mut current = self.node.prev_named_sibling();
        while let Some(node) = current {
            if !node.is_extra() {
                return Some(self.wrap(node));
            }
            current = node.prev_named_sibling();
        }
        None
    }

    /// Start position as 1-indexed `(line, column)`.
    #[must_use]
    pub fn start(&self) -> (usize, usize) {
        let pos = self.node.start_position();
        (pos.row + 1, pos.column + 1)
    }
}

impl<'t> SyntaxNode for TsNode<'t> {
    type Id = usize;

    fn id(&self) -> usize {
        self.node.id()
    }

    fn children(&self) -> Vec<Self> {
        let mut cursor = self.node.walk();
        let children: Vec<Node<'t>> = self
            .node
            .named_children(&mut cursor)
            .filter(|n| !n.is_extra())
            .collect();
        children.into_iter().map(|n| self.wrap(n)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileKind, TypeScriptParser};
    use guideline_lint_core::walk;

    const SRC: &str = r"// leading comment
export interface IUser {
  id: number;
}

@Controller('users')
export class UserController {
  @Get()
  async findAll(): Promise<IUser[]> {
    return [];
  }
}
";

    #[test]
    fn walk_skips_comments_and_finds_declarations() {
        let tree = TypeScriptParser::new().parse(SRC, FileKind::TypeScript).unwrap();
        let mut kinds = Vec::new();
        walk(tree.root(), |n| kinds.push(n.kind()));

        assert_eq!(kinds[0], "program");
        assert!(!kinds.contains(&"comment"));
        assert_eq!(kinds.iter().filter(|k| **k == "interface_declaration").count(), 1);
        assert_eq!(kinds.iter().filter(|k| **k == "class_declaration").count(), 1);
        assert_eq!(kinds.iter().filter(|k| **k == "method_definition").count(), 1);
    }

    #[test]
    fn fields_and_positions() {
        let tree = TypeScriptParser::new().parse(SRC, FileKind::TypeScript).unwrap();
        let mut interface = None;
        walk(tree.root(), |n| {
            if n.kind() == "interface_declaration" {
                interface = Some(*n);
            }
        });

        let interface = interface.unwrap();
        assert_eq!(interface.field("name").unwrap().text(), "IUser");
        assert_eq!(interface.start(), (2, 8));
        assert_eq!(interface.parent().unwrap().kind(), "export_statement");
    }

    #[test]
    fn async_keyword_is_a_token() {
        let tree = TypeScriptParser::new().parse(SRC, FileKind::TypeScript).unwrap();
        let mut method = None;
        walk(tree.root(), |n| {
            if n.kind() == "method_definition" {
                method = Some(*n);
            }
        });

        let method = method.unwrap();
        assert!(method.has_token("async"));
        assert_eq!(method.field("name").unwrap().text(), "findAll");
    }
}
