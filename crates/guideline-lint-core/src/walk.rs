//! Generic pre-order traversal over syntax trees.
//!
//! Every AST-based rule walks its tree through [`walk`], so the traversal
//! order and the cycle guard live in exactly one place.

use std::collections::HashSet;
use std::hash::Hash;

/// A node of an arbitrarily shaped syntax tree.
///
/// `children` must yield only child nodes: parent links, token lists and
/// comment lists are not children. If a node shape cannot rule out
/// back-references, [`walk`] still terminates because it never visits the
/// same [`id`](SyntaxNode::id) twice.
pub trait SyntaxNode: Sized {
    /// Identity of a node, stable for the lifetime of the tree.
    type Id: Eq + Hash;

    /// Returns this node's identity.
    fn id(&self) -> Self::Id;

    /// Returns the child nodes in source order.
    fn children(&self) -> Vec<Self>;
}

/// Visits `root` and all its descendants in pre-order, depth-first.
///
/// `visit` is called exactly once per distinct node, root included.
pub fn walk<N, F>(root: N, mut visit: F)
where
    N: SyntaxNode,
    F: FnMut(&N),
{
    let mut seen = HashSet::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if !seen.insert(node.id()) {
            continue;
        }
        visit(&node);

        let mut children = node.children();
        children.reverse();
        stack.extend(children);
    }
}
