//! Index-addressed storage for expression nodes.

use crate::ast::{ExprKind, Literal, Node, Span};
use crate::error::Result;
use std::fmt;

/// Stable index of a `Node` within a `SyntaxTree`.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An expression tree stored in an arena of stable indices.
///
/// Indices are never reused. Discarding a subtree vacates its slots
/// explicitly, so a released id can no longer be resolved.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SyntaxTree {
    nodes: Vec<Option<Node>>,
    root: Option<NodeId>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Get the root node id, if a root has been set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Sets the root of this tree to the given node.
    pub fn set_root(&mut self, root: NodeId) -> Result<()> {
        if self.get(root).is_some() {
            self.root = Some(root);
            return Ok(());
        }
        Err("Index does not exist for set_root".into())
    }

    /// Inserts a new node built from `kind`. The children referenced by
    /// `kind` are re-parented to the new node.
    pub fn insert(&mut self, kind: ExprKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len());
        for child in kind.children() {
            if let Some(node) = self.nodes.get_mut(child.index()).and_then(Option::as_mut) {
                node.set_parent(Some(id));
            }
        }
        self.nodes.push(Some(Node::new(kind, span)));
        id
    }

    /// Constructs a fresh boolean literal node with a synthetic span.
    pub fn bool_literal(&mut self, value: bool) -> NodeId {
        self.insert(
            ExprKind::Literal(Literal::boolean(value)),
            Span::synthetic(),
        )
    }

    /// Get a `Node` by id. Fails if the id was never allocated or if its
    /// subtree has been released.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.get(id)
            .ok_or_else(|| format!("Node with index {} does not exist", id).into())
    }

    /// Infallible lookup; `None` for vacated or out-of-range ids.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    /// Get the parent id of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    /// Iterates over `id` and its ancestors, innermost first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors {
        Ancestors {
            tree: self,
            current: Some(id),
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replaces the child slot `old` of `parent` with `new`. Only the slot is
    /// updated; parent links and the old subtree are the caller's concern.
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) -> Result<()> {
        let node = self
            .nodes
            .get_mut(parent.index())
            .and_then(Option::as_mut)
            .ok_or_else(|| format!("Node with index {} does not exist", parent))?;
        match node
            .kind_mut()
            .child_slots_mut()
            .into_iter()
            .find(|slot| **slot == old)
        {
            Some(slot) => {
                *slot = new;
                Ok(())
            }
            None => Err(format!("Node {} is not a child of node {}", old, parent).into()),
        }
    }

    /// Substitutes `replacement` for `target` within the tree and releases
    /// the remainder of `target`'s subtree. `replacement` may be a descendant
    /// of `target` (operand relocation); it is then detached first and
    /// survives the release.
    pub fn splice(&mut self, target: NodeId, replacement: NodeId) -> Result<()> {
        self.node(target)?;
        self.node(replacement)?;
        if target == replacement {
            return Err(format!("Cannot splice node {} onto itself", target).into());
        }

        let parent = self.parent(target);
        match parent {
            Some(parent) => self.replace_child(parent, target, replacement)?,
            None => {
                if self.root != Some(target) {
                    return Err(format!("Node {} is detached and cannot be spliced", target).into());
                }
                self.root = Some(replacement);
            }
        }

        if let Some(node) = self
            .nodes
            .get_mut(replacement.index())
            .and_then(Option::as_mut)
        {
            node.set_parent(parent);
        }
        self.release(target, Some(replacement));

        Ok(())
    }

    /// Drops the subtree rooted at `id`, vacating every slot except the
    /// `keep` subtree.
    fn release(&mut self, id: NodeId, keep: Option<NodeId>) {
        if Some(id) == keep {
            return;
        }
        if let Some(node) = self.nodes.get_mut(id.index()).and_then(Option::take) {
            for child in node.kind().children() {
                self.release(child, keep);
            }
        }
    }

    /// Returns the innermost node whose span contains the given byte offset.
    ///
    /// Synthetic (empty) spans never match, so freshly rewritten literals are
    /// not addressable by offset.
    pub fn node_at_offset(&self, offset: usize) -> Option<NodeId> {
        let mut best: Option<(usize, NodeId)> = None;
        for (index, slot) in self.nodes.iter().enumerate() {
            if let Some(node) = slot {
                if !node.span().is_empty() && node.span().contains(offset) {
                    let len = node.span().len();
                    if best.map_or(true, |(best_len, _)| len < best_len) {
                        best = Some((len, NodeId(index)));
                    }
                }
            }
        }
        best.map(|(_, id)| id)
    }
}

/// Iterator over a node and its chain of parents.
pub struct Ancestors<'a> {
    tree: &'a SyntaxTree,
    current: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.current?;
        self.current = self.tree.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOperator, ExprKind, Literal};

    fn lazy_and(tree: &mut SyntaxTree, lhs: NodeId, rhs: NodeId) -> NodeId {
        tree.insert(
            ExprKind::Binary {
                op: BinaryOperator::LogicAnd,
                lhs,
                rhs: Some(rhs),
            },
            Span::synthetic(),
        )
    }

    #[test]
    fn test_insert_sets_parent_links() {
        let mut tree = SyntaxTree::new();
        let lhs = tree.bool_literal(true);
        let rhs = tree.insert(ExprKind::Path("x".to_string()), Span::synthetic());
        let binary = lazy_and(&mut tree, lhs, rhs);

        assert_eq!(tree.parent(lhs), Some(binary));
        assert_eq!(tree.parent(rhs), Some(binary));
        assert_eq!(tree.parent(binary), None);
    }

    #[test]
    fn test_splice_literal_over_root() {
        // GIVEN true && x as root
        let mut tree = SyntaxTree::new();
        let lhs = tree.bool_literal(true);
        let rhs = tree.insert(ExprKind::Path("x".to_string()), Span::synthetic());
        let binary = lazy_and(&mut tree, lhs, rhs);
        tree.set_root(binary).unwrap();

        // WHEN splicing a fresh literal over the root
        let literal = tree.bool_literal(false);
        tree.splice(binary, literal).unwrap();

        // THEN the literal is the root and the old subtree is gone
        assert_eq!(tree.root(), Some(literal));
        assert!(tree.get(binary).is_none());
        assert!(tree.get(lhs).is_none());
        assert!(tree.get(rhs).is_none());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_splice_relocates_descendant() {
        // GIVEN true && x
        let mut tree = SyntaxTree::new();
        let lhs = tree.bool_literal(true);
        let rhs = tree.insert(ExprKind::Path("x".to_string()), Span::synthetic());
        let binary = lazy_and(&mut tree, lhs, rhs);
        tree.set_root(binary).unwrap();

        // WHEN splicing the right operand over the whole expression
        tree.splice(binary, rhs).unwrap();

        // THEN the operand survives, detached from the released nodes
        assert_eq!(tree.root(), Some(rhs));
        assert_eq!(tree.parent(rhs), None);
        assert!(tree.get(binary).is_none());
        assert!(tree.get(lhs).is_none());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_splice_inner_node_keeps_enclosing_tree() {
        // GIVEN (true && x) && y, splicing x over the inner binary
        let mut tree = SyntaxTree::new();
        let lhs = tree.bool_literal(true);
        let x = tree.insert(ExprKind::Path("x".to_string()), Span::synthetic());
        let inner = lazy_and(&mut tree, lhs, x);
        let y = tree.insert(ExprKind::Path("y".to_string()), Span::synthetic());
        let outer = lazy_and(&mut tree, inner, y);
        tree.set_root(outer).unwrap();

        tree.splice(inner, x).unwrap();

        // THEN the outer expression now holds x directly
        assert_eq!(tree.parent(x), Some(outer));
        match tree.node(outer).unwrap().kind() {
            ExprKind::Binary { lhs, .. } => assert_eq!(*lhs, x),
            kind => panic!("unexpected kind {:?}", kind),
        }
        assert!(tree.get(inner).is_none());
    }

    #[test]
    fn test_replace_child_rejects_non_child() {
        let mut tree = SyntaxTree::new();
        let lhs = tree.bool_literal(true);
        let rhs = tree.bool_literal(false);
        let binary = lazy_and(&mut tree, lhs, rhs);
        let stranger = tree.insert(ExprKind::Path("z".to_string()), Span::synthetic());

        assert!(tree.replace_child(binary, stranger, lhs).is_err());
    }

    #[test]
    fn test_released_id_is_gone() {
        let mut tree = SyntaxTree::new();
        let literal = tree.bool_literal(true);
        let paren = tree.insert(ExprKind::Paren { inner: literal }, Span::synthetic());
        tree.set_root(paren).unwrap();

        let replacement = tree.bool_literal(false);
        tree.splice(paren, replacement).unwrap();

        assert!(tree.node(paren).is_err());
        assert!(tree.node(literal).is_err());
    }

    #[test]
    fn test_node_at_offset_prefers_innermost() {
        // GIVEN spans as in source "true && x"
        let mut tree = SyntaxTree::new();
        let lhs = tree.insert(
            ExprKind::Literal(Literal::boolean(true)),
            Span::new(0, 4),
        );
        let rhs = tree.insert(ExprKind::Path("x".to_string()), Span::new(8, 9));
        let binary = tree.insert(
            ExprKind::Binary {
                op: BinaryOperator::LogicAnd,
                lhs,
                rhs: Some(rhs),
            },
            Span::new(0, 9),
        );
        tree.set_root(binary).unwrap();

        assert_eq!(tree.node_at_offset(2), Some(lhs));
        assert_eq!(tree.node_at_offset(8), Some(rhs));
        assert_eq!(tree.node_at_offset(6), Some(binary));
        assert_eq!(tree.node_at_offset(42), None);
    }

    #[test]
    fn test_ancestors_walks_to_root() {
        let mut tree = SyntaxTree::new();
        let literal = tree.bool_literal(true);
        let paren = tree.insert(ExprKind::Paren { inner: literal }, Span::synthetic());
        let not = tree.insert(
            ExprKind::Unary {
                op: crate::ast::UnaryOperator::Not,
                operand: Some(paren),
            },
            Span::synthetic(),
        );
        tree.set_root(not).unwrap();

        let chain: Vec<NodeId> = tree.ancestors(literal).collect();
        assert_eq!(chain, vec![literal, paren, not]);
    }
}
