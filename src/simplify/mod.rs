//! Localized simplification of boolean expressions.
//!
//! `true && x` becomes `x`, `x || true` becomes `true` (when `x` is provably
//! pure), `!!true` becomes `true`, and so on. The action never discards a
//! sub-expression unless the purity analysis proves this safe.

use crate::ast::{NodeId, SyntaxTree};
use crate::error::{ErrorKind, Result};

mod locator;
mod rewrite;

pub use self::locator::{find_target, is_simplifiable};
pub use self::rewrite::rewrite;

/// Outcome of applying the action.
#[derive(Debug, Eq, PartialEq)]
pub enum SimplifyResult {
    /// The tree was rewritten; the id is the node now standing in for the
    /// original target.
    Simplified(NodeId),
    Unchanged,
}

/// The "simplify boolean expression" action.
pub struct SimplifyBooleanExpression {}

impl SimplifyBooleanExpression {
    pub fn new() -> Self {
        Self {}
    }

    /// Whether any expression enclosing `cursor` can be simplified.
    pub fn is_applicable(&self, tree: &SyntaxTree, cursor: NodeId) -> bool {
        find_target(tree, cursor).is_some()
    }

    /// Locates the outermost simplifiable expression and rewrites it.
    ///
    /// Fails with `ErrorKind::Inapplicable` when there is nothing to do; the
    /// tree is then untouched.
    pub fn apply(&self, tree: &mut SyntaxTree, cursor: NodeId) -> Result<NodeId> {
        let target = find_target(tree, cursor).ok_or(ErrorKind::Inapplicable)?;
        rewrite(tree, target)
    }

    /// Re-applies the action from each freshly rewritten node until nothing
    /// more simplifies or `max_passes` rewrites have been performed.
    pub fn apply_to_fixpoint(
        &self,
        tree: &mut SyntaxTree,
        cursor: NodeId,
        max_passes: usize,
    ) -> Result<SimplifyResult> {
        let mut cursor = cursor;
        let mut result = SimplifyResult::Unchanged;

        for _ in 1..=max_passes {
            if !self.is_applicable(tree, cursor) {
                break;
            }
            let replacement = self.apply(tree, cursor)?;
            result = SimplifyResult::Simplified(replacement);
            cursor = replacement;
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader;

    #[test]
    fn test_apply_rewrites_once() {
        let mut tree = loader::parse_str("true && x").unwrap();
        let cursor = tree.node_at_offset(0).unwrap();
        let action = SimplifyBooleanExpression::new();

        assert!(action.is_applicable(&tree, cursor));
        action.apply(&mut tree, cursor).unwrap();

        assert_eq!(tree.to_string(), "x");
    }

    #[test]
    fn test_apply_fails_when_inapplicable() {
        let mut tree = loader::parse_str("x && y").unwrap();
        let cursor = tree.node_at_offset(0).unwrap();
        let action = SimplifyBooleanExpression::new();

        assert!(!action.is_applicable(&tree, cursor));
        let err = action.apply(&mut tree, cursor).unwrap_err();
        match err.kind() {
            crate::error::ErrorKind::Inapplicable => {}
            kind => panic!("unexpected error kind {:?}", kind),
        }
    }

    #[test]
    fn test_fixpoint_cascades_through_ancestors() {
        // GIVEN x && (y || true): only the inner expression is simplifiable
        // at first, the second pass then reduces the outer one.
        let mut tree = loader::parse_str("x && (y || true)").unwrap();
        let cursor = tree.node_at_offset(6).unwrap();
        let action = SimplifyBooleanExpression::new();

        let result = action.apply_to_fixpoint(&mut tree, cursor, 5).unwrap();

        match result {
            SimplifyResult::Simplified(_) => {}
            SimplifyResult::Unchanged => panic!("expected a rewrite"),
        }
        assert_eq!(tree.to_string(), "x");
    }

    #[test]
    fn test_fixpoint_is_idempotent() {
        let mut tree = loader::parse_str("true && x").unwrap();
        let cursor = tree.node_at_offset(0).unwrap();
        let action = SimplifyBooleanExpression::new();

        let replacement = action.apply(&mut tree, cursor).unwrap();
        assert_eq!(tree.to_string(), "x");

        // A second run from the rewritten node finds nothing further.
        let result = action
            .apply_to_fixpoint(&mut tree, replacement, 5)
            .unwrap();
        assert_eq!(result, SimplifyResult::Unchanged);
        assert_eq!(tree.to_string(), "x");
    }

    #[test]
    fn test_fixpoint_respects_pass_bound() {
        let mut tree = loader::parse_str("x && (y || true)").unwrap();
        let cursor = tree.node_at_offset(6).unwrap();
        let action = SimplifyBooleanExpression::new();

        action.apply_to_fixpoint(&mut tree, cursor, 1).unwrap();

        // Only the inner expression was rewritten.
        assert_eq!(tree.to_string(), "x && (true)");
    }
}
