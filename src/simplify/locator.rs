//! Locating the outermost simplifiable boolean expression.

use crate::analysis::{evaluate, may_discard, purity};
use crate::ast::{ExprKind, NodeId, SyntaxTree};

/// Walks from `cursor` outward through its ancestors and returns the
/// outermost node whose boolean expression can be reduced, if any.
///
/// Favoring the largest enclosing expression means a single invocation
/// simplifies as much as possible in one step.
pub fn find_target(tree: &SyntaxTree, cursor: NodeId) -> Option<NodeId> {
    let mut target = None;
    for ancestor in tree.ancestors(cursor) {
        if is_simplifiable(tree, ancestor) {
            target = Some(ancestor);
        }
    }
    target
}

/// A node is simplifiable when it reduces to a known constant without being a
/// literal itself, or when it is a lazy binary expression with at least one
/// known side whose reduction does not discard anything that is not provably
/// pure.
pub fn is_simplifiable(tree: &SyntaxTree, id: NodeId) -> bool {
    let node = match tree.get(id) {
        Some(node) => node,
        None => return false,
    };

    if !node.kind().is_literal() && evaluate(tree, id).is_known() {
        return true;
    }

    if let ExprKind::Binary { op, lhs, rhs } = node.kind() {
        if op.is_lazy() {
            let lhs_known = evaluate(tree, *lhs).is_known();
            if lhs_known && rhs.is_some() {
                return true;
            }
            // Neither side decides the whole expression on its own, but when
            // both operands are provably pure the constant side can still be
            // dropped or keep the other side per the rewrite rules.
            if let Some(rhs) = rhs {
                let rhs_known = evaluate(tree, *rhs).is_known();
                return may_discard(purity(tree, *lhs))
                    && may_discard(purity(tree, *rhs))
                    && (lhs_known || rhs_known);
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader;

    fn find_in(source: &str) -> Option<String> {
        let tree = loader::parse_str(source).unwrap();
        let cursor = tree.node_at_offset(0).unwrap();
        find_target(&tree, cursor).map(|target| tree.display(target).to_string())
    }

    #[test]
    fn test_known_left_side_with_right_operand() {
        assert_eq!(find_in("true && x"), Some("true && x".to_string()));
        assert_eq!(find_in("false && foo()"), Some("false && foo()".to_string()));
        assert_eq!(find_in("false || f()"), Some("false || f()".to_string()));
    }

    #[test]
    fn test_pure_operands_with_known_right_side() {
        assert_eq!(find_in("x && false"), Some("x && false".to_string()));
        assert_eq!(find_in("x || true"), Some("x || true".to_string()));
    }

    #[test]
    fn test_unknown_purity_blocks_known_right_side() {
        // The left side is not provably pure, so nothing may be discarded.
        assert_eq!(find_in("a() || false"), None);
        assert_eq!(find_in("a() && false"), None);
    }

    #[test]
    fn test_literals_and_opaque_expressions_are_not_targets() {
        assert_eq!(find_in("true"), None);
        assert_eq!(find_in("x"), None);
        assert_eq!(find_in("x && y"), None);
        // Comparisons are not folded, so nothing here is simplifiable.
        assert_eq!(find_in("(1 == 1) && (2 == 2)"), None);
    }

    #[test]
    fn test_outermost_target_wins() {
        // The cursor sits on the innermost literal; the locator still picks
        // the whole expression.
        let tree = loader::parse_str("!!true").unwrap();
        let cursor = tree.node_at_offset(3).unwrap();
        let target = find_target(&tree, cursor).unwrap();
        assert_eq!(target, tree.root().unwrap());

        let tree = loader::parse_str("true && false || x").unwrap();
        let cursor = tree.node_at_offset(0).unwrap();
        let target = find_target(&tree, cursor).unwrap();
        assert_eq!(target, tree.root().unwrap());
    }

    #[test]
    fn test_xor_of_literals_is_a_target() {
        assert_eq!(find_in("true ^ false"), Some("true ^ false".to_string()));
        assert_eq!(find_in("true ^ x"), None);
    }
}
