//! Structural rewriting of a simplifiable boolean expression.

use crate::analysis::evaluate;
use crate::ast::{BinaryOperator, ExprKind, NodeId, SyntaxTree};
use crate::error::{Error, ErrorKind, Result};

/// Rewrites `target` according to the evaluation facts and returns the id of
/// the node now occupying its place.
///
/// Precondition: `target` satisfies `is_simplifiable`. The tree is mutated by
/// exactly one splice; every failure happens before it, leaving the tree
/// untouched.
pub fn rewrite(tree: &mut SyntaxTree, target: NodeId) -> Result<NodeId> {
    // Case 1: the whole expression folds to a constant.
    if let Some(value) = evaluate(tree, target).as_bool() {
        let literal = tree.bool_literal(value);
        tree.splice(target, literal)?;
        return Ok(literal);
    }

    let (op, lhs, rhs) = match tree.node(target)?.kind() {
        ExprKind::Binary { op, lhs, rhs } if op.is_lazy() => (*op, *lhs, *rhs),
        _ => {
            return Err(inconsistency(
                target,
                "not constant and not a lazy binary expression",
            ))
        }
    };
    let rhs = match rhs {
        Some(rhs) => rhs,
        None => return Err(inconsistency(target, "no right operand to fall back to")),
    };

    // Case 2: the left side is known but did not decide the whole
    // expression (`true && rhs`, `false || rhs`), so the result is whatever
    // the right side yields. Only the known-constant left side is dropped.
    if evaluate(tree, lhs).is_known() {
        tree.splice(target, rhs)?;
        return Ok(rhs);
    }

    // Case 3: only the right side is known. Dropping the unevaluated left
    // side is legal here because the simplifiability predicate has proven it
    // pure.
    match (op, evaluate(tree, rhs).as_bool()) {
        (BinaryOperator::LogicAnd, Some(false)) => {
            let literal = tree.bool_literal(false);
            tree.splice(target, literal)?;
            Ok(literal)
        }
        (BinaryOperator::LogicAnd, Some(true)) | (BinaryOperator::LogicOr, Some(false)) => {
            tree.splice(target, lhs)?;
            Ok(lhs)
        }
        (BinaryOperator::LogicOr, Some(true)) => {
            let literal = tree.bool_literal(true);
            tree.splice(target, literal)?;
            Ok(literal)
        }
        _ => Err(inconsistency(
            target,
            "neither operand evaluates to a constant",
        )),
    }
}

fn inconsistency(target: NodeId, reason: &str) -> Error {
    ErrorKind::Inconsistent(format!("cannot rewrite node {}: {}", target, reason)).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader;
    use crate::simplify::find_target;

    fn rewrite_str(source: &str) -> String {
        let mut tree = loader::parse_str(source).unwrap();
        let cursor = tree.node_at_offset(0).unwrap();
        let target = find_target(&tree, cursor).expect("expected a simplifiable expression");
        rewrite(&mut tree, target).unwrap();
        tree.to_string()
    }

    #[test]
    fn test_known_left_side_keeps_right_operand() {
        assert_eq!(rewrite_str("true && x"), "x");
        assert_eq!(rewrite_str("false || x"), "x");
        assert_eq!(rewrite_str("true && f()"), "f()");
    }

    #[test]
    fn test_constant_expression_becomes_literal() {
        assert_eq!(rewrite_str("false && foo()"), "false");
        assert_eq!(rewrite_str("true || foo()"), "true");
        assert_eq!(rewrite_str("!!true"), "true");
        assert_eq!(rewrite_str("true ^ true"), "false");
        assert_eq!(rewrite_str("!(false)"), "true");
    }

    #[test]
    fn test_known_right_side_with_pure_left_operand() {
        assert_eq!(rewrite_str("x && true"), "x");
        assert_eq!(rewrite_str("x && false"), "false");
        assert_eq!(rewrite_str("x || false"), "x");
        assert_eq!(rewrite_str("x || true"), "true");
    }

    #[test]
    fn test_rewrite_inside_enclosing_expression() {
        // The inner lazy expression is the outermost simplifiable node; the
        // enclosing tree survives the splice.
        assert_eq!(rewrite_str("(true && x) && y"), "(x) && y");
    }

    #[test]
    fn test_releases_discarded_subtree() {
        let mut tree = loader::parse_str("false && foo(a, b)").unwrap();
        let cursor = tree.node_at_offset(0).unwrap();
        let target = find_target(&tree, cursor).unwrap();

        rewrite(&mut tree, target).unwrap();

        // Only the fresh literal remains.
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.to_string(), "false");
    }

    #[test]
    fn test_inconsistent_target_fails_loudly() {
        // GIVEN a lazy expression where neither side is known; the predicate
        // would never select it, so rewrite must refuse.
        let mut tree = loader::parse_str("x && y").unwrap();
        let target = tree.root().unwrap();
        let before = tree.to_string();

        let err = rewrite(&mut tree, target).unwrap_err();

        match err.kind() {
            ErrorKind::Inconsistent(_) => {}
            kind => panic!("unexpected error kind {:?}", kind),
        }
        // The failure happened before any mutation.
        assert_eq!(tree.to_string(), before);
    }
}
