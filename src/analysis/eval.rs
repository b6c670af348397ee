//! Boolean constant folding.
//!
//! Tries to compute a compile-time boolean value for an expression, e.g.
//! `!!true` evaluates to `true` and `false && foo()` evaluates to `false`.
//! Only literal booleans and the `&&`/`||`/`^`/`!` operators participate;
//! arithmetic and name resolution are out of scope.

use crate::ast::{BinaryOperator, ExprKind, Literal, NodeId, SyntaxTree, UnaryOperator};
use std::fmt;

/// Tri-state result of boolean constant evaluation.
///
/// `Unknown` means "not statically determinable" and propagates
/// conservatively through every operator.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum BoolValue {
    True,
    False,
    Unknown,
}

impl BoolValue {
    pub fn known(value: bool) -> Self {
        if value {
            Self::True
        } else {
            Self::False
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::True => Some(true),
            Self::False => Some(false),
            Self::Unknown => None,
        }
    }

    pub fn negated(self) -> Self {
        match self {
            Self::True => Self::False,
            Self::False => Self::True,
            Self::Unknown => Self::Unknown,
        }
    }
}

impl From<bool> for BoolValue {
    fn from(value: bool) -> Self {
        Self::known(value)
    }
}

impl fmt::Display for BoolValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::True => write!(f, "true"),
            Self::False => write!(f, "false"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Computes the boolean constant value of the expression rooted at `id`.
///
/// Total: any node that cannot be proven constant yields `Unknown`.
pub fn evaluate(tree: &SyntaxTree, id: NodeId) -> BoolValue {
    let node = match tree.get(id) {
        Some(node) => node,
        None => return BoolValue::Unknown,
    };
    match node.kind() {
        ExprKind::Literal(Literal::Bool(value)) => BoolValue::known(*value),
        ExprKind::Paren { inner } => evaluate(tree, *inner),
        ExprKind::Unary {
            op: UnaryOperator::Not,
            operand,
        } => match operand {
            Some(operand) => evaluate(tree, *operand).negated(),
            None => BoolValue::Unknown,
        },
        ExprKind::Binary { op, lhs, rhs } => evaluate_binary(tree, *op, *lhs, *rhs),
        // Nothing else participates in boolean folding.
        ExprKind::Literal(_)
        | ExprKind::Unary { .. }
        | ExprKind::Path(_)
        | ExprKind::QualifiedPath(_)
        | ExprKind::Unit
        | ExprKind::Tuple { .. }
        | ExprKind::Array(_)
        | ExprKind::Struct { .. }
        | ExprKind::Field { .. }
        | ExprKind::Index { .. }
        | ExprKind::Call { .. }
        | ExprKind::MethodCall { .. }
        | ExprKind::Range { .. }
        | ExprKind::Cast { .. }
        | ExprKind::Block { .. }
        | ExprKind::If { .. }
        | ExprKind::Match { .. }
        | ExprKind::While { .. }
        | ExprKind::Loop { .. }
        | ExprKind::For { .. }
        | ExprKind::Lambda { .. }
        | ExprKind::Macro { .. }
        | ExprKind::Try { .. }
        | ExprKind::Break { .. }
        | ExprKind::Continue
        | ExprKind::Return { .. } => BoolValue::Unknown,
    }
}

fn evaluate_binary(
    tree: &SyntaxTree,
    op: BinaryOperator,
    lhs: NodeId,
    rhs: Option<NodeId>,
) -> BoolValue {
    match op {
        // A false left side decides `&&` on its own; the right side may even
        // be missing.
        BinaryOperator::LogicAnd => match evaluate(tree, lhs) {
            BoolValue::False => BoolValue::False,
            BoolValue::True => rhs.map_or(BoolValue::Unknown, |rhs| evaluate(tree, rhs)),
            BoolValue::Unknown => BoolValue::Unknown,
        },
        BinaryOperator::LogicOr => match evaluate(tree, lhs) {
            BoolValue::True => BoolValue::True,
            BoolValue::False => rhs.map_or(BoolValue::Unknown, |rhs| evaluate(tree, rhs)),
            BoolValue::Unknown => BoolValue::Unknown,
        },
        // Xor never short-circuits; both sides must be known.
        BinaryOperator::Xor => {
            let lhs = evaluate(tree, lhs).as_bool();
            let rhs = rhs
                .map_or(BoolValue::Unknown, |rhs| evaluate(tree, rhs))
                .as_bool();
            match (lhs, rhs) {
                (Some(lhs), Some(rhs)) => BoolValue::known(lhs ^ rhs),
                _ => BoolValue::Unknown,
            }
        }
        _ => BoolValue::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Span;
    use crate::loader;

    fn evaluate_str(source: &str) -> BoolValue {
        let tree = loader::parse_str(source).unwrap();
        evaluate(&tree, tree.root().unwrap())
    }

    #[test]
    fn test_literals() {
        assert_eq!(evaluate_str("true"), BoolValue::True);
        assert_eq!(evaluate_str("false"), BoolValue::False);
        assert_eq!(evaluate_str("1"), BoolValue::Unknown);
        assert_eq!(evaluate_str("x"), BoolValue::Unknown);
    }

    #[test]
    fn test_and_short_circuits_on_false() {
        assert_eq!(evaluate_str("false && foo()"), BoolValue::False);
        assert_eq!(evaluate_str("false && x"), BoolValue::False);
        assert_eq!(evaluate_str("true && x"), BoolValue::Unknown);
        assert_eq!(evaluate_str("true && false"), BoolValue::False);
        assert_eq!(evaluate_str("x && false"), BoolValue::Unknown);
    }

    #[test]
    fn test_or_short_circuits_on_true() {
        assert_eq!(evaluate_str("true || foo()"), BoolValue::True);
        assert_eq!(evaluate_str("false || x"), BoolValue::Unknown);
        assert_eq!(evaluate_str("false || true"), BoolValue::True);
        assert_eq!(evaluate_str("x || true"), BoolValue::Unknown);
    }

    #[test]
    fn test_and_with_missing_right_operand() {
        // GIVEN a lazy expression with no right operand
        let mut tree = SyntaxTree::new();
        let lhs = tree.bool_literal(false);
        let binary = tree.insert(
            ExprKind::Binary {
                op: BinaryOperator::LogicAnd,
                lhs,
                rhs: None,
            },
            Span::synthetic(),
        );
        tree.set_root(binary).unwrap();

        // THEN a false left side still decides the result
        assert_eq!(evaluate(&tree, binary), BoolValue::False);

        // WHEN the left side is true instead, nothing can be concluded
        let mut tree = SyntaxTree::new();
        let lhs = tree.bool_literal(true);
        let binary = tree.insert(
            ExprKind::Binary {
                op: BinaryOperator::LogicAnd,
                lhs,
                rhs: None,
            },
            Span::synthetic(),
        );
        tree.set_root(binary).unwrap();
        assert_eq!(evaluate(&tree, binary), BoolValue::Unknown);
    }

    #[test]
    fn test_xor_requires_both_sides() {
        assert_eq!(evaluate_str("true ^ false"), BoolValue::True);
        assert_eq!(evaluate_str("true ^ true"), BoolValue::False);
        assert_eq!(evaluate_str("true ^ x"), BoolValue::Unknown);
        assert_eq!(evaluate_str("x ^ false"), BoolValue::Unknown);
    }

    #[test]
    fn test_not_negates_and_propagates_unknown() {
        assert_eq!(evaluate_str("!true"), BoolValue::False);
        assert_eq!(evaluate_str("!!true"), BoolValue::True);
        assert_eq!(evaluate_str("!x"), BoolValue::Unknown);
        // Other unary operators never fold.
        assert_eq!(evaluate_str("-true"), BoolValue::Unknown);
        assert_eq!(evaluate_str("&true"), BoolValue::Unknown);
    }

    #[test]
    fn test_paren_passes_through() {
        assert_eq!(evaluate_str("(false)"), BoolValue::False);
        assert_eq!(evaluate_str("!(false) && (true || x)"), BoolValue::True);
    }

    #[test]
    fn test_comparisons_are_not_folded() {
        // Comparison operators may be overloaded; they never fold, even with
        // literal operands.
        assert_eq!(evaluate_str("1 == 1"), BoolValue::Unknown);
        assert_eq!(evaluate_str("(1 == 1) && (2 == 2)"), BoolValue::Unknown);
    }
}
