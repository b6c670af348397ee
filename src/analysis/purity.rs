//! Conservative purity classification.
//!
//! Purely structural: no type information, no name resolution. An expression
//! is `Pure` when discarding it unevaluated cannot change program behavior,
//! `Impure` when it provably can, and `Unknown` otherwise. Callers must treat
//! `Unknown` like `Impure`; only `Pure` authorizes discarding.

use crate::ast::{ArrayExpr, ExprKind, NodeId, SyntaxTree};
use std::fmt;

/// Tri-state purity classification.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum Purity {
    Pure,
    Impure,
    Unknown,
}

impl fmt::Display for Purity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Pure => write!(f, "pure"),
            Self::Impure => write!(f, "impure"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// The single authorization point for discarding an unevaluated expression.
pub fn may_discard(purity: Purity) -> bool {
    purity == Purity::Pure
}

/// Classifies the expression rooted at `id`.
///
/// Total: any node whose effects cannot be ruled out yields `Unknown`.
pub fn purity(tree: &SyntaxTree, id: NodeId) -> Purity {
    let node = match tree.get(id) {
        Some(node) => node,
        None => return Purity::Unknown,
    };
    match node.kind() {
        // Control flow escapes the surrounding expression; discarding one of
        // these changes the execution path.
        ExprKind::Break { .. }
        | ExprKind::Continue
        | ExprKind::Return { .. }
        | ExprKind::Try { .. } => Purity::Impure,
        ExprKind::Path(_)
        | ExprKind::QualifiedPath(_)
        | ExprKind::Literal(_)
        | ExprKind::Unit => Purity::Pure,
        ExprKind::Paren { inner } => purity(tree, *inner),
        ExprKind::Field { base, .. } => purity(tree, *base),
        ExprKind::Tuple { elements } => aggregate(tree, elements),
        ExprKind::Array(ArrayExpr::List(elements)) => aggregate(tree, elements),
        // The length of a repeat form is a compile-time constant; only the
        // repeated value matters.
        ExprKind::Array(ArrayExpr::Repeat { value, .. }) => purity(tree, *value),
        ExprKind::Struct { base: Some(_), .. } => Purity::Unknown,
        ExprKind::Struct {
            fields, base: None, ..
        } => {
            let values: Vec<NodeId> = fields.iter().map(|field| field.value).collect();
            aggregate(tree, &values)
        }
        // Operators and indexing may be overloaded, calls and blocks can do
        // anything: not provably pure.
        ExprKind::Binary { .. }
        | ExprKind::Unary { .. }
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
        | ExprKind::Macro { .. } => Purity::Unknown,
    }
}

/// Tri-state all-elements reduction: if assuming unknown-is-pure and
/// unknown-is-impure agree on the outcome, that outcome holds; otherwise the
/// aggregate is `Unknown`.
fn aggregate(tree: &SyntaxTree, elements: &[NodeId]) -> Purity {
    let mut optimistic = true;
    let mut pessimistic = true;
    for &element in elements {
        match purity(tree, element) {
            Purity::Pure => {}
            Purity::Impure => {
                optimistic = false;
                pessimistic = false;
            }
            Purity::Unknown => {
                pessimistic = false;
            }
        }
    }
    if optimistic == pessimistic {
        if optimistic {
            Purity::Pure
        } else {
            Purity::Impure
        }
    } else {
        Purity::Unknown
    }
}
