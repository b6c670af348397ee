//! Builds arena syntax trees from textual expressions.
//!
//! The grammar produces a boxed parse tree; this module translates it
//! bottom-up into a `SyntaxTree`, preserving source spans so the cursor can
//! be resolved by byte offset.

use crate::ast::{ArrayExpr, ExprKind, Literal, NodeId, StructField, SyntaxTree};
use crate::error::Result;
use crate::parser;
use std::fs;
use std::path::Path;

/// Loads and parses the expression contained in the given file.
pub fn load_file(path: &Path) -> Result<SyntaxTree> {
    let source = fs::read_to_string(path)?;
    parse_str(&source)
}

/// Parses a single expression into an arena tree.
pub fn parse_str(source: &str) -> Result<SyntaxTree> {
    let expr = parser::parse_expression(source)?;
    let mut tree = SyntaxTree::new();
    let root = build(&mut tree, &expr);
    tree.set_root(root)?;
    Ok(tree)
}

fn build(tree: &mut SyntaxTree, expr: &parser::Expr) -> NodeId {
    let kind = match &expr.kind {
        parser::ExprKind::Bool(value) => ExprKind::Literal(Literal::boolean(*value)),
        parser::ExprKind::Integer(value) => ExprKind::Literal(Literal::integer(*value)),
        parser::ExprKind::Str(value) => ExprKind::Literal(Literal::string(value.clone())),
        parser::ExprKind::Path(path) => ExprKind::Path(path.clone()),
        parser::ExprKind::Unit => ExprKind::Unit,
        parser::ExprKind::Paren(inner) => ExprKind::Paren {
            inner: build(tree, inner),
        },
        parser::ExprKind::Tuple(elements) => ExprKind::Tuple {
            elements: build_all(tree, elements),
        },
        parser::ExprKind::Array(elements) => {
            ExprKind::Array(ArrayExpr::List(build_all(tree, elements)))
        }
        parser::ExprKind::Repeat { value, length } => ExprKind::Array(ArrayExpr::Repeat {
            value: build(tree, value),
            length: build(tree, length),
        }),
        parser::ExprKind::Struct { path, fields, base } => ExprKind::Struct {
            path: path.clone(),
            fields: fields
                .iter()
                .map(|(name, value)| StructField {
                    name: name.clone(),
                    value: build(tree, value),
                })
                .collect(),
            base: base.as_ref().map(|base| build(tree, base)),
        },
        parser::ExprKind::Field { base, name } => ExprKind::Field {
            base: build(tree, base),
            name: name.clone(),
        },
        parser::ExprKind::Index { base, index } => ExprKind::Index {
            base: build(tree, base),
            index: build(tree, index),
        },
        parser::ExprKind::Call { callee, arguments } => ExprKind::Call {
            callee: build(tree, callee),
            arguments: build_all(tree, arguments),
        },
        parser::ExprKind::MethodCall {
            receiver,
            method,
            arguments,
        } => ExprKind::MethodCall {
            receiver: build(tree, receiver),
            method: method.clone(),
            arguments: build_all(tree, arguments),
        },
        parser::ExprKind::Unary { op, operand } => ExprKind::Unary {
            op: *op,
            operand: Some(build(tree, operand)),
        },
        parser::ExprKind::Binary { op, lhs, rhs } => ExprKind::Binary {
            op: *op,
            lhs: build(tree, lhs),
            rhs: Some(build(tree, rhs)),
        },
        parser::ExprKind::Range { start, end } => ExprKind::Range {
            start: start.as_ref().map(|start| build(tree, start)),
            end: end.as_ref().map(|end| build(tree, end)),
        },
        parser::ExprKind::Try(inner) => ExprKind::Try {
            inner: build(tree, inner),
        },
        parser::ExprKind::Break(value) => ExprKind::Break {
            value: value.as_ref().map(|value| build(tree, value)),
        },
        parser::ExprKind::Continue => ExprKind::Continue,
        parser::ExprKind::Return(value) => ExprKind::Return {
            value: value.as_ref().map(|value| build(tree, value)),
        },
    };
    tree.insert(kind, expr.span)
}

fn build_all(tree: &mut SyntaxTree, exprs: &[parser::Expr]) -> Vec<NodeId> {
    exprs.iter().map(|expr| build(tree, expr)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(source: &str) -> String {
        parse_str(source).unwrap().to_string()
    }

    #[test]
    fn test_round_trips() {
        for source in &[
            "true && x",
            "false || foo()",
            "!(a ^ b)",
            "(a, b, c)",
            "[a, b]",
            "[f(); 4]",
            "Point { x: 1, y: 2 }",
            "a.b.c(1)[0]?",
            "x || y && z",
            "&mut x",
            "return a",
            "1..n",
        ] {
            assert_eq!(&round_trip(source), source);
        }
    }

    #[test]
    fn test_struct_shorthand_is_desugared() {
        assert_eq!(round_trip("Point { x }"), "Point { x: x }");
    }

    #[test]
    fn test_parent_links_are_complete() {
        let tree = parse_str("!(true && x)").unwrap();
        let root = tree.root().unwrap();

        let literal = tree.node_at_offset(2).unwrap();
        let chain: Vec<NodeId> = tree.ancestors(literal).collect();
        assert_eq!(chain.last(), Some(&root));
        assert_eq!(chain.len(), 4); // literal, &&, paren, !
    }

    #[test]
    fn test_cursor_resolution() {
        let tree = parse_str("true && x").unwrap();
        let cursor = tree.node_at_offset(1).unwrap();
        match tree.node(cursor).unwrap().kind() {
            ExprKind::Literal(Literal::Bool(true)) => {}
            kind => panic!("unexpected kind {:?}", kind),
        }
    }

    #[test]
    fn test_parse_error_reports_position() {
        let err = parse_str("true &&").unwrap_err();
        match err.kind() {
            crate::error::ErrorKind::Parse(_) => {}
            kind => panic!("unexpected error kind {:?}", kind),
        }
    }
}
