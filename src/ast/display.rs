//! Structural single-line rendering of expression trees.

use crate::ast::{ArrayExpr, ExprKind, NodeId, SyntaxTree};
use std::fmt;

/// Borrowed view rendering a node and its subtree as source text.
pub struct NodeDisplay<'a> {
    tree: &'a SyntaxTree,
    id: NodeId,
}

impl SyntaxTree {
    pub fn display(&self, id: NodeId) -> NodeDisplay {
        NodeDisplay { tree: self, id }
    }
}

impl<'a> NodeDisplay<'a> {
    fn child(&self, id: NodeId) -> NodeDisplay<'a> {
        NodeDisplay {
            tree: self.tree,
            id,
        }
    }

    fn write_list(&self, f: &mut fmt::Formatter, ids: &[NodeId]) -> fmt::Result {
        for (index, id) in ids.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", self.child(*id))?;
        }
        Ok(())
    }
}

impl<'a> fmt::Display for NodeDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let node = match self.tree.get(self.id) {
            Some(node) => node,
            None => return write!(f, "<released:{}>", self.id),
        };
        match node.kind() {
            ExprKind::Literal(literal) => write!(f, "{}", literal),
            ExprKind::Path(path) => write!(f, "{}", path),
            ExprKind::QualifiedPath(path) => write!(f, "{}", path),
            ExprKind::Unit => write!(f, "()"),
            ExprKind::Paren { inner } => write!(f, "({})", self.child(*inner)),
            ExprKind::Tuple { elements } => match elements.as_slice() {
                [single] => write!(f, "({},)", self.child(*single)),
                elements => {
                    write!(f, "(")?;
                    self.write_list(f, elements)?;
                    write!(f, ")")
                }
            },
            ExprKind::Array(ArrayExpr::List(elements)) => {
                write!(f, "[")?;
                self.write_list(f, elements)?;
                write!(f, "]")
            }
            ExprKind::Array(ArrayExpr::Repeat { value, length }) => {
                write!(f, "[{}; {}]", self.child(*value), self.child(*length))
            }
            ExprKind::Struct { path, fields, base } => {
                if fields.is_empty() && base.is_none() {
                    return write!(f, "{} {{}}", path);
                }
                write!(f, "{} {{ ", path)?;
                for (index, field) in fields.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", field.name, self.child(field.value))?;
                }
                if let Some(base) = base {
                    if !fields.is_empty() {
                        write!(f, ", ")?;
                    }
                    write!(f, "..{}", self.child(*base))?;
                }
                write!(f, " }}")
            }
            ExprKind::Field { base, name } => write!(f, "{}.{}", self.child(*base), name),
            ExprKind::Index { base, index } => {
                write!(f, "{}[{}]", self.child(*base), self.child(*index))
            }
            ExprKind::Call { callee, arguments } => {
                write!(f, "{}(", self.child(*callee))?;
                self.write_list(f, arguments)?;
                write!(f, ")")
            }
            ExprKind::MethodCall {
                receiver,
                method,
                arguments,
            } => {
                write!(f, "{}.{}(", self.child(*receiver), method)?;
                self.write_list(f, arguments)?;
                write!(f, ")")
            }
            ExprKind::Unary { op, operand } => match operand {
                Some(operand) => write!(f, "{}{}", op, self.child(*operand)),
                None => write!(f, "{}", op),
            },
            ExprKind::Binary { op, lhs, rhs } => match rhs {
                Some(rhs) => write!(f, "{} {} {}", self.child(*lhs), op, self.child(*rhs)),
                None => write!(f, "{} {}", self.child(*lhs), op),
            },
            ExprKind::Range { start, end } => {
                if let Some(start) = start {
                    write!(f, "{}", self.child(*start))?;
                }
                write!(f, "..")?;
                if let Some(end) = end {
                    write!(f, "{}", self.child(*end))?;
                }
                Ok(())
            }
            ExprKind::Cast { operand, ty } => write!(f, "{} as {}", self.child(*operand), ty),
            ExprKind::Block { tail } => match tail {
                Some(tail) => write!(f, "{{ {} }}", self.child(*tail)),
                None => write!(f, "{{ }}"),
            },
            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                write!(f, "if {} {}", self.child(*condition), self.child(*then_branch))?;
                if let Some(else_branch) = else_branch {
                    write!(f, " else {}", self.child(*else_branch))?;
                }
                Ok(())
            }
            ExprKind::Match { scrutinee, arms } => {
                write!(f, "match {} {{ ", self.child(*scrutinee))?;
                for (index, arm) in arms.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} => {}", arm.pattern, self.child(arm.body))?;
                }
                write!(f, " }}")
            }
            ExprKind::While { condition, body } => {
                write!(f, "while {} {}", self.child(*condition), self.child(*body))
            }
            ExprKind::Loop { body } => write!(f, "loop {}", self.child(*body)),
            ExprKind::For {
                binding,
                iterable,
                body,
            } => write!(
                f,
                "for {} in {} {}",
                binding,
                self.child(*iterable),
                self.child(*body)
            ),
            ExprKind::Lambda { parameters, body } => {
                write!(f, "|{}| {}", parameters, self.child(*body))
            }
            ExprKind::Macro { path, tokens } => write!(f, "{}!({})", path, tokens),
            ExprKind::Try { inner } => write!(f, "{}?", self.child(*inner)),
            ExprKind::Break { value } => match value {
                Some(value) => write!(f, "break {}", self.child(*value)),
                None => write!(f, "break"),
            },
            ExprKind::Continue => write!(f, "continue"),
            ExprKind::Return { value } => match value {
                Some(value) => write!(f, "return {}", self.child(*value)),
                None => write!(f, "return"),
            },
        }
    }
}

impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.root() {
            Some(root) => write!(f, "{}", self.display(root)),
            None => Ok(()),
        }
    }
}
