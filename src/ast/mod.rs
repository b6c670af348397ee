//! Arena-backed expression trees.
//!
//! Nodes are addressed by stable `NodeId` indices; the tree owns its nodes
//! exclusively (strict tree, no sharing). Analyses read the tree, the
//! rewriter replaces exactly one node per invocation via `SyntaxTree::splice`.

use std::fmt;

mod display;
mod operator;
mod span;
mod tree;

pub use self::display::NodeDisplay;
pub use self::operator::{BinaryOperator, UnaryOperator};
pub use self::span::Span;
pub use self::tree::{Ancestors, NodeId, SyntaxTree};

/// Literal constants.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum Literal {
    Bool(bool),
    Integer(u64),
    Str(String),
}

impl Literal {
    pub fn boolean(value: bool) -> Self {
        Self::Bool(value)
    }

    pub fn integer(value: u64) -> Self {
        Self::Integer(value)
    }

    pub fn string<S: Into<String>>(value: S) -> Self {
        Self::Str(value.into())
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{}", value),
            Self::Integer(value) => write!(f, "{}", value),
            Self::Str(value) => write!(f, "\"{}\"", value),
        }
    }
}

/// A `name: value` initializer within a struct literal.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct StructField {
    pub name: String,
    pub value: NodeId,
}

/// A single `pattern => body` arm of a match expression.
///
/// Patterns are opaque to this crate and kept as text.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct MatchArm {
    pub pattern: String,
    pub body: NodeId,
}

/// The two surface forms of an array literal.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum ArrayExpr {
    List(Vec<NodeId>),
    Repeat { value: NodeId, length: NodeId },
}

/// Expression variants. The sum is closed on purpose: the evaluator and the
/// purity analyzer match exhaustively, so a new variant cannot silently fall
/// through to a default.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    Path(String),
    QualifiedPath(String),
    Unit,
    Paren {
        inner: NodeId,
    },
    Tuple {
        elements: Vec<NodeId>,
    },
    Array(ArrayExpr),
    Struct {
        path: String,
        fields: Vec<StructField>,
        base: Option<NodeId>,
    },
    Field {
        base: NodeId,
        name: String,
    },
    Index {
        base: NodeId,
        index: NodeId,
    },
    Call {
        callee: NodeId,
        arguments: Vec<NodeId>,
    },
    MethodCall {
        receiver: NodeId,
        method: String,
        arguments: Vec<NodeId>,
    },
    Unary {
        op: UnaryOperator,
        operand: Option<NodeId>,
    },
    Binary {
        op: BinaryOperator,
        lhs: NodeId,
        rhs: Option<NodeId>,
    },
    Range {
        start: Option<NodeId>,
        end: Option<NodeId>,
    },
    Cast {
        operand: NodeId,
        ty: String,
    },
    Block {
        tail: Option<NodeId>,
    },
    If {
        condition: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    },
    Match {
        scrutinee: NodeId,
        arms: Vec<MatchArm>,
    },
    While {
        condition: NodeId,
        body: NodeId,
    },
    Loop {
        body: NodeId,
    },
    For {
        binding: String,
        iterable: NodeId,
        body: NodeId,
    },
    Lambda {
        parameters: String,
        body: NodeId,
    },
    Macro {
        path: String,
        tokens: String,
    },
    Try {
        inner: NodeId,
    },
    Break {
        value: Option<NodeId>,
    },
    Continue,
    Return {
        value: Option<NodeId>,
    },
}

impl ExprKind {
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// Returns the ids of all direct children, in syntactic order.
    pub fn children(&self) -> Vec<NodeId> {
        let mut children = Vec::new();
        match self {
            Self::Literal(_)
            | Self::Path(_)
            | Self::QualifiedPath(_)
            | Self::Unit
            | Self::Macro { .. }
            | Self::Continue => {}
            Self::Paren { inner } | Self::Try { inner } => children.push(*inner),
            Self::Tuple { elements } => children.extend(elements),
            Self::Array(ArrayExpr::List(elements)) => children.extend(elements),
            Self::Array(ArrayExpr::Repeat { value, length }) => {
                children.push(*value);
                children.push(*length);
            }
            Self::Struct { fields, base, .. } => {
                children.extend(fields.iter().map(|field| field.value));
                children.extend(base);
            }
            Self::Field { base, .. } => children.push(*base),
            Self::Index { base, index } => {
                children.push(*base);
                children.push(*index);
            }
            Self::Call { callee, arguments } => {
                children.push(*callee);
                children.extend(arguments);
            }
            Self::MethodCall {
                receiver,
                arguments,
                ..
            } => {
                children.push(*receiver);
                children.extend(arguments);
            }
            Self::Unary { operand, .. } => children.extend(operand),
            Self::Binary { lhs, rhs, .. } => {
                children.push(*lhs);
                children.extend(rhs);
            }
            Self::Range { start, end } => {
                children.extend(start);
                children.extend(end);
            }
            Self::Cast { operand, .. } => children.push(*operand),
            Self::Block { tail } => children.extend(tail),
            Self::If {
                condition,
                then_branch,
                else_branch,
            } => {
                children.push(*condition);
                children.push(*then_branch);
                children.extend(else_branch);
            }
            Self::Match { scrutinee, arms } => {
                children.push(*scrutinee);
                children.extend(arms.iter().map(|arm| arm.body));
            }
            Self::While { condition, body } => {
                children.push(*condition);
                children.push(*body);
            }
            Self::Loop { body } => children.push(*body),
            Self::For { iterable, body, .. } => {
                children.push(*iterable);
                children.push(*body);
            }
            Self::Lambda { body, .. } => children.push(*body),
            Self::Break { value } | Self::Return { value } => children.extend(value),
        }
        children
    }

    /// Returns mutable references to all direct child id slots.
    pub(crate) fn child_slots_mut(&mut self) -> Vec<&mut NodeId> {
        let mut slots = Vec::new();
        match self {
            Self::Literal(_)
            | Self::Path(_)
            | Self::QualifiedPath(_)
            | Self::Unit
            | Self::Macro { .. }
            | Self::Continue => {}
            Self::Paren { inner } | Self::Try { inner } => slots.push(inner),
            Self::Tuple { elements } => slots.extend(elements),
            Self::Array(ArrayExpr::List(elements)) => slots.extend(elements),
            Self::Array(ArrayExpr::Repeat { value, length }) => {
                slots.push(value);
                slots.push(length);
            }
            Self::Struct { fields, base, .. } => {
                slots.extend(fields.iter_mut().map(|field| &mut field.value));
                slots.extend(base);
            }
            Self::Field { base, .. } => slots.push(base),
            Self::Index { base, index } => {
                slots.push(base);
                slots.push(index);
            }
            Self::Call { callee, arguments } => {
                slots.push(callee);
                slots.extend(arguments);
            }
            Self::MethodCall {
                receiver,
                arguments,
                ..
            } => {
                slots.push(receiver);
                slots.extend(arguments);
            }
            Self::Unary { operand, .. } => slots.extend(operand),
            Self::Binary { lhs, rhs, .. } => {
                slots.push(lhs);
                slots.extend(rhs);
            }
            Self::Range { start, end } => {
                slots.extend(start);
                slots.extend(end);
            }
            Self::Cast { operand, .. } => slots.push(operand),
            Self::Block { tail } => slots.extend(tail),
            Self::If {
                condition,
                then_branch,
                else_branch,
            } => {
                slots.push(condition);
                slots.push(then_branch);
                slots.extend(else_branch);
            }
            Self::Match { scrutinee, arms } => {
                slots.push(scrutinee);
                slots.extend(arms.iter_mut().map(|arm| &mut arm.body));
            }
            Self::While { condition, body } => {
                slots.push(condition);
                slots.push(body);
            }
            Self::Loop { body } => slots.push(body),
            Self::For { iterable, body, .. } => {
                slots.push(iterable);
                slots.push(body);
            }
            Self::Lambda { body, .. } => slots.push(body),
            Self::Break { value } | Self::Return { value } => slots.extend(value),
        }
        slots
    }
}

/// A single expression node: its variant, source span and parent link.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Node {
    kind: ExprKind,
    span: Span,
    parent: Option<NodeId>,
}

impl Node {
    pub(crate) fn new(kind: ExprKind, span: Span) -> Self {
        Self {
            kind,
            span,
            parent: None,
        }
    }

    pub fn kind(&self) -> &ExprKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut ExprKind {
        &mut self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }
}
