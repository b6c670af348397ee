use std::fmt;

/// Binary operators as they appear in the surface syntax.
///
/// Only `&&`, `||` and `^` participate in boolean folding; the remaining
/// operators may be overloaded and are carried opaquely.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum BinaryOperator {
    LogicAnd,
    LogicOr,
    Xor,
    BitAnd,
    BitOr,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOperator {
    /// Whether this operator short-circuits (`&&` or `||`).
    pub fn is_lazy(self) -> bool {
        matches!(self, Self::LogicAnd | Self::LogicOr)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::LogicAnd => write!(f, "&&"),
            Self::LogicOr => write!(f, "||"),
            Self::Xor => write!(f, "^"),
            Self::BitAnd => write!(f, "&"),
            Self::BitOr => write!(f, "|"),
            Self::Eq => write!(f, "=="),
            Self::NotEq => write!(f, "!="),
            Self::Lt => write!(f, "<"),
            Self::LtEq => write!(f, "<="),
            Self::Gt => write!(f, ">"),
            Self::GtEq => write!(f, ">="),
            Self::Shl => write!(f, "<<"),
            Self::Shr => write!(f, ">>"),
            Self::Add => write!(f, "+"),
            Self::Sub => write!(f, "-"),
            Self::Mul => write!(f, "*"),
            Self::Div => write!(f, "/"),
            Self::Rem => write!(f, "%"),
        }
    }
}

/// Prefix operators.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum UnaryOperator {
    Ref,
    RefMut,
    Deref,
    Neg,
    Not,
    Box,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Ref => write!(f, "&"),
            Self::RefMut => write!(f, "&mut "),
            Self::Deref => write!(f, "*"),
            Self::Neg => write!(f, "-"),
            Self::Not => write!(f, "!"),
            Self::Box => write!(f, "box "),
        }
    }
}
