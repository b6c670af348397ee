//! Read-only analyses over expression trees.

mod eval;
mod purity;

pub use self::eval::{evaluate, BoolValue};
pub use self::purity::{may_discard, purity, Purity};
