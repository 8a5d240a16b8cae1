//! The logic expression DSL.
//!
//! A small infix language over ternary signals: `NOT`/`!`, `AND`/`&`,
//! `OR`/`|`, `XOR`/`^`, the binary votes `MAJ` and `CONSENSUS`, the
//! ternary `IF(cond, then, else)`, parentheses, literal atoms and dotted
//! context paths. See [`ExpressionEvaluator`] for the grammar and
//! evaluation rules.

mod eval;
mod token;

pub use eval::{resolve_atom, ExprError, ExpressionEvaluator, OpHandler};
pub use token::{tokenize, CustomSpec, OpToken, Token};
