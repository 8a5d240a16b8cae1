//! Three-valued logic primitives.
//!
//! This module provides the core types and operations:
//! - [`TernaryState`] - TRUE / FALSE / UNKNOWN and the coercion rules
//! - [`BalancedTrit`] - the numeric digit twin (-1, 0, +1)
//! - [`TernaryVector`] - ordered state sequences
//! - [`ops`] - the logical operators (NOT, AND, OR, XOR, votes)
//! - [`arith`] - balanced ternary addition and subtraction

mod state;
mod trit;
mod vector;

pub mod arith;
pub mod ops;

pub use state::{CoercionError, TernaryState};
pub use trit::BalancedTrit;
pub use vector::TernaryVector;
