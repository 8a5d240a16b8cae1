//! # Trilean
//!
//! A three-valued logic toolkit. Every observed signal resolves to TRUE,
//! FALSE, or UNKNOWN; composite decisions combine such signals with
//! logical operators, weighted votes, a small expression language, and
//! declarative decision blueprints.
//!
//! The crate is organised leaves-first:
//! - [`ternary`] - the algebra: [`TernaryState`], [`BalancedTrit`],
//!   coercion, operators, balanced ternary arithmetic
//! - [`codec`] - integer and state-vector encoding to balanced ternary
//!   strings
//! - [`expr`] - the expression DSL (tokenizer, precedence parser, stack
//!   evaluator)
//! - [`engine`] - the blueprint evaluator with evidence, memoization,
//!   and observers
//!
//! ```
//! use trilean::ternary::ops;
//! use trilean::TernaryState::{False, True, Unknown};
//!
//! assert_eq!(ops::and([True, Unknown]), Unknown);
//! assert_eq!(ops::weighted([True, False, Unknown], &[1, 2, 1]), False);
//! assert_eq!(trilean::codec::encode_states([True, Unknown, False]), "+0-");
//! ```

pub mod codec;
pub mod context;
pub mod engine;
pub mod expr;
pub mod ternary;

// Re-export commonly used types
pub use context::Context;
pub use engine::{Blueprint, DecisionEngine, DecisionReport, MemoCache};
pub use expr::ExpressionEvaluator;
pub use ternary::{BalancedTrit, CoercionError, TernaryState, TernaryVector};
