//! Declarative decision evaluation.
//!
//! This module provides the blueprint model and its evaluator:
//! - [`Blueprint`] / [`BlueprintBuilder`] - named inputs, ordered gates,
//!   output key
//! - [`DecisionEngine`] - resolves a blueprint against a context into a
//!   [`DecisionReport`] with per-gate evidence
//! - [`MemoCache`] - optional injectable memoization with TTL expiry

mod blueprint;
mod builder;
mod cache;
mod decision;
mod evaluate;

pub use blueprint::{
    Blueprint, Gate, GateOp, InputResolver, InputSource, Operand, OperandResolver, ResolvedInputs,
};
pub use builder::BlueprintBuilder;
pub use cache::MemoCache;
pub use decision::{Decision, DecisionReport, Evidence, ReportMetadata};
pub use evaluate::{DecisionEngine, DecisionObserver, EngineError};
