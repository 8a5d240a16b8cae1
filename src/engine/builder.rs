//! Fluent blueprint construction.
//!
//! A thin builder over [`Blueprint`] for callers assembling decisions in
//! code rather than loading them from JSON:
//!
//! ```
//! use trilean::engine::{Blueprint, DecisionEngine};
//! use trilean::Context;
//!
//! let blueprint = Blueprint::builder("compliance")
//!     .input("verified", true)
//!     .input("consent", trilean::engine::InputSource::FromContext("user.consent".into()))
//!     .and_gate("compliance", ["verified", "consent"])
//!     .output("compliance")
//!     .build();
//!
//! let report = DecisionEngine::new()
//!     .evaluate(&blueprint, &Context::new())
//!     .unwrap();
//! // `consent` is a context path with no context behind it, so the
//! // AND of True and Unknown is Unknown.
//! assert_eq!(report.result, trilean::TernaryState::Unknown);
//! ```

use crate::engine::blueprint::{Blueprint, Gate, GateOp, InputSource, Operand};

/// Builder for [`Blueprint`].
#[derive(Debug, Default)]
pub struct BlueprintBuilder {
    blueprint: Blueprint,
}

impl BlueprintBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        BlueprintBuilder { blueprint: Blueprint::new(name) }
    }

    /// Rename the blueprint.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.blueprint.name = name.into();
        self
    }

    /// Declare an input.
    pub fn input(mut self, name: impl Into<String>, source: impl Into<InputSource>) -> Self {
        self.blueprint.inputs.insert(name.into(), source.into());
        self
    }

    /// Append a fully-formed gate.
    pub fn gate(mut self, gate: Gate) -> Self {
        self.blueprint.gates.push(gate);
        self
    }

    /// Append an AND gate over the given operands.
    pub fn and_gate<I>(self, name: impl Into<String>, operands: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        self.gate(Gate::new(name, GateOp::And).with_operands(operands))
    }

    /// Append an OR gate over the given operands.
    pub fn or_gate<I>(self, name: impl Into<String>, operands: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        self.gate(Gate::new(name, GateOp::Or).with_operands(operands))
    }

    /// Append a NOT gate over a single operand.
    pub fn not_gate(self, name: impl Into<String>, operand: impl Into<Operand>) -> Self {
        self.gate(Gate::new(name, GateOp::Not).with_operands([operand.into()]))
    }

    /// Append a consensus gate over the given operands.
    pub fn consensus_gate<I>(self, name: impl Into<String>, operands: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        self.gate(Gate::new(name, GateOp::Consensus).with_operands(operands))
    }

    /// Append a weighted gate.
    pub fn weighted_gate<I>(self, name: impl Into<String>, operands: I, weights: Vec<i64>) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        self.gate(
            Gate::new(name, GateOp::Weighted)
                .with_operands(operands)
                .with_weights(weights),
        )
    }

    /// Append an expression gate.
    pub fn expression_gate(self, name: impl Into<String>, expression: impl Into<String>) -> Self {
        self.gate(Gate::new(name, GateOp::Expression).with_expression(expression))
    }

    /// Declare the output key.
    pub fn output(mut self, name: impl Into<String>) -> Self {
        self.blueprint.output = Some(name.into());
        self
    }

    /// Shortcut: one AND gate over every declared input, selected as the
    /// output.
    pub fn require_all(self) -> Self {
        let names: Vec<String> = self.blueprint.inputs.keys().cloned().collect();
        self.and_gate("all_required", names).output("all_required")
    }

    /// Shortcut: one OR gate over every declared input, selected as the
    /// output.
    pub fn require_any(self) -> Self {
        let names: Vec<String> = self.blueprint.inputs.keys().cloned().collect();
        self.or_gate("any_required", names).output("any_required")
    }

    pub fn build(self) -> Blueprint {
        self.blueprint
    }
}
