//! Evaluation records.
//!
//! Every gate produces a [`Decision`] carrying its resolved state and the
//! per-operand evidence that led to it; a full evaluation produces a
//! [`DecisionReport`]. Both are immutable once built and safe to share
//! across threads.

use crate::engine::blueprint::GateOp;
use crate::ternary::TernaryState;
use serde::{Deserialize, Serialize};

/// One (operand, resolved state) provenance pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    /// Label of the operand as written in the blueprint.
    pub operand: String,
    pub state: TernaryState,
}

/// The outcome of a single gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub name: String,
    pub state: TernaryState,
    pub operator: GateOp,
    /// Operand provenance, in operand order.
    pub evidence: Vec<Evidence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Evaluation timing and shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Wall-clock evaluation time, milliseconds, rounded to 3 decimals.
    pub duration_ms: f64,
    pub total_gates: usize,
    /// The blueprint's name.
    pub blueprint: String,
}

/// The outcome of one blueprint evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionReport {
    pub result: TernaryState,
    /// Per-gate decisions, in gate declaration order.
    pub decisions: Vec<Decision>,
    /// Balanced-ternary encoding of the decision states, in order.
    pub encoded_vector: String,
    pub metadata: ReportMetadata,
}

impl DecisionReport {
    /// Collapse the result to a boolean, substituting `unknown_as` for
    /// Unknown.
    pub fn to_bool(&self, unknown_as: bool) -> bool {
        self.result.to_bool(unknown_as)
    }

    /// Find a decision by gate name.
    pub fn decision(&self, name: &str) -> Option<&Decision> {
        self.decisions.iter().find(|d| d.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> DecisionReport {
        DecisionReport {
            result: TernaryState::True,
            decisions: vec![Decision {
                name: "gate".into(),
                state: TernaryState::True,
                operator: GateOp::And,
                evidence: vec![Evidence { operand: "a".into(), state: TernaryState::True }],
                description: None,
            }],
            encoded_vector: "+".into(),
            metadata: ReportMetadata {
                duration_ms: 0.042,
                total_gates: 1,
                blueprint: "sample".into(),
            },
        }
    }

    #[test]
    fn test_to_bool() {
        let mut report = sample_report();
        assert!(report.to_bool(false));
        report.result = TernaryState::Unknown;
        assert!(!report.to_bool(false));
        assert!(report.to_bool(true));
    }

    #[test]
    fn test_decision_lookup() {
        let report = sample_report();
        assert!(report.decision("gate").is_some());
        assert!(report.decision("missing").is_none());
    }

    #[test]
    fn test_report_serializes() {
        let encoded = serde_json::to_value(sample_report()).unwrap();
        assert_eq!(encoded["result"], "true");
        assert_eq!(encoded["decisions"][0]["operator"], "and");
        assert_eq!(encoded["encoded_vector"], "+");
    }
}
