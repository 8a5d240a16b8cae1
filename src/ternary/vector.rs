//! Ordered sequences of ternary states.
//!
//! A [`TernaryVector`] preserves element order (the codec depends on it)
//! and allows duplicates. The flattening constructor normalises any
//! nested JSON array of coercible values into a flat state sequence.

use crate::ternary::{ops, CoercionError, TernaryState};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// An ordered vector of [`TernaryState`] values.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TernaryVector(Vec<TernaryState>);

impl TernaryVector {
    /// Create an empty vector.
    pub const fn new() -> Self {
        TernaryVector(Vec::new())
    }

    /// Normalise a JSON value into a flat state vector.
    ///
    /// Arrays are flattened recursively in order; every leaf is coerced
    /// through [`TernaryState::from_value`]. A scalar yields a one-element
    /// vector.
    pub fn from_value(value: &Value) -> Result<Self, CoercionError> {
        let mut states = Vec::new();
        Self::collect(value, &mut states)?;
        Ok(TernaryVector(states))
    }

    fn collect(value: &Value, out: &mut Vec<TernaryState>) -> Result<(), CoercionError> {
        match value {
            Value::Array(items) => {
                for item in items {
                    Self::collect(item, out)?;
                }
                Ok(())
            }
            other => {
                out.push(TernaryState::from_value(other)?);
                Ok(())
            }
        }
    }

    /// The underlying states, in order.
    pub fn states(&self) -> &[TernaryState] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Signed score: True counts +1, False -1, Unknown 0.
    pub fn score(&self) -> i64 {
        ops::score(self.iter())
    }

    /// AND over the whole vector.
    pub fn all_true(&self) -> TernaryState {
        ops::and(self.iter())
    }

    /// OR over the whole vector.
    pub fn any_true(&self) -> TernaryState {
        ops::or(self.iter())
    }

    /// Unweighted majority-sign vote.
    pub fn majority(&self) -> TernaryState {
        ops::weighted(self.iter(), &[])
    }

    /// Consensus vote (alias of the uniform-weight majority).
    pub fn consensus(&self) -> TernaryState {
        ops::consensus(self.iter())
    }

    /// Encode to the balanced-ternary symbol string (`+`, `0`, `-`).
    pub fn encode(&self) -> String {
        crate::codec::encode_states(self.iter())
    }

    pub fn iter(&self) -> impl Iterator<Item = TernaryState> + '_ {
        self.0.iter().copied()
    }

    pub fn push(&mut self, state: TernaryState) {
        self.0.push(state);
    }
}

impl From<Vec<TernaryState>> for TernaryVector {
    fn from(states: Vec<TernaryState>) -> Self {
        TernaryVector(states)
    }
}

impl FromIterator<TernaryState> for TernaryVector {
    fn from_iter<I: IntoIterator<Item = TernaryState>>(iter: I) -> Self {
        TernaryVector(iter.into_iter().collect())
    }
}

impl IntoIterator for TernaryVector {
    type Item = TernaryState;
    type IntoIter = std::vec::IntoIter<TernaryState>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl std::ops::Index<usize> for TernaryVector {
    type Output = TernaryState;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl fmt::Debug for TernaryVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TernaryVector({})", self.encode())
    }
}
