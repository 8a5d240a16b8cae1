//! The three-valued logic domain.
//!
//! [`TernaryState`] is the closed TRUE / FALSE / UNKNOWN type every other
//! module operates on. States enter the system through the coercion
//! functions here and leave it as themselves; they are never mutated.

use crate::ternary::BalancedTrit;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// One of the three logic states.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TernaryState {
    /// Affirmative signal (+1).
    True,
    /// Negative signal (-1).
    False,
    /// Absent or indeterminate signal (0).
    Unknown,
}

/// Errors raised while coercing a foreign value into a [`TernaryState`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    #[error("unsupported value type for ternary conversion: {0}")]
    UnsupportedType(String),

    #[error("cannot derive ternary state from string value: {0}")]
    UnknownAlias(String),
}

impl TernaryState {
    /// All states in order: True, False, Unknown.
    pub const ALL: [TernaryState; 3] =
        [TernaryState::True, TernaryState::False, TernaryState::Unknown];

    /// Coerce a JSON value into a state.
    ///
    /// - `null` → Unknown
    /// - booleans → True / False
    /// - integers → the alias set {1 → True, 0 → False, -1 → Unknown},
    ///   then the sign rule (positive → True, negative → False)
    /// - strings → trimmed, case-folded, looked up in the alias table
    ///   (`"yes"`, `"off"`, `"pending"`, ...)
    ///
    /// Floats, arrays, and objects have no ternary meaning and fail with
    /// [`CoercionError::UnsupportedType`]; strings outside the alias table
    /// fail with [`CoercionError::UnknownAlias`].
    pub fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Null => Ok(TernaryState::Unknown),
            Value::Bool(b) => Ok((*b).into()),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(TernaryState::from_i64(i)),
                None => Err(CoercionError::UnsupportedType(format!("number {n}"))),
            },
            Value::String(s) => TernaryState::from_str_alias(s),
            Value::Array(_) => Err(CoercionError::UnsupportedType("array".into())),
            Value::Object(_) => Err(CoercionError::UnsupportedType("object".into())),
        }
    }

    /// Coerce an integer: 1 → True, 0 → False, -1 → Unknown; any other
    /// value falls back to its sign (positive → True, negative → False).
    pub const fn from_i64(value: i64) -> Self {
        match value {
            1 => TernaryState::True,
            0 => TernaryState::False,
            -1 => TernaryState::Unknown,
            v if v > 0 => TernaryState::True,
            _ => TernaryState::False,
        }
    }

    /// Coerce a string through the fixed alias table.
    ///
    /// The lookup trims whitespace and ignores case. Strings outside the
    /// table are an error rather than Unknown: an unrecognised alias is a
    /// caller bug, not an absent signal.
    pub fn from_str_alias(value: &str) -> Result<Self, CoercionError> {
        match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" | "enable" | "enabled" | "y" | "affirmative" => {
                Ok(TernaryState::True)
            }
            "false" | "0" | "no" | "off" | "disable" | "disabled" | "n" | "negative" => {
                Ok(TernaryState::False)
            }
            "unknown" | "null" | "undefined" | "pending" | "maybe" | "auto" => {
                Ok(TernaryState::Unknown)
            }
            _ => Err(CoercionError::UnknownAlias(value.to_string())),
        }
    }

    /// Map a balanced trit back to a state (+1 → True, -1 → False, 0 → Unknown).
    #[inline]
    pub const fn from_trit(trit: BalancedTrit) -> Self {
        match trit {
            BalancedTrit::Positive => TernaryState::True,
            BalancedTrit::Negative => TernaryState::False,
            BalancedTrit::Zero => TernaryState::Unknown,
        }
    }

    /// Map a state to its balanced trit (True → +1, False → -1, Unknown → 0).
    #[inline]
    pub const fn to_trit(self) -> BalancedTrit {
        match self {
            TernaryState::True => BalancedTrit::Positive,
            TernaryState::False => BalancedTrit::Negative,
            TernaryState::Unknown => BalancedTrit::Zero,
        }
    }

    /// Invert True ↔ False; Unknown stays Unknown.
    #[inline]
    pub const fn invert(self) -> Self {
        match self {
            TernaryState::True => TernaryState::False,
            TernaryState::False => TernaryState::True,
            TernaryState::Unknown => TernaryState::Unknown,
        }
    }

    /// The signed contribution of this state to a vote: +1, -1, or 0.
    #[inline]
    pub const fn to_int(self) -> i64 {
        self.to_trit().to_int()
    }

    /// Collapse to a boolean, substituting `unknown_as` for Unknown.
    #[inline]
    pub const fn to_bool(self, unknown_as: bool) -> bool {
        match self {
            TernaryState::True => true,
            TernaryState::False => false,
            TernaryState::Unknown => unknown_as,
        }
    }

    /// Collapse to an optional boolean; Unknown becomes `None`.
    #[inline]
    pub const fn to_nullable_bool(self) -> Option<bool> {
        match self {
            TernaryState::True => Some(true),
            TernaryState::False => Some(false),
            TernaryState::Unknown => None,
        }
    }

    #[inline]
    pub const fn is_true(self) -> bool {
        matches!(self, TernaryState::True)
    }

    #[inline]
    pub const fn is_false(self) -> bool {
        matches!(self, TernaryState::False)
    }

    #[inline]
    pub const fn is_unknown(self) -> bool {
        matches!(self, TernaryState::Unknown)
    }

    /// Lowercase wire name of this state.
    pub const fn as_str(self) -> &'static str {
        match self {
            TernaryState::True => "true",
            TernaryState::False => "false",
            TernaryState::Unknown => "unknown",
        }
    }

    /// Human-facing label.
    pub const fn label(self) -> &'static str {
        match self {
            TernaryState::True => "True",
            TernaryState::False => "False",
            TernaryState::Unknown => "Unknown",
        }
    }
}

impl From<bool> for TernaryState {
    fn from(value: bool) -> Self {
        if value {
            TernaryState::True
        } else {
            TernaryState::False
        }
    }
}

impl From<Option<bool>> for TernaryState {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(b) => b.into(),
            None => TernaryState::Unknown,
        }
    }
}

impl From<BalancedTrit> for TernaryState {
    fn from(trit: BalancedTrit) -> Self {
        TernaryState::from_trit(trit)
    }
}

impl From<TernaryState> for BalancedTrit {
    fn from(state: TernaryState) -> Self {
        state.to_trit()
    }
}

impl fmt::Debug for TernaryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for TernaryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
