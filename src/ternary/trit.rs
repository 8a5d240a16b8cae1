//! Single balanced ternary digit (trit).
//!
//! A trit can hold one of three values: -1, 0, or +1. It is the numeric
//! twin of [`TernaryState`](crate::TernaryState): TRUE maps to +1, FALSE
//! to -1, and UNKNOWN to 0, which is what lets weighted votes and the
//! balanced ternary codec share one digit type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single balanced ternary digit.
///
/// The discriminants are the digit values themselves, so conversion to an
/// integer is a cast.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i8)]
pub enum BalancedTrit {
    /// Negative (-1)
    Negative = -1,
    /// Zero (0)
    Zero = 0,
    /// Positive (+1)
    Positive = 1,
}

impl BalancedTrit {
    /// All possible trit values in order: Negative, Zero, Positive.
    pub const ALL: [BalancedTrit; 3] = [
        BalancedTrit::Negative,
        BalancedTrit::Zero,
        BalancedTrit::Positive,
    ];

    /// Create a trit from the sign of an integer.
    ///
    /// Any positive value maps to `Positive`, any negative value to
    /// `Negative`, zero to `Zero`.
    #[inline]
    pub const fn from_int(value: i64) -> Self {
        if value > 0 {
            BalancedTrit::Positive
        } else if value < 0 {
            BalancedTrit::Negative
        } else {
            BalancedTrit::Zero
        }
    }

    /// Convert to the digit value.
    #[inline]
    pub const fn to_int(self) -> i64 {
        self as i8 as i64
    }

    /// Invert the trit (flip Negative ↔ Positive, Zero stays Zero).
    #[inline]
    pub const fn invert(self) -> Self {
        match self {
            BalancedTrit::Negative => BalancedTrit::Positive,
            BalancedTrit::Zero => BalancedTrit::Zero,
            BalancedTrit::Positive => BalancedTrit::Negative,
        }
    }

    /// The canonical symbol for this digit: `+`, `0`, or `-`.
    #[inline]
    pub const fn symbol(self) -> char {
        match self {
            BalancedTrit::Negative => '-',
            BalancedTrit::Zero => '0',
            BalancedTrit::Positive => '+',
        }
    }

    /// Returns true if this trit is zero.
    #[inline]
    pub const fn is_zero(self) -> bool {
        matches!(self, BalancedTrit::Zero)
    }

    /// Returns true if this trit is positive.
    #[inline]
    pub const fn is_positive(self) -> bool {
        matches!(self, BalancedTrit::Positive)
    }

    /// Returns true if this trit is negative.
    #[inline]
    pub const fn is_negative(self) -> bool {
        matches!(self, BalancedTrit::Negative)
    }
}

impl Default for BalancedTrit {
    fn default() -> Self {
        BalancedTrit::Zero
    }
}

impl fmt::Debug for BalancedTrit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalancedTrit::Negative => write!(f, "N"),
            BalancedTrit::Zero => write!(f, "O"),
            BalancedTrit::Positive => write!(f, "P"),
        }
    }
}

impl fmt::Display for BalancedTrit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl std::ops::Neg for BalancedTrit {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.invert()
    }
}

impl From<BalancedTrit> for i64 {
    fn from(trit: BalancedTrit) -> Self {
        trit.to_int()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inversion_involution() {
        for t in BalancedTrit::ALL {
            assert_eq!(t.invert().invert(), t);
        }
    }

    #[test]
    fn test_from_int_sign_rule() {
        assert_eq!(BalancedTrit::from_int(1), BalancedTrit::Positive);
        assert_eq!(BalancedTrit::from_int(42), BalancedTrit::Positive);
        assert_eq!(BalancedTrit::from_int(0), BalancedTrit::Zero);
        assert_eq!(BalancedTrit::from_int(-1), BalancedTrit::Negative);
        assert_eq!(BalancedTrit::from_int(-42), BalancedTrit::Negative);
    }

    #[test]
    fn test_int_roundtrip() {
        for t in BalancedTrit::ALL {
            assert_eq!(BalancedTrit::from_int(t.to_int()), t);
        }
    }

    #[test]
    fn test_symbols() {
        assert_eq!(BalancedTrit::Positive.symbol(), '+');
        assert_eq!(BalancedTrit::Zero.symbol(), '0');
        assert_eq!(BalancedTrit::Negative.symbol(), '-');
    }

    #[test]
    fn test_neg_operator() {
        assert_eq!(-BalancedTrit::Positive, BalancedTrit::Negative);
        assert_eq!(-BalancedTrit::Zero, BalancedTrit::Zero);
    }
}
