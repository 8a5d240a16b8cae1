//! Balanced ternary arithmetic.
//!
//! Digit-wise addition and subtraction over the codec's trit vectors,
//! with ripple-carry propagation, plus the noise-normalization helper
//! used to rescue vectors dominated by Unknown readings.

use crate::codec::{from_trits, to_trits};
use crate::ternary::{BalancedTrit, CoercionError, TernaryState};
use serde_json::Value;

/// Add a single digit column: two trits plus carry-in.
///
/// A column sum outside [-1, 1] wraps: +2 becomes digit -1 carry +1,
/// -2 becomes digit +1 carry -1 (and ±3 becomes digit 0 carry ±1).
#[inline]
fn add_trits(a: BalancedTrit, b: BalancedTrit, carry: BalancedTrit) -> (BalancedTrit, BalancedTrit) {
    let sum = a.to_int() + b.to_int() + carry.to_int();

    if sum > 1 {
        (BalancedTrit::from_int(sum - 3), BalancedTrit::Positive)
    } else if sum < -1 {
        (BalancedTrit::from_int(sum + 3), BalancedTrit::Negative)
    } else {
        (BalancedTrit::from_int(sum), BalancedTrit::Zero)
    }
}

/// Add two integers in balanced ternary.
///
/// Both operands are expanded to their digit vectors, the shorter padded
/// with Zero digits, then added column by column from the least
/// significant end with carry propagation. A non-zero final carry is
/// appended as a new most-significant digit.
pub fn add(a: i64, b: i64) -> i64 {
    let mut a_trits = to_trits(a);
    let mut b_trits = to_trits(b);

    let width = a_trits.len().max(b_trits.len());
    a_trits.resize(width, BalancedTrit::Zero);
    b_trits.resize(width, BalancedTrit::Zero);

    let mut result = Vec::with_capacity(width + 1);
    let mut carry = BalancedTrit::Zero;

    for i in 0..width {
        let (digit, carry_out) = add_trits(a_trits[i], b_trits[i], carry);
        result.push(digit);
        carry = carry_out;
    }

    if !carry.is_zero() {
        result.push(carry);
    }

    from_trits(&result)
}

/// Subtract in balanced ternary: addition of the negation.
#[inline]
pub fn subtract(a: i64, b: i64) -> i64 {
    add(a, -b)
}

/// Normalise a noisy vector of coercible values.
///
/// If the fraction of Unknown states strictly exceeds `threshold`, every
/// element is replaced with the most frequent non-Unknown state (ties go
/// to the state seen first; a vector with no non-Unknown states stays
/// all-Unknown). Otherwise the coerced states are returned unchanged.
pub fn normalize_noise(
    values: &[Value],
    threshold: f64,
) -> Result<Vec<TernaryState>, CoercionError> {
    if values.is_empty() {
        return Ok(Vec::new());
    }

    let states = values
        .iter()
        .map(TernaryState::from_value)
        .collect::<Result<Vec<_>, _>>()?;

    let unknowns = states.iter().filter(|s| s.is_unknown()).count();
    if (unknowns as f64) / (states.len() as f64) <= threshold {
        return Ok(states);
    }

    let trues = states.iter().filter(|s| s.is_true()).count();
    let falses = states.iter().filter(|s| s.is_false()).count();

    let dominant = if trues == 0 && falses == 0 {
        TernaryState::Unknown
    } else if trues == falses {
        // Tie: the first signal seen wins.
        states
            .iter()
            .copied()
            .find(|s| !s.is_unknown())
            .unwrap_or(TernaryState::Unknown)
    } else if trues > falses {
        TernaryState::True
    } else {
        TernaryState::False
    };

    Ok(vec![dominant; states.len()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use TernaryState::{False, True, Unknown};

    #[test]
    fn test_add_basic() {
        assert_eq!(add(100, 50), 150);
        assert_eq!(add(0, 0), 0);
        assert_eq!(add(1, 1), 2);
    }

    #[test]
    fn test_add_signs() {
        assert_eq!(add(100, -150), -50);
        assert_eq!(add(-100, -50), -150);
        assert_eq!(add(-7, 7), 0);
    }

    #[test]
    fn test_add_agrees_with_native() {
        for a in [-9841i64, -364, -42, -1, 0, 1, 13, 42, 364, 9841] {
            for b in [-1000i64, -27, -2, 0, 2, 27, 1000] {
                assert_eq!(add(a, b), a + b, "add({a}, {b})");
            }
        }
    }

    #[test]
    fn test_add_carry_chain() {
        // 1 + 1 produces a +2 column: digit -1, carry +1.
        assert_eq!(add(1, 1), 2);
        // 121 is all-positive digits (+++++), so adding one ripples the
        // carry through every column.
        assert_eq!(add(121, 1), 122);
    }

    #[test]
    fn test_subtract() {
        assert_eq!(subtract(100, 30), 70);
        assert_eq!(subtract(30, 100), -70);
        assert_eq!(subtract(-5, -5), 0);
    }

    #[test]
    fn test_additive_inverse() {
        for v in [-9841i64, -100, -1, 0, 1, 100, 9841] {
            assert_eq!(add(v, -v), 0);
        }
    }

    #[test]
    fn test_normalize_noise_below_threshold_unchanged() {
        let values = vec![json!(true), json!(false), json!(null)];
        // 1/3 unknown, threshold 0.5: untouched.
        let states = normalize_noise(&values, 0.5).unwrap();
        assert_eq!(states, vec![True, False, Unknown]);
    }

    #[test]
    fn test_normalize_noise_at_threshold_unchanged() {
        // Exactly at the threshold does not trigger replacement.
        let values = vec![json!(true), json!(null)];
        let states = normalize_noise(&values, 0.5).unwrap();
        assert_eq!(states, vec![True, Unknown]);
    }

    #[test]
    fn test_normalize_noise_replaces_with_dominant() {
        let values = vec![json!(null), json!(null), json!(true), json!(null)];
        let states = normalize_noise(&values, 0.5).unwrap();
        assert_eq!(states, vec![True; 4]);

        let values = vec![json!(null), json!(false), json!(null)];
        let states = normalize_noise(&values, 0.5).unwrap();
        assert_eq!(states, vec![False; 3]);
    }

    #[test]
    fn test_normalize_noise_all_unknown_stays_unknown() {
        let values = vec![json!(null), json!(null)];
        let states = normalize_noise(&values, 0.25).unwrap();
        assert_eq!(states, vec![Unknown, Unknown]);
    }

    #[test]
    fn test_normalize_noise_empty() {
        assert_eq!(normalize_noise(&[], 0.5).unwrap(), Vec::new());
    }
}
