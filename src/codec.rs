//! Balanced ternary codec.
//!
//! Converts integers to and from their balanced-ternary string form
//! (digits `+`, `0`, `-`, most significant first) and state vectors to
//! and from the same symbol alphabet. The integer algorithm requires
//! truncating division (quotient toward zero, remainder signed like the
//! dividend), which is what Rust's `/` and `%` provide; a floor-style
//! modulo would break the round-trip for negative values.

use crate::ternary::{BalancedTrit, TernaryState};
use thiserror::Error;

/// Errors raised while decoding balanced-ternary strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("unrecognised balanced trit symbol: {0:?}")]
    InvalidSymbol(String),
}

/// Convert an integer to balanced-ternary digits, least significant first.
///
/// Zero yields a single Zero digit. Shared with the arithmetic module,
/// which adds digit vectors directly.
pub fn to_trits(value: i64) -> Vec<BalancedTrit> {
    if value == 0 {
        return vec![BalancedTrit::Zero];
    }

    let mut trits = Vec::new();
    let mut value = value;

    while value != 0 {
        let mut remainder = value % 3;
        value /= 3;

        // Digits must stay in {-1, 0, +1}: fold 2 into -1 with a carry,
        // and -2 into +1 with a borrow.
        if remainder == 2 {
            remainder = -1;
            value += 1;
        } else if remainder == -2 {
            remainder = 1;
            value -= 1;
        }

        trits.push(BalancedTrit::from_int(remainder));
    }

    trits
}

/// Sum a least-significant-first digit vector back into an integer.
pub fn from_trits(trits: &[BalancedTrit]) -> i64 {
    // Horner form from the most significant end: intermediate sums never
    // exceed the final value, so wide digit vectors cannot overflow a
    // separate power accumulator.
    trits
        .iter()
        .rev()
        .fold(0i64, |sum, trit| sum * 3 + trit.to_int())
}

/// Convert an integer to its balanced-ternary string, most significant
/// digit first. Zero maps to `"0"`.
pub fn to_balanced(value: i64) -> String {
    to_trits(value).iter().rev().map(|t| t.symbol()).collect()
}

/// Parse a balanced-ternary string back to an integer.
///
/// Symbol aliases are accepted case-insensitively per character position:
/// `+ 1 t p` (and the words `true`, `pos`, `positive`) for +1, `0 . z u`
/// for 0, `- f n` (ASCII or Unicode minus) for -1. Empty or whitespace
/// input decodes to 0.
pub fn from_balanced(encoded: &str) -> Result<i64, CodecError> {
    let trimmed = encoded.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }

    let mut sum = 0i64;
    for symbol in trimmed.chars() {
        sum = sum * 3 + trit_from_symbol(symbol)?.to_int();
    }
    Ok(sum)
}

/// Parse a single trit symbol, accepting the full alias alphabet.
pub fn trit_from_symbol(symbol: char) -> Result<BalancedTrit, CodecError> {
    trit_from_alias(&symbol.to_string())
}

/// Parse a trit from a symbol or word alias, case-insensitively.
pub fn trit_from_alias(alias: &str) -> Result<BalancedTrit, CodecError> {
    let trimmed = alias.trim();
    if trimmed.is_empty() {
        return Err(CodecError::InvalidSymbol(alias.to_string()));
    }

    match trimmed.to_uppercase().as_str() {
        "+" | "1" | "T" | "TRUE" | "P" | "POS" | "POSITIVE" => Ok(BalancedTrit::Positive),
        "0" | "." | "Z" | "U" | "UNK" | "UNKNOWN" => Ok(BalancedTrit::Zero),
        "-" | "\u{2212}" | "F" | "FALSE" | "N" | "NEG" | "NEGATIVE" => Ok(BalancedTrit::Negative),
        _ => Err(CodecError::InvalidSymbol(alias.to_string())),
    }
}

/// Encode a state sequence as its trit symbols, in order.
pub fn encode_states<I>(states: I) -> String
where
    I: IntoIterator<Item = TernaryState>,
{
    states
        .into_iter()
        .map(|state| state.to_trit().symbol())
        .collect()
}

/// Decode a symbol string back to states, preserving order.
pub fn decode_states(encoded: &str) -> Result<Vec<TernaryState>, CodecError> {
    encoded
        .chars()
        .map(|symbol| trit_from_symbol(symbol).map(TernaryState::from_trit))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use TernaryState::{False, True, Unknown};

    #[test]
    fn test_zero_is_single_digit() {
        assert_eq!(to_balanced(0), "0");
        assert_eq!(from_balanced("0").unwrap(), 0);
    }

    #[test]
    fn test_known_encodings() {
        assert_eq!(to_balanced(1), "+");
        assert_eq!(to_balanced(-1), "-");
        assert_eq!(to_balanced(2), "+-"); // 3 - 1
        assert_eq!(to_balanced(4), "++"); // 3 + 1
        assert_eq!(to_balanced(-4), "--");
        assert_eq!(to_balanced(5), "+--"); // 9 - 3 - 1
    }

    #[test]
    fn test_roundtrip_range() {
        for n in -10_000i64..=10_000 {
            assert_eq!(from_balanced(&to_balanced(n)).unwrap(), n, "n = {n}");
        }
    }

    #[test]
    fn test_symbol_aliases() {
        assert_eq!(from_balanced("+-").unwrap(), 2);
        assert_eq!(from_balanced("1t").unwrap(), 4); // alias digits for ++
        assert_eq!(from_balanced("P.N").unwrap(), 8); // 9 + 0 - 1
        assert_eq!(from_balanced("\u{2212}").unwrap(), -1); // unicode minus
    }

    #[test]
    fn test_invalid_symbol_fails() {
        assert!(matches!(
            from_balanced("+x-"),
            Err(CodecError::InvalidSymbol(_))
        ));
        assert!(decode_states("+?").is_err());
    }

    #[test]
    fn test_empty_decodes_to_zero() {
        assert_eq!(from_balanced("").unwrap(), 0);
        assert_eq!(from_balanced("   ").unwrap(), 0);
    }

    #[test]
    fn test_state_vector_roundtrip() {
        let states = vec![True, Unknown, False];
        assert_eq!(encode_states(states.iter().copied()), "+0-");
        assert_eq!(decode_states("+0-").unwrap(), states);

        let longer = vec![True, True, False, Unknown, False, True];
        assert_eq!(decode_states(&encode_states(longer.iter().copied())).unwrap(), longer);
        assert_eq!(decode_states("").unwrap(), Vec::new());
    }

    #[test]
    fn test_trits_lsb_first() {
        // 5 = -1 - 3 + 9, so LSB-first digits are N, N, P.
        assert_eq!(
            to_trits(5),
            vec![BalancedTrit::Negative, BalancedTrit::Negative, BalancedTrit::Positive]
        );
        assert_eq!(from_trits(&to_trits(5)), 5);
    }

    proptest! {
        #[test]
        fn prop_integer_roundtrip(n in -1_000_000_000i64..=1_000_000_000) {
            prop_assert_eq!(from_balanced(&to_balanced(n)).unwrap(), n);
        }

        #[test]
        fn prop_trit_vector_roundtrip(n in i64::MIN / 4..=i64::MAX / 4) {
            prop_assert_eq!(from_trits(&to_trits(n)), n);
        }
    }
}
