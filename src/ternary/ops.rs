//! Ternary algebra operators.
//!
//! Variadic logical operations over [`TernaryState`] vectors. All
//! functions here are total and pure: any iterator of states yields a
//! state, with the empty vector resolving through the same dominance
//! rules as every other input (`and([]) == True`, `or([]) == False`,
//! `xor([]) == Unknown`).

use crate::ternary::{BalancedTrit, TernaryState};

/// Invert a state: True ↔ False, Unknown unchanged.
#[inline]
pub fn not(state: TernaryState) -> TernaryState {
    state.invert()
}

/// Ternary AND: False dominates, then Unknown, else True.
pub fn and<I>(states: I) -> TernaryState
where
    I: IntoIterator<Item = TernaryState>,
{
    let mut saw_unknown = false;
    for state in states {
        match state {
            TernaryState::False => return TernaryState::False,
            TernaryState::Unknown => saw_unknown = true,
            TernaryState::True => {}
        }
    }
    if saw_unknown {
        TernaryState::Unknown
    } else {
        TernaryState::True
    }
}

/// Ternary OR: True dominates, then Unknown, else False.
pub fn or<I>(states: I) -> TernaryState
where
    I: IntoIterator<Item = TernaryState>,
{
    let mut saw_unknown = false;
    for state in states {
        match state {
            TernaryState::True => return TernaryState::True,
            TernaryState::Unknown => saw_unknown = true,
            TernaryState::False => {}
        }
    }
    if saw_unknown {
        TernaryState::Unknown
    } else {
        TernaryState::False
    }
}

/// Ternary XOR: compares the True and False counts.
///
/// Equal counts yield Unknown, so `xor([True, False])` is Unknown rather
/// than the two-valued XOR result. This is a majority-sign vote with ties
/// reported as indeterminate, and callers rely on the tie behavior.
pub fn xor<I>(states: I) -> TernaryState
where
    I: IntoIterator<Item = TernaryState>,
{
    let mut positives = 0i64;
    let mut negatives = 0i64;
    for state in states {
        match state {
            TernaryState::True => positives += 1,
            TernaryState::False => negatives += 1,
            TernaryState::Unknown => {}
        }
    }
    if positives == negatives {
        TernaryState::Unknown
    } else if positives > negatives {
        TernaryState::True
    } else {
        TernaryState::False
    }
}

/// Weighted vote: sum of `state_i * weight_i`, sign decides the result.
///
/// An empty weight list means uniform weight 1; when the state vector is
/// longer than the weight list, missing weights default to 1 (not 0, so
/// unweighted tail positions still count).
pub fn weighted<I>(states: I, weights: &[i64]) -> TernaryState
where
    I: IntoIterator<Item = TernaryState>,
{
    let mut score = 0i64;
    for (index, state) in states.into_iter().enumerate() {
        let weight = if weights.is_empty() {
            1
        } else {
            weights.get(index).copied().unwrap_or(1)
        };
        score += state.to_trit().to_int() * weight;
    }
    TernaryState::from_trit(BalancedTrit::from_int(score))
}

/// Unweighted majority-sign vote: [`weighted`] with uniform weight 1.
pub fn consensus<I>(states: I) -> TernaryState
where
    I: IntoIterator<Item = TernaryState>,
{
    weighted(states, &[])
}

/// Signed score of a vector: True counts +1, False -1, Unknown 0.
pub fn score<I>(states: I) -> i64
where
    I: IntoIterator<Item = TernaryState>,
{
    states.into_iter().map(TernaryState::to_int).sum()
}
