//! Evaluation contexts.
//!
//! A context is a read-only nested JSON map supplied by the caller.
//! Expression atoms and blueprint inputs address it with dotted paths
//! (`user.profile.verified`); a missing segment resolves to nothing
//! rather than an error.

use crate::ternary::TernaryState;
use serde_json::{Map, Value};

/// Caller-supplied evaluation context: a nested map of JSON values.
pub type Context = Map<String, Value>;

/// Walk a dotted path through nested objects.
///
/// Returns `None` as soon as a segment is absent or the cursor is not an
/// object that can be descended into.
pub fn path_lookup<'a>(context: &'a Context, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut cursor = context.get(first)?;

    for segment in segments {
        match cursor {
            Value::Object(map) => cursor = map.get(segment)?,
            _ => return None,
        }
    }

    Some(cursor)
}

/// Merge resolved ternary signals over a base context.
///
/// Signal states shadow same-named context keys. Used by expression
/// gates, which see both the caller's context and every signal
/// accumulated so far.
pub fn merge_states<'a, I>(base: &Context, states: I) -> Context
where
    I: IntoIterator<Item = (&'a String, &'a TernaryState)>,
{
    let mut merged = base.clone();
    for (name, state) in states {
        merged.insert(name.clone(), Value::String(state.as_str().to_string()));
    }
    merged
}

/// Project resolved signals into a standalone context.
pub fn states_to_context<'a, I>(states: I) -> Context
where
    I: IntoIterator<Item = (&'a String, &'a TernaryState)>,
{
    states
        .into_iter()
        .map(|(name, state)| (name.clone(), Value::String(state.as_str().to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn sample() -> Context {
        match json!({
            "user": {"risk": "unknown", "profile": {"verified": true}},
            "flag": false,
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_path_lookup_nested() {
        let ctx = sample();
        assert_eq!(path_lookup(&ctx, "flag"), Some(&json!(false)));
        assert_eq!(path_lookup(&ctx, "user.risk"), Some(&json!("unknown")));
        assert_eq!(
            path_lookup(&ctx, "user.profile.verified"),
            Some(&json!(true))
        );
    }

    #[test]
    fn test_path_lookup_absent() {
        let ctx = sample();
        assert_eq!(path_lookup(&ctx, "missing"), None);
        assert_eq!(path_lookup(&ctx, "user.missing"), None);
        // Descending through a scalar is absent, not an error.
        assert_eq!(path_lookup(&ctx, "flag.deeper"), None);
    }

    #[test]
    fn test_merge_states_shadows_context() {
        let ctx = sample();
        let mut states = HashMap::new();
        states.insert("flag".to_string(), TernaryState::True);
        let merged = merge_states(&ctx, &states);
        assert_eq!(merged.get("flag"), Some(&json!("true")));
        // Untouched keys survive.
        assert!(merged.contains_key("user"));
    }

    #[test]
    fn test_states_to_context() {
        let mut states = HashMap::new();
        states.insert("signal".to_string(), TernaryState::Unknown);
        let ctx = states_to_context(&states);
        assert_eq!(ctx.get("signal"), Some(&json!("unknown")));
    }
}
