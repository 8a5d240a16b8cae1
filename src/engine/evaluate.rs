//! The decision engine.
//!
//! Evaluation is a three-phase pass over a blueprint: resolve the named
//! inputs against the caller's context, run the gates in declaration
//! order over the accumulated signals, then select the output key. Each
//! gate appends a [`Decision`] and registers its state under the gate's
//! name, so later gates can reference earlier ones.
//!
//! A failure anywhere aborts the whole evaluation: nothing is cached and
//! no observer fires.

use crate::codec;
use crate::context::{merge_states, path_lookup, states_to_context, Context};
use crate::engine::blueprint::{Blueprint, Gate, GateOp, InputSource, Operand, ResolvedInputs};
use crate::engine::cache::MemoCache;
use crate::engine::decision::{Decision, DecisionReport, Evidence, ReportMetadata};
use crate::expr::{ExprError, ExpressionEvaluator};
use crate::ternary::{ops, CoercionError, TernaryState};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors raised during blueprint evaluation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A gate operand referenced a name that is neither an input nor an
    /// earlier gate.
    #[error("undefined operand: {0}")]
    UndefinedOperand(String),

    /// An expression input, operand, or gate was used on an engine built
    /// without an expression evaluator.
    #[error("expression evaluator not configured")]
    EvaluatorNotConfigured,

    #[error(transparent)]
    Expression(#[from] ExprError),

    #[error(transparent)]
    Coercion(#[from] CoercionError),
}

/// Callback notified after every fresh (non-cache-hit) evaluation.
pub trait DecisionObserver: Send + Sync {
    fn on_evaluated(&self, report: &DecisionReport, context: &Context, blueprint: &Blueprint);
}

impl<F> DecisionObserver for F
where
    F: Fn(&DecisionReport, &Context, &Blueprint) + Send + Sync,
{
    fn on_evaluated(&self, report: &DecisionReport, context: &Context, blueprint: &Blueprint) {
        self(report, context, blueprint)
    }
}

/// Evaluates blueprints into decision reports.
///
/// The engine itself is stateless between calls; the optional memo cache
/// is the only shared mutable resource, and it is injected rather than
/// global.
#[derive(Default)]
pub struct DecisionEngine {
    evaluator: Option<ExpressionEvaluator>,
    cache: Option<Arc<MemoCache>>,
    observers: Vec<Arc<dyn DecisionObserver>>,
}

impl DecisionEngine {
    /// Engine without expression support, caching, or observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an expression evaluator, enabling `@expr` inputs and
    /// operands and `expression` gates.
    pub fn with_evaluator(mut self, evaluator: ExpressionEvaluator) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    /// Attach a memoization cache.
    pub fn with_cache(mut self, cache: Arc<MemoCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Register an observer for fresh evaluations.
    pub fn with_observer(mut self, observer: Arc<dyn DecisionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Evaluate a blueprint against a context, consulting the memo cache
    /// when one is attached.
    pub fn evaluate(
        &self,
        blueprint: &Blueprint,
        context: &Context,
    ) -> Result<DecisionReport, EngineError> {
        let cache_key = self.cache.as_ref().map(|_| stable_key(blueprint, context));
        if let (Some(cache), Some(key)) = (&self.cache, cache_key) {
            if let Some(report) = cache.get(key) {
                debug!(blueprint = %blueprint.name, key, "decision cache hit");
                return Ok(report);
            }
        }

        let report = self.evaluate_fresh(blueprint, context)?;

        if let (Some(cache), Some(key)) = (&self.cache, cache_key) {
            cache.put(key, report.clone());
        }

        Ok(report)
    }

    /// Evaluate without touching the memo cache, even when one is
    /// attached. Observers still fire.
    pub fn evaluate_uncached(
        &self,
        blueprint: &Blueprint,
        context: &Context,
    ) -> Result<DecisionReport, EngineError> {
        self.evaluate_fresh(blueprint, context)
    }

    fn evaluate_fresh(
        &self,
        blueprint: &Blueprint,
        context: &Context,
    ) -> Result<DecisionReport, EngineError> {
        let started = Instant::now();
        debug!(
            blueprint = %blueprint.name,
            inputs = blueprint.inputs.len(),
            gates = blueprint.gates.len(),
            "evaluating blueprint"
        );

        let mut inputs = self.resolve_inputs(blueprint, context)?;
        let mut decisions: Vec<Decision> = Vec::with_capacity(blueprint.gates.len());

        for gate in &blueprint.gates {
            let decision = self.evaluate_gate(gate, &inputs, &decisions, context)?;
            trace!(gate = %decision.name, state = %decision.state, "gate resolved");
            inputs.insert(decision.name.clone(), decision.state);
            decisions.push(decision);
        }

        let result = select_output(blueprint, &inputs, &decisions);
        let encoded_vector = codec::encode_states(decisions.iter().map(|d| d.state));
        let elapsed_ms = started.elapsed().as_secs_f64() * 1_000.0;
        let report = DecisionReport {
            result,
            encoded_vector,
            metadata: ReportMetadata {
                duration_ms: (elapsed_ms * 1_000.0).round() / 1_000.0,
                total_gates: decisions.len(),
                blueprint: blueprint.name.clone(),
            },
            decisions,
        };

        debug!(blueprint = %blueprint.name, result = %report.result, "evaluation complete");

        for observer in &self.observers {
            observer.on_evaluated(&report, context, blueprint);
        }

        Ok(report)
    }

    /// Input phase: resolve every declared input against the context.
    fn resolve_inputs(
        &self,
        blueprint: &Blueprint,
        context: &Context,
    ) -> Result<ResolvedInputs, EngineError> {
        let mut resolved = ResolvedInputs::with_capacity(blueprint.inputs.len());
        for (name, source) in &blueprint.inputs {
            let state = match source {
                InputSource::Literal(state) => *state,
                InputSource::FromContext(path) => match path_lookup(context, path) {
                    Some(value) => TernaryState::from_value(value)?,
                    None => TernaryState::Unknown,
                },
                InputSource::FromExpression(expr) => {
                    self.require_evaluator()?.evaluate(expr, context)?
                }
                InputSource::Computed { resolver, .. } => resolver(context),
            };
            resolved.insert(name.clone(), state);
        }
        Ok(resolved)
    }

    /// Gate phase step: resolve operands and apply the operator.
    fn evaluate_gate(
        &self,
        gate: &Gate,
        inputs: &ResolvedInputs,
        decisions: &[Decision],
        context: &Context,
    ) -> Result<Decision, EngineError> {
        let mut values = Vec::with_capacity(gate.operands.len());
        let mut evidence = Vec::with_capacity(gate.operands.len());
        for operand in &gate.operands {
            let state = self.resolve_operand(operand, inputs, decisions)?;
            evidence.push(Evidence { operand: operand.label(), state });
            values.push(state);
        }

        let state = match gate.op {
            GateOp::And => ops::and(values.iter().copied()),
            GateOp::Or => ops::or(values.iter().copied()),
            GateOp::Not => ops::not(values.first().copied().unwrap_or(TernaryState::Unknown)),
            GateOp::Consensus => ops::consensus(values.iter().copied()),
            GateOp::Weighted => ops::weighted(values.iter().copied(), &gate.weights),
            GateOp::Expression => {
                // Expression gates see the caller's context with every
                // accumulated signal layered on top.
                let merged = merge_states(context, inputs);
                self.require_evaluator()?
                    .evaluate(gate.expression.as_deref().unwrap_or(""), &merged)?
            }
        };

        Ok(Decision {
            name: gate.name.clone(),
            state,
            operator: gate.op,
            evidence,
            description: gate.description.clone(),
        })
    }

    /// Resolve one operand against the accumulated inputs and decisions.
    fn resolve_operand(
        &self,
        operand: &Operand,
        inputs: &ResolvedInputs,
        decisions: &[Decision],
    ) -> Result<TernaryState, EngineError> {
        match operand {
            Operand::Ref(reference) => {
                if let Some(name) = reference.strip_prefix('!') {
                    return Ok(resolve_key(name, inputs, decisions)?.invert());
                }
                if let Some(expr) = reference.strip_prefix('@') {
                    // Operand expressions see the accumulated signals
                    // only, not the caller's context.
                    let scope = states_to_context(inputs);
                    return Ok(self.require_evaluator()?.evaluate(expr, &scope)?);
                }
                resolve_key(reference, inputs, decisions)
            }
            Operand::Literal(state) => Ok(*state),
            Operand::Value(value) => Ok(TernaryState::from_value(value)?),
            Operand::Computed { resolver, .. } => Ok(resolver(inputs, decisions)),
        }
    }

    fn require_evaluator(&self) -> Result<&ExpressionEvaluator, EngineError> {
        self.evaluator.as_ref().ok_or(EngineError::EvaluatorNotConfigured)
    }
}

/// Look up an exact key among accumulated inputs, then decisions.
fn resolve_key(
    key: &str,
    inputs: &ResolvedInputs,
    decisions: &[Decision],
) -> Result<TernaryState, EngineError> {
    if let Some(state) = inputs.get(key) {
        return Ok(*state);
    }
    decisions
        .iter()
        .find(|decision| decision.name == key)
        .map(|decision| decision.state)
        .ok_or_else(|| EngineError::UndefinedOperand(key.to_string()))
}

/// Output phase: the declared output key, else the last gate.
fn select_output(
    blueprint: &Blueprint,
    inputs: &ResolvedInputs,
    decisions: &[Decision],
) -> TernaryState {
    let last = decisions.last();
    let output_key = blueprint
        .output
        .as_deref()
        .or_else(|| last.map(|decision| decision.name.as_str()));

    output_key
        .and_then(|key| inputs.get(key).copied())
        .or_else(|| last.map(|decision| decision.state))
        .unwrap_or(TernaryState::Unknown)
}

/// Stable memoization key: hash of the canonical JSON of blueprint and
/// context. Computed resolvers contribute their label only.
fn stable_key(blueprint: &Blueprint, context: &Context) -> u64 {
    let canonical = serde_json::to_string(&(blueprint, context)).unwrap_or_default();
    let mut hasher = DefaultHasher::new();
    canonical.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use TernaryState::{False, True, Unknown};

    fn ctx(value: Value) -> Context {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn engine() -> DecisionEngine {
        DecisionEngine::new().with_evaluator(ExpressionEvaluator::new())
    }

    fn eligibility_blueprint() -> Blueprint {
        Blueprint::builder("eligibility")
            .input("consent", InputSource::computed("grant-consent", |_| True))
            .input("risk", InputSource::FromContext("user.risk".into()))
            .and_gate("eligibility", ["consent", "!risk"])
            .weighted_gate("final", ["eligibility", "consent", "risk"], vec![3, 1, -2])
            .output("final")
            .build()
    }

    #[test]
    fn test_end_to_end_weighted_blueprint() {
        let report = engine()
            .evaluate(&eligibility_blueprint(), &ctx(json!({"user": {"risk": null}})))
            .unwrap();

        // risk = Unknown, eligibility = and(True, not(Unknown)) = Unknown,
        // final score = 0*3 + 1*1 + 0*(-2) = 1.
        assert_eq!(report.result, True);
        assert_eq!(report.decisions.len(), 2);
        assert!(!report.encoded_vector.is_empty());
        assert_eq!(report.encoded_vector, "0+");
        assert_eq!(report.decisions[0].state, Unknown);
        assert_eq!(report.metadata.total_gates, 2);
        assert_eq!(report.metadata.blueprint, "eligibility");
    }

    #[test]
    fn test_weighted_zero_score_is_unknown() {
        let blueprint = Blueprint::builder("tie")
            .input("a", True)
            .input("b", False)
            .weighted_gate("vote", ["a", "b"], vec![2, 2])
            .build();
        let report = engine().evaluate(&blueprint, &Context::new()).unwrap();
        assert_eq!(report.result, Unknown);
    }

    #[test]
    fn test_evidence_records_operand_labels() {
        let report = engine()
            .evaluate(&eligibility_blueprint(), &ctx(json!({"user": {"risk": false}})))
            .unwrap();
        let eligibility = report.decision("eligibility").unwrap();
        assert_eq!(eligibility.evidence.len(), 2);
        assert_eq!(eligibility.evidence[0].operand, "consent");
        assert_eq!(eligibility.evidence[1].operand, "!risk");
        assert_eq!(eligibility.evidence[1].state, True);
        assert_eq!(eligibility.state, True);
    }

    #[test]
    fn test_gates_see_earlier_gates_by_name() {
        let blueprint = Blueprint::builder("chain")
            .input("a", True)
            .not_gate("inverted", "a")
            .or_gate("rescued", ["inverted", "a"])
            .build();
        let report = engine().evaluate(&blueprint, &Context::new()).unwrap();
        assert_eq!(report.decision("inverted").unwrap().state, False);
        assert_eq!(report.result, True); // output defaults to last gate
    }

    #[test]
    fn test_undefined_operand() {
        let blueprint = Blueprint::builder("broken")
            .and_gate("gate", ["ghost"])
            .build();
        let result = engine().evaluate(&blueprint, &Context::new());
        assert!(matches!(result, Err(EngineError::UndefinedOperand(name)) if name == "ghost"));
    }

    #[test]
    fn test_plain_string_input_is_context_path() {
        // An input of "true" looks up the context key `true`; with no
        // such key the input reads as Unknown, not literal TRUE.
        let blueprint = Blueprint::builder("paths")
            .input("flag", InputSource::FromContext("true".into()))
            .and_gate("gate", ["flag"])
            .build();
        let report = engine().evaluate(&blueprint, &Context::new()).unwrap();
        assert_eq!(report.result, Unknown);

        let report = engine()
            .evaluate(&blueprint, &ctx(json!({"true": false})))
            .unwrap();
        assert_eq!(report.result, False);
    }

    #[test]
    fn test_expression_input_and_gate() {
        let blueprint = Blueprint::builder("expressions")
            .input("cleared", InputSource::FromExpression("user.vetted AND !user.flagged".into()))
            .expression_gate("confirmed", "cleared OR override")
            .build();
        let context = ctx(json!({
            "user": {"vetted": true, "flagged": false},
            "override": false,
        }));
        let report = engine().evaluate(&blueprint, &context).unwrap();
        assert_eq!(report.result, True);
    }

    #[test]
    fn test_expression_operand_sees_inputs_only() {
        let blueprint = Blueprint::builder("scoped")
            .input("a", True)
            .and_gate("gate", ["@a AND ambient"])
            .build();
        // `ambient` exists in the caller context but operand expressions
        // only see accumulated signals, so it reads Unknown.
        let report = engine()
            .evaluate(&blueprint, &ctx(json!({"ambient": true})))
            .unwrap();
        assert_eq!(report.result, Unknown);
    }

    #[test]
    fn test_evaluator_not_configured() {
        let blueprint = Blueprint::builder("needs-expr")
            .input("a", InputSource::FromExpression("true".into()))
            .build();
        let result = DecisionEngine::new().evaluate(&blueprint, &Context::new());
        assert!(matches!(result, Err(EngineError::EvaluatorNotConfigured)));
    }

    #[test]
    fn test_output_key_falls_back_to_last_gate() {
        let blueprint = Blueprint::builder("fallback")
            .input("a", True)
            .and_gate("gate", ["a"])
            .output("nonexistent")
            .build();
        let report = engine().evaluate(&blueprint, &Context::new()).unwrap();
        assert_eq!(report.result, True);
    }

    #[test]
    fn test_empty_blueprint_is_unknown() {
        let report = engine()
            .evaluate(&Blueprint::new("empty"), &Context::new())
            .unwrap();
        assert_eq!(report.result, Unknown);
        assert!(report.decisions.is_empty());
        assert_eq!(report.encoded_vector, "");
    }

    #[test]
    fn test_output_can_name_an_input() {
        let blueprint = Blueprint::builder("pass-through")
            .input("a", False)
            .and_gate("gate", ["a"])
            .output("a")
            .build();
        let report = engine().evaluate(&blueprint, &Context::new()).unwrap();
        assert_eq!(report.result, False);
    }

    #[test]
    fn test_cache_hit_skips_reevaluation() {
        let counter = Arc::new(AtomicUsize::new(0));
        let observed = counter.clone();
        let cache = Arc::new(MemoCache::new(Duration::from_secs(60)));
        let engine = engine()
            .with_cache(cache.clone())
            .with_observer(Arc::new(move |_: &DecisionReport, _: &Context, _: &Blueprint| {
                observed.fetch_add(1, Ordering::SeqCst);
            }));

        let blueprint = Blueprint::builder("cached")
            .input("a", True)
            .and_gate("gate", ["a"])
            .build();
        let context = Context::new();

        let first = engine.evaluate(&blueprint, &context).unwrap();
        let second = engine.evaluate(&blueprint, &context).unwrap();
        assert_eq!(first.result, second.result);
        assert_eq!(cache.len(), 1);
        // The observer only fires for the fresh evaluation.
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cache_zero_ttl_reevaluates() {
        let counter = Arc::new(AtomicUsize::new(0));
        let observed = counter.clone();
        let engine = engine()
            .with_cache(Arc::new(MemoCache::new(Duration::ZERO)))
            .with_observer(Arc::new(move |_: &DecisionReport, _: &Context, _: &Blueprint| {
                observed.fetch_add(1, Ordering::SeqCst);
            }));

        let blueprint = Blueprint::builder("uncacheable")
            .input("a", True)
            .and_gate("gate", ["a"])
            .build();
        let context = Context::new();

        engine.evaluate(&blueprint, &context).unwrap();
        engine.evaluate(&blueprint, &context).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_distinct_contexts_get_distinct_cache_slots() {
        let cache = Arc::new(MemoCache::new(Duration::from_secs(60)));
        let engine = engine().with_cache(cache.clone());
        let blueprint = Blueprint::builder("ctx-sensitive")
            .input("flag", InputSource::FromContext("flag".into()))
            .and_gate("gate", ["flag"])
            .build();

        let on = engine.evaluate(&blueprint, &ctx(json!({"flag": true}))).unwrap();
        let off = engine.evaluate(&blueprint, &ctx(json!({"flag": false}))).unwrap();
        assert_eq!(on.result, True);
        assert_eq!(off.result, False);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_evaluate_uncached_skips_the_cache() {
        let cache = Arc::new(MemoCache::new(Duration::from_secs(60)));
        let engine = engine().with_cache(cache.clone());
        let blueprint = Blueprint::builder("direct")
            .input("a", True)
            .and_gate("gate", ["a"])
            .build();

        let report = engine.evaluate_uncached(&blueprint, &Context::new()).unwrap();
        assert_eq!(report.result, True);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_failure_is_not_cached_and_not_observed() {
        let counter = Arc::new(AtomicUsize::new(0));
        let observed = counter.clone();
        let cache = Arc::new(MemoCache::new(Duration::from_secs(60)));
        let engine = engine()
            .with_cache(cache.clone())
            .with_observer(Arc::new(move |_: &DecisionReport, _: &Context, _: &Blueprint| {
                observed.fetch_add(1, Ordering::SeqCst);
            }));

        let blueprint = Blueprint::builder("failing")
            .and_gate("gate", ["ghost"])
            .build();
        assert!(engine.evaluate(&blueprint, &Context::new()).is_err());
        assert!(cache.is_empty());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_not_gate_without_operands_is_unknown() {
        let blueprint = Blueprint::builder("degenerate")
            .gate(Gate::new("gate", GateOp::Not))
            .build();
        let report = engine().evaluate(&blueprint, &Context::new()).unwrap();
        assert_eq!(report.result, Unknown);
    }

    #[test]
    fn test_computed_operand_sees_decisions() {
        let blueprint = Blueprint::builder("computed")
            .input("a", True)
            .not_gate("inverted", "a")
            .gate(Gate::new("echo", GateOp::And).with_operands([Operand::computed(
                "first-gate-state",
                |_inputs: &ResolvedInputs, decisions: &[Decision]| {
                    decisions.first().map(|d| d.state).unwrap_or(Unknown)
                },
            )]))
            .build();
        let report = engine().evaluate(&blueprint, &Context::new()).unwrap();
        assert_eq!(report.decision("echo").unwrap().state, False);
    }
}
