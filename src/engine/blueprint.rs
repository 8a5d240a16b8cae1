//! Declarative decision blueprints.
//!
//! A blueprint names its inputs, chains an ordered list of gates over
//! them, and points at the key whose resolved state is the final result.
//! Blueprints are plain data: they deserialize from JSON (the CLI feeds
//! them from files) and are evaluated by the
//! [`DecisionEngine`](crate::engine::DecisionEngine).
//!
//! Gate operators form a closed set; an unrecognised operator name is
//! rejected when the blueprint is read rather than silently treated as
//! AND.

use crate::context::Context;
use crate::engine::decision::Decision;
use crate::ternary::TernaryState;
use serde::de::Error as DeError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Resolved input signals accumulated during evaluation, keyed by input
/// or gate name.
pub type ResolvedInputs = HashMap<String, TernaryState>;

/// Resolver invoked for a computed input, with the caller's context.
pub type InputResolver = Arc<dyn Fn(&Context) -> TernaryState + Send + Sync>;

/// Resolver invoked for a computed gate operand, with the accumulated
/// inputs and the decisions made so far.
pub type OperandResolver = Arc<dyn Fn(&ResolvedInputs, &[Decision]) -> TernaryState + Send + Sync>;

/// Where an input's state comes from.
///
/// A plain JSON string always deserializes to `FromContext` — `"true"`
/// as an input value means "look up the context key `true`", never the
/// literal TRUE. Prefix with `@` for an expression instead.
#[derive(Clone)]
pub enum InputSource {
    /// A fixed state.
    Literal(TernaryState),
    /// A dotted lookup path into the caller's context.
    FromContext(String),
    /// An expression evaluated against the caller's context.
    FromExpression(String),
    /// A caller-supplied resolver. The label identifies the resolver in
    /// cache keys, so distinct resolvers need distinct labels when
    /// memoization is on.
    Computed { label: String, resolver: InputResolver },
}

impl InputSource {
    /// Computed source from a closure.
    pub fn computed<F>(label: impl Into<String>, resolver: F) -> Self
    where
        F: Fn(&Context) -> TernaryState + Send + Sync + 'static,
    {
        InputSource::Computed { label: label.into(), resolver: Arc::new(resolver) }
    }

    fn from_json(value: &Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(InputSource::Literal(TernaryState::Unknown)),
            Value::Bool(b) => Ok(InputSource::Literal((*b).into())),
            Value::Number(n) => n
                .as_i64()
                .map(|i| InputSource::Literal(TernaryState::from_i64(i)))
                .ok_or_else(|| format!("unsupported input value: {n}")),
            Value::String(s) => Ok(match s.strip_prefix('@') {
                Some(expr) => InputSource::FromExpression(expr.to_string()),
                None => InputSource::FromContext(s.clone()),
            }),
            Value::Object(map) if map.len() == 1 => {
                let (key, inner) = map.iter().next().expect("len checked");
                match (key.as_str(), inner) {
                    ("literal", Value::String(s)) => TernaryState::from_str_alias(s)
                        .map(InputSource::Literal)
                        .map_err(|e| e.to_string()),
                    ("path", Value::String(s)) => Ok(InputSource::FromContext(s.clone())),
                    ("expr", Value::String(s)) => Ok(InputSource::FromExpression(s.clone())),
                    ("computed", _) => {
                        Err("computed inputs cannot be deserialized".to_string())
                    }
                    _ => Err(format!("unsupported input source: {value}")),
                }
            }
            _ => Err(format!("unsupported input value: {value}")),
        }
    }
}

impl From<TernaryState> for InputSource {
    fn from(state: TernaryState) -> Self {
        InputSource::Literal(state)
    }
}

impl From<bool> for InputSource {
    fn from(value: bool) -> Self {
        InputSource::Literal(value.into())
    }
}

impl Serialize for InputSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            InputSource::Literal(state) => map.serialize_entry("literal", state)?,
            InputSource::FromContext(path) => map.serialize_entry("path", path)?,
            InputSource::FromExpression(expr) => map.serialize_entry("expr", expr)?,
            InputSource::Computed { label, .. } => map.serialize_entry("computed", label)?,
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for InputSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        InputSource::from_json(&value).map_err(D::Error::custom)
    }
}

impl fmt::Debug for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Literal(state) => write!(f, "Literal({state})"),
            InputSource::FromContext(path) => write!(f, "FromContext({path:?})"),
            InputSource::FromExpression(expr) => write!(f, "FromExpression({expr:?})"),
            InputSource::Computed { label, .. } => write!(f, "Computed({label:?})"),
        }
    }
}

/// One gate operand.
///
/// String operands carry the reference DSL: a bare name looks up an
/// input or earlier gate by exact key, `!name` inverts the lookup, and
/// `@expr` evaluates an expression over the signals accumulated so far.
#[derive(Clone)]
pub enum Operand {
    /// A reference string (`name`, `!name`, or `@expr`).
    Ref(String),
    /// A fixed state.
    Literal(TernaryState),
    /// A raw value coerced at resolution time.
    Value(Value),
    /// A caller-supplied resolver over the accumulated inputs and
    /// decisions. Labelled for evidence and cache keys.
    Computed { label: String, resolver: OperandResolver },
}

impl Operand {
    /// Computed operand from a closure.
    pub fn computed<F>(label: impl Into<String>, resolver: F) -> Self
    where
        F: Fn(&ResolvedInputs, &[Decision]) -> TernaryState + Send + Sync + 'static,
    {
        Operand::Computed { label: label.into(), resolver: Arc::new(resolver) }
    }

    /// The operand's evidence label.
    pub fn label(&self) -> String {
        match self {
            Operand::Ref(s) => s.clone(),
            Operand::Literal(state) => state.as_str().to_string(),
            Operand::Value(value) => value.to_string(),
            Operand::Computed { label, .. } => label.clone(),
        }
    }

    fn from_json(value: &Value) -> Result<Self, String> {
        match value {
            Value::String(s) => Ok(Operand::Ref(s.clone())),
            Value::Bool(b) => Ok(Operand::Literal((*b).into())),
            Value::Null => Ok(Operand::Literal(TernaryState::Unknown)),
            Value::Object(map) if map.len() == 1 => {
                let (key, inner) = map.iter().next().expect("len checked");
                match (key.as_str(), inner) {
                    ("literal", Value::String(s)) => TernaryState::from_str_alias(s)
                        .map(Operand::Literal)
                        .map_err(|e| e.to_string()),
                    ("value", v) => Ok(Operand::Value(v.clone())),
                    ("computed", _) => {
                        Err("computed operands cannot be deserialized".to_string())
                    }
                    _ => Ok(Operand::Value(value.clone())),
                }
            }
            other => Ok(Operand::Value(other.clone())),
        }
    }
}

impl From<&str> for Operand {
    fn from(s: &str) -> Self {
        Operand::Ref(s.to_string())
    }
}

impl From<String> for Operand {
    fn from(s: String) -> Self {
        Operand::Ref(s)
    }
}

impl From<TernaryState> for Operand {
    fn from(state: TernaryState) -> Self {
        Operand::Literal(state)
    }
}

impl From<bool> for Operand {
    fn from(value: bool) -> Self {
        Operand::Literal(value.into())
    }
}

impl Serialize for Operand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Operand::Ref(s) => serializer.serialize_str(s),
            Operand::Literal(state) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("literal", state)?;
                map.end()
            }
            Operand::Value(value) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("value", value)?;
                map.end()
            }
            Operand::Computed { label, .. } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("computed", label)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Operand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Operand::from_json(&value).map_err(D::Error::custom)
    }
}

impl fmt::Debug for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Ref(s) => write!(f, "Ref({s:?})"),
            Operand::Literal(state) => write!(f, "Literal({state})"),
            Operand::Value(value) => write!(f, "Value({value})"),
            Operand::Computed { label, .. } => write!(f, "Computed({label:?})"),
        }
    }
}

/// The closed set of gate operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateOp {
    And,
    Or,
    Not,
    Consensus,
    Weighted,
    Expression,
}

impl GateOp {
    /// Uppercase operator name as recorded on decisions.
    pub const fn as_str(self) -> &'static str {
        match self {
            GateOp::And => "AND",
            GateOp::Or => "OR",
            GateOp::Not => "NOT",
            GateOp::Consensus => "CONSENSUS",
            GateOp::Weighted => "WEIGHTED",
            GateOp::Expression => "EXPRESSION",
        }
    }
}

impl fmt::Display for GateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named gate: an operator applied to a list of operands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gate {
    pub name: String,
    #[serde(rename = "operator")]
    pub op: GateOp,
    #[serde(default)]
    pub operands: Vec<Operand>,
    /// Weights for [`GateOp::Weighted`]; fractional JSON weights are
    /// truncated to integers. Positions past the end default to weight 1.
    #[serde(default, deserialize_with = "deserialize_weights")]
    pub weights: Vec<i64>,
    /// Expression for [`GateOp::Expression`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn deserialize_weights<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<i64>, D::Error> {
    let raw = Vec::<f64>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|w| w.trunc() as i64).collect())
}

impl Gate {
    pub fn new(name: impl Into<String>, op: GateOp) -> Self {
        Gate {
            name: name.into(),
            op,
            operands: Vec::new(),
            weights: Vec::new(),
            expression: None,
            description: None,
        }
    }

    pub fn with_operands<I>(mut self, operands: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        self.operands = operands.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_weights(mut self, weights: Vec<i64>) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A declarative decision graph: named inputs, ordered gates, output key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Blueprint {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inputs: BTreeMap<String, InputSource>,
    #[serde(default)]
    pub gates: Vec<Gate>,
    /// Key naming the input or gate whose state is the result. Defaults
    /// to the last gate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl Blueprint {
    pub fn new(name: impl Into<String>) -> Self {
        Blueprint { name: name.into(), ..Default::default() }
    }

    /// Start a fluent builder.
    pub fn builder(name: impl Into<String>) -> crate::engine::BlueprintBuilder {
        crate::engine::BlueprintBuilder::new(name)
    }
}
