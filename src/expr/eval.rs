//! Expression evaluation: shunting-yard parsing and stack execution.
//!
//! Evaluation is three passes over the token stream: tokenize, convert
//! infix to postfix with the operator-precedence method, then execute the
//! postfix sequence on a value stack. Atoms resolve when pushed: the
//! literals `true` / `false` / `unknown` directly, anything else as a
//! dotted context path (absent paths read as Unknown, a leading `!`
//! inverts the resolved value).

use crate::context::{path_lookup, Context};
use crate::expr::token::{tokenize, CustomSpec, OpToken, Token};
use crate::ternary::{ops, CoercionError, TernaryState};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Handler for a runtime-registered operator. Receives resolved operands
/// in textual (left-to-right) order.
pub type OpHandler = Arc<dyn Fn(&[TernaryState]) -> TernaryState + Send + Sync>;

/// Errors raised during expression evaluation.
#[derive(Debug, Error)]
pub enum ExprError {
    /// A context value reached by an atom could not be coerced.
    #[error("expression operand: {0}")]
    Coercion(#[from] CoercionError),
}

/// Evaluator for the logic expression DSL.
///
/// Holds the table of runtime-registered operators; the built-in grammar
/// needs no configuration. Cheap to construct, immutable during
/// evaluation, safe to share across threads.
#[derive(Clone, Default)]
pub struct ExpressionEvaluator {
    custom: HashMap<String, CustomSpec>,
}

impl ExpressionEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom operator with a handler.
    ///
    /// The name is matched case-insensitively in expressions. The handler
    /// receives resolved operands in left-to-right textual order.
    pub fn register<F>(&mut self, name: &str, precedence: u8, arity: usize, handler: F)
    where
        F: Fn(&[TernaryState]) -> TernaryState + Send + Sync + 'static,
    {
        self.custom.insert(
            name.to_uppercase(),
            CustomSpec { precedence, arity, handler: Some(Arc::new(handler)) },
        );
    }

    /// Register an operator name without a handler.
    ///
    /// The token parses as an operator of the given precedence and arity
    /// but every application evaluates to Unknown until a handler is
    /// attached.
    pub fn register_spec(&mut self, name: &str, precedence: u8, arity: usize) {
        self.custom.insert(
            name.to_uppercase(),
            CustomSpec { precedence, arity, handler: None },
        );
    }

    /// Evaluate an expression against a context.
    ///
    /// An empty expression evaluates to Unknown.
    pub fn evaluate(&self, expression: &str, context: &Context) -> Result<TernaryState, ExprError> {
        let tokens = tokenize(expression, &self.custom);
        let postfix = self.to_postfix(tokens);
        self.run_postfix(&postfix, context)
    }

    /// Infix → postfix via the operator-precedence (shunting-yard) method.
    ///
    /// An incoming operator pops the stack while its precedence is ≤ the
    /// precedence on top; parentheses bracket the popping. No explicit
    /// associativity beyond that rule.
    fn to_postfix(&self, tokens: Vec<Token>) -> Vec<Token> {
        let mut output = Vec::with_capacity(tokens.len());
        let mut stack: Vec<Token> = Vec::new();

        for token in tokens {
            match token {
                Token::Op(ref op) => {
                    let precedence = op.precedence(&self.custom);
                    while matches!(
                        stack.last(),
                        Some(Token::Op(top)) if precedence <= top.precedence(&self.custom)
                    ) {
                        if let Some(popped) = stack.pop() {
                            output.push(popped);
                        }
                    }
                    stack.push(token);
                }
                Token::LeftParen => stack.push(token),
                Token::RightParen => {
                    while let Some(top) = stack.pop() {
                        if top == Token::LeftParen {
                            break;
                        }
                        output.push(top);
                    }
                }
                Token::Atom(_) => output.push(token),
            }
        }

        while let Some(top) = stack.pop() {
            if top != Token::LeftParen {
                output.push(top);
            }
        }

        output
    }

    /// Execute a postfix sequence on a value stack.
    fn run_postfix(
        &self,
        postfix: &[Token],
        context: &Context,
    ) -> Result<TernaryState, ExprError> {
        let mut stack: Vec<TernaryState> = Vec::new();

        for token in postfix {
            match token {
                Token::Atom(atom) => stack.push(resolve_atom(atom, context)?),
                Token::Op(op) => {
                    let arity = op.arity(&self.custom);
                    // Popping yields operands in reverse textual order; an
                    // exhausted stack reads as Unknown, keeping malformed
                    // expressions total.
                    let mut operands = vec![TernaryState::Unknown; arity];
                    for slot in operands.iter_mut().rev() {
                        if let Some(value) = stack.pop() {
                            *slot = value;
                        }
                    }
                    stack.push(self.apply(op, &operands));
                }
                Token::LeftParen | Token::RightParen => {}
            }
        }

        Ok(stack.pop().unwrap_or(TernaryState::Unknown))
    }

    /// Apply one operator to operands in textual order.
    fn apply(&self, op: &OpToken, operands: &[TernaryState]) -> TernaryState {
        match op {
            OpToken::Not => ops::not(operands[0]),
            OpToken::And => ops::and(operands.iter().copied()),
            OpToken::Or => ops::or(operands.iter().copied()),
            OpToken::Xor => ops::xor(operands.iter().copied()),
            OpToken::Maj => ops::weighted(operands.iter().copied(), &[]),
            OpToken::Consensus => ops::consensus(operands.iter().copied()),
            OpToken::If => {
                let (condition, then, otherwise) = (operands[0], operands[1], operands[2]);
                match condition {
                    TernaryState::True => then,
                    TernaryState::False => otherwise,
                    // An undecided condition blends both branches.
                    TernaryState::Unknown => ops::consensus([then, otherwise]),
                }
            }
            OpToken::Custom(name) => {
                match self.custom.get(name).and_then(|spec| spec.handler.as_ref()) {
                    Some(handler) => handler(operands),
                    None => TernaryState::Unknown,
                }
            }
        }
    }
}

impl std::fmt::Debug for ExpressionEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpressionEvaluator")
            .field("custom_operators", &self.custom.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Resolve one atom: literal keyword or dotted context path.
///
/// Paths walk the context segment by segment; any absent segment reads as
/// Unknown. A `!` prefix resolves the rest and inverts it. Values found
/// in the context are coerced, and coercion failures propagate.
pub fn resolve_atom(atom: &str, context: &Context) -> Result<TernaryState, ExprError> {
    match atom.to_lowercase().as_str() {
        "true" => return Ok(TernaryState::True),
        "false" => return Ok(TernaryState::False),
        "unknown" => return Ok(TernaryState::Unknown),
        _ => {}
    }
    resolve_path(atom, context)
}

fn resolve_path(path: &str, context: &Context) -> Result<TernaryState, ExprError> {
    if let Some(rest) = path.strip_prefix('!') {
        return Ok(resolve_path(rest, context)?.invert());
    }

    match path_lookup(context, path) {
        Some(value) => Ok(TernaryState::from_value(value)?),
        None => Ok(TernaryState::Unknown),
    }
}
