//! Trilean - CLI Entry Point
//!
//! Commands:
//! - `trilean eval <expression>` - Evaluate a logic expression
//! - `trilean decide <blueprint.json>` - Evaluate a decision blueprint
//! - `trilean convert <value>` - Integer ↔ balanced ternary
//! - `trilean encode <values>` / `trilean decode <tercode>` - State vectors
//! - `trilean selftest` - Arithmetic and codec round-trip checks

use clap::{Parser, Subcommand};
use trilean::engine::{Blueprint, DecisionEngine, MemoCache};
use trilean::ternary::arith;
use trilean::{codec, Context, ExpressionEvaluator, TernaryVector};

#[derive(Parser)]
#[command(name = "trilean")]
#[command(version = "0.1.0")]
#[command(about = "Three-valued logic toolkit: algebra, codec, expressions, decision blueprints")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a logic expression against a JSON context
    Eval {
        /// The expression, e.g. "consent AND !user.blocked"
        expression: String,
        /// Inline JSON context object
        #[arg(short, long, default_value = "{}")]
        context: String,
    },
    /// Evaluate a decision blueprint file against a JSON context
    Decide {
        /// Path to the blueprint JSON file
        blueprint: String,
        /// Inline JSON context object, or @path to a context file
        #[arg(short, long, default_value = "{}")]
        context: String,
        /// Memoization TTL in seconds (omit to disable caching)
        #[arg(long)]
        ttl: Option<u64>,
    },
    /// Convert between decimal and balanced ternary
    Convert {
        /// A decimal integer, or a balanced ternary string of + 0 - digits
        value: String,
    },
    /// Encode a JSON array of coercible values to a trit string
    Encode {
        /// e.g. '[true, null, "no"]'
        values: String,
    },
    /// Decode a trit string back to states
    Decode {
        /// e.g. "+0-"
        tercode: String,
    },
    /// Run the built-in arithmetic and codec self-test
    Selftest,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Eval { expression, context } => eval_expression(&expression, &context),
        Commands::Decide { blueprint, context, ttl } => decide(&blueprint, &context, ttl),
        Commands::Convert { value } => convert(&value),
        Commands::Encode { values } => encode(&values),
        Commands::Decode { tercode } => decode(&tercode),
        Commands::Selftest => selftest(),
    };

    if let Err(message) = outcome {
        eprintln!("error: {message}");
        std::process::exit(1);
    }
}

fn parse_context(raw: &str) -> Result<Context, String> {
    let text = match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read context file {path}: {e}"))?,
        None => raw.to_string(),
    };
    match serde_json::from_str(&text) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(_) => Err("context must be a JSON object".to_string()),
        Err(e) => Err(format!("invalid context JSON: {e}")),
    }
}

fn eval_expression(expression: &str, context: &str) -> Result<(), String> {
    let context = parse_context(context)?;
    let state = ExpressionEvaluator::new()
        .evaluate(expression, &context)
        .map_err(|e| e.to_string())?;
    println!("{state}");
    Ok(())
}

fn decide(blueprint_path: &str, context: &str, ttl: Option<u64>) -> Result<(), String> {
    let source = std::fs::read_to_string(blueprint_path)
        .map_err(|e| format!("failed to read blueprint {blueprint_path}: {e}"))?;
    let blueprint: Blueprint =
        serde_json::from_str(&source).map_err(|e| format!("invalid blueprint: {e}"))?;
    let context = parse_context(context)?;

    let mut engine = DecisionEngine::new().with_evaluator(ExpressionEvaluator::new());
    if let Some(seconds) = ttl {
        engine = engine.with_cache(std::sync::Arc::new(MemoCache::new(
            std::time::Duration::from_secs(seconds),
        )));
    }

    let report = engine.evaluate(&blueprint, &context).map_err(|e| e.to_string())?;
    let rendered = serde_json::to_string_pretty(&report)
        .map_err(|e| format!("failed to render report: {e}"))?;
    println!("{rendered}");
    Ok(())
}

fn convert(value: &str) -> Result<(), String> {
    // Decimal in, balanced out; anything non-decimal parses as trits.
    if let Ok(decimal) = value.parse::<i64>() {
        println!("{}", codec::to_balanced(decimal));
        return Ok(());
    }
    let decimal = codec::from_balanced(value).map_err(|e| e.to_string())?;
    println!("{decimal}");
    Ok(())
}

fn encode(values: &str) -> Result<(), String> {
    let parsed: serde_json::Value =
        serde_json::from_str(values).map_err(|e| format!("invalid JSON values: {e}"))?;
    let vector = TernaryVector::from_value(&parsed).map_err(|e| e.to_string())?;
    println!("{}", vector.encode());
    Ok(())
}

fn decode(tercode: &str) -> Result<(), String> {
    let states = codec::decode_states(tercode).map_err(|e| e.to_string())?;
    let labels: Vec<&str> = states.iter().map(|s| s.as_str()).collect();
    println!("{}", labels.join(" "));
    Ok(())
}

fn selftest() -> Result<(), String> {
    println!("Balanced ternary self-test");
    println!();

    let pairs = [(42i64, 17i64), (-100, 37), (364, -364), (9841, 1)];
    for (a, b) in pairs {
        let sum = arith::add(a, b);
        let difference = arith::subtract(a, b);
        println!(
            "  {a} + {b} = {sum}  ({} + {} = {})",
            codec::to_balanced(a),
            codec::to_balanced(b),
            codec::to_balanced(sum),
        );
        if sum != a + b || difference != a - b {
            return Err(format!("arithmetic self-test failed for ({a}, {b})"));
        }
    }

    println!();
    for n in [-121i64, -5, 0, 5, 121] {
        let encoded = codec::to_balanced(n);
        let decoded = codec::from_balanced(&encoded).map_err(|e| e.to_string())?;
        println!("  {n} -> {encoded} -> {decoded}");
        if decoded != n {
            return Err(format!("codec round-trip failed for {n}"));
        }
    }

    println!();
    println!("All checks passed.");
    Ok(())
}
