//! The rackling evaluator.
//!
//! A session ([`Interp`]) owns a root environment, evaluates datums
//! recursively with proper lexical closures, and hosts the embedded
//! miniKanren relation library when asked to. The one-shot entry points
//! ([`evaluate`], [`evaluate_with`]) build a session, run the source, and
//! hand back the last form's value.

mod builtin;
mod error;
mod eval;
mod logic;
mod structs;

pub use builtin::{builtins, standard_env};
pub use error::EvalError;
pub use eval::Interp;
pub use logic::KANREN_PRELUDE;

// Re-export the data model so embedders need only this crate.
pub use rackling_datum::{print, Env, ListStyle, Value};

/// Configuration for a one-shot evaluation request.
#[derive(Default)]
pub struct EvalOptions {
    /// A pre-existing environment, for threading state across calls.
    /// Absent, a fresh standard environment is built.
    pub env: Option<Env>,
    /// Bootstrap the miniKanren relation library before evaluating.
    pub logic: bool,
}

/// Evaluate source text in a fresh standard environment, logic engine
/// not loaded.
pub fn evaluate(source: &str) -> Result<Value, EvalError> {
    evaluate_with(source, EvalOptions::default())
}

/// Evaluate source text with explicit session configuration.
pub fn evaluate_with(source: &str, options: EvalOptions) -> Result<Value, EvalError> {
    let mut interp = match options.env {
        Some(env) => Interp::with_env(env),
        None => Interp::new(),
    };
    if options.logic {
        interp.load_logic()?;
    }
    interp.eval_source(source)
}
