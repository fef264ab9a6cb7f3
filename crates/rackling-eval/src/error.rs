//! Evaluation errors.

use std::rc::Rc;

use rackling_datum::ReservedName;
use thiserror::Error;

/// Everything that can go wrong during evaluation.
///
/// All variants abort the enclosing evaluation except `TestFailure`, which
/// is recoverable by design: a driver may report it and continue with the
/// next top-level form. Unification failure in the logic engine is *not*
/// here — it is the ordinary value `#f` / the empty stream.
#[derive(Debug, Error)]
pub enum EvalError {
    /// Lexical or structural error from the reader.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Symbol lookup exhausted the environment chain.
    #[error("undefined variable `{0}`")]
    Unbound(Rc<str>),

    /// `define` targeted a name already bound in the current frame.
    #[error("`{name}` is already defined as {current}")]
    Redefined { name: Rc<str>, current: String },

    /// Binding a special-form keyword.
    #[error("`{0}` is a reserved word and cannot be bound")]
    Reserved(Rc<str>),

    /// Applying something that is not a procedure.
    #[error("{0} is not a procedure")]
    NotCallable(String),

    /// A native was handed a value of the wrong shape.
    #[error("{0}")]
    WrongType(String),

    /// A special form with the wrong shape of operands.
    #[error("malformed `{form}` form: {detail}")]
    Malformed {
        form: &'static str,
        detail: String,
    },

    /// A numbered `check-equal?` mismatch report.
    #[error("{0}")]
    TestFailure(String),
}

impl EvalError {
    pub fn malformed(form: &'static str, detail: impl Into<String>) -> Self {
        EvalError::Malformed {
            form,
            detail: detail.into(),
        }
    }

    /// True for the one recoverable-by-design class.
    pub fn is_test_failure(&self) -> bool {
        matches!(self, EvalError::TestFailure(_))
    }
}

impl From<ReservedName> for EvalError {
    fn from(err: ReservedName) -> Self {
        EvalError::Reserved(err.0)
    }
}
