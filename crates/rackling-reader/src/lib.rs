//! The rackling reader.
//!
//! Turns source text into datum trees — the `Value` shapes the evaluator
//! consumes. Quote marks become head-tagged lists (`'x` → `(quote x)`),
//! `#(…)` becomes `(vector …)`, and everything else nests as written.

mod reader;

pub use reader::Reader;

use rackling_datum::Value;
use rackling_diagnostic::Diagnostic;
use rackling_lexer::Lexer;

/// Read source text into a sequence of top-level datums.
///
/// Diagnostics cover both lexical and structural errors; a non-empty
/// diagnostic list means the datums should not be evaluated.
pub fn read(source: &str) -> (Vec<Value>, Vec<Diagnostic>) {
    let lexer = Lexer::new(source);
    let (tokens, mut diagnostics) = lexer.tokenize();

    let mut reader = Reader::new(tokens);
    let datums = reader.read_program();

    diagnostics.extend(reader.into_diagnostics());
    (datums, diagnostics)
}
