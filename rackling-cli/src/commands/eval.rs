//! The `rackling eval` command.

use crate::output;
use rackling_diagnostic::emit;
use rackling_eval::{Interp, ListStyle};
use rackling_reader::read;

pub fn run(expr: &str, logic: bool, style: ListStyle) -> Result<(), String> {
    let (datums, diagnostics) = read(expr);

    for diag in &diagnostics {
        emit(expr, "<eval>", diag);
    }
    if !diagnostics.is_empty() {
        return Err("syntax error".to_string());
    }

    let mut interp = Interp::new();
    interp.set_style(style);
    if logic {
        interp.load_logic().map_err(|e| e.to_string())?;
    }

    match interp.eval_program(&datums) {
        Ok(value) => {
            // Void prints as nothing; stay silent for it.
            let text = interp.show(&value);
            if !text.is_empty() {
                output::success(&text);
            }
            Ok(())
        }
        Err(e) => {
            output::error(&e.to_string());
            Err("evaluation error".to_string())
        }
    }
}
