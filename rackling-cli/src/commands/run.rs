//! The `rackling run` command.
//!
//! Evaluates a file form-by-form. A failing `check-equal?` is reported
//! and evaluation continues with the next top-level form; any other error
//! aborts the run.

use crate::output;
use rackling_diagnostic::emit;
use rackling_eval::{Interp, ListStyle};
use rackling_reader::read;

pub fn run(path: &str, logic: bool, style: ListStyle) -> Result<(), String> {
    let source =
        std::fs::read_to_string(path).map_err(|e| format!("cannot read {path}: {e}"))?;

    let (datums, diagnostics) = read(&source);
    for diag in &diagnostics {
        emit(&source, path, diag);
    }
    if !diagnostics.is_empty() {
        return Err("syntax error".to_string());
    }

    let mut interp = Interp::new();
    interp.set_style(style);
    if logic {
        interp.load_logic().map_err(|e| e.to_string())?;
    }

    let mut failures = 0u32;
    for datum in &datums {
        match interp.eval(datum) {
            Ok(value) => {
                let text = interp.show(&value);
                if !text.is_empty() {
                    println!("{text}");
                }
            }
            Err(e) if e.is_test_failure() => {
                failures += 1;
                output::error(&e.to_string());
            }
            Err(e) => {
                output::error(&e.to_string());
                return Err("evaluation error".to_string());
            }
        }
    }

    if interp.tests_run() > 0 {
        let total = interp.tests_run();
        output::info(&format!("{}/{total} checks passed", total - failures));
    }
    if failures > 0 {
        return Err(format!("{failures} checks failed"));
    }
    Ok(())
}
