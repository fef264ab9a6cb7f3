//! The `rackling repl` command.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::output;
use rackling_diagnostic::emit;
use rackling_eval::{Interp, ListStyle};
use rackling_reader::read;

pub fn run(logic: bool, style: ListStyle) -> Result<(), String> {
    println!("rackling REPL v{}", env!("CARGO_PKG_VERSION"));
    println!("Type :help for help, :quit to exit");
    println!();

    let mut rl = DefaultEditor::new().map_err(|e| e.to_string())?;

    // One persistent session for the whole REPL.
    let mut interp = Interp::new();
    interp.set_style(style);
    if logic {
        interp.load_logic().map_err(|e| e.to_string())?;
    }

    loop {
        let readline = rl.readline("rackling> ");
        match readline {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Handle REPL commands
                if line.starts_with(':') {
                    match line {
                        ":quit" | ":q" => break,
                        ":help" | ":h" => {
                            println!("Commands:");
                            println!("  :help, :h    Show this help");
                            println!("  :quit, :q    Exit the REPL");
                            println!("  :env         Show current bindings");
                            continue;
                        }
                        ":env" => {
                            for name in interp.env().local_names() {
                                println!("{name}");
                            }
                            continue;
                        }
                        _ => {
                            println!("Unknown command: {line}");
                            continue;
                        }
                    }
                }

                let (datums, diagnostics) = read(line);
                if !diagnostics.is_empty() {
                    for diag in &diagnostics {
                        emit(line, "<repl>", diag);
                    }
                    continue;
                }

                for datum in &datums {
                    match interp.eval(datum) {
                        Ok(value) => {
                            let text = interp.show(&value);
                            if !text.is_empty() {
                                println!("{text}");
                            }
                        }
                        Err(e) => {
                            output::error(&e.to_string());
                            if !e.is_test_failure() {
                                break;
                            }
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("Error: {err:?}");
                break;
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}
