//! rackling CLI - the rackling language command line interface.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use rackling_eval::ListStyle;

/// Main CLI structure.
#[derive(Parser)]
#[command(name = "rackling")]
#[command(author, version, about = "rackling - a small Racket with a relational heart", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Load the miniKanren relation library into the session.
    #[arg(long, global = true)]
    logic: bool,

    /// Display sequences as explicit cons chains.
    #[arg(long, global = true)]
    cons: bool,
}

/// Available CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression.
    Eval {
        /// The expression to evaluate.
        expr: String,
    },

    /// Run a rackling file.
    Run {
        /// The file to run.
        file: String,
    },

    /// Start an interactive REPL.
    Repl,
}

/// Main entry point.
fn main() {
    let cli = Cli::parse();
    let style = if cli.cons {
        ListStyle::ConsChain
    } else {
        ListStyle::Parens
    };

    let result = match cli.command {
        Commands::Eval { expr } => commands::eval::run(&expr, cli.logic, style),
        Commands::Run { file } => commands::run::run(&file, cli.logic, style),
        Commands::Repl => commands::repl::run(cli.logic, style),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
