//! autosuggest - grammar-driven autocomplete
//!
//! Suggests the tokens that can legally continue a partial input, for any
//! grammar given as a TOML definition (HarmonySQL is bundled).
//!
//! # Usage
//!
//! ```bash
//! # One-shot: print the suggestions for an input
//! autosuggest "FROM PROFILE_TABLE SE"
//!
//! # Interactive: Tab completes, Enter lists the suggestions for the line
//! autosuggest --grammar grammars/harmony_sql.toml
//! ```

use std::sync::Arc;

use tracing::Level;

use autosuggest::cli::CliInterface;
use autosuggest::error::Result;
use autosuggest::formatter::Formatter;
use autosuggest::grammar::GrammarModel;
use autosuggest::repl::ReplEngine;
use autosuggest::suggest::{Suggester, suggest_with_options};

/// Application entry point
fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Handle subcommands, the one-shot input, or start the REPL
///
/// # Returns
/// * `Result<bool>` - Whether the request succeeded
fn run() -> Result<bool> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    if cli.handle_subcommand()? {
        return Ok(true);
    }

    let grammar = cli.load_grammar()?;

    match cli.args().input.as_deref() {
        Some(input) => Ok(run_once(&cli, grammar.as_ref(), input)),
        None => {
            let name = grammar.rule_name(grammar.start_rule()).to_string();
            cli.print_banner(&name);
            run_interactive_mode(&cli, grammar)?;
            Ok(true)
        }
    }
}

/// Print the suggestions for a single input
///
/// Returns false when the input is rejected.
fn run_once(cli: &CliInterface, grammar: &dyn GrammarModel, input: &str) -> bool {
    let formatter = Formatter::from_config(&cli.config().display);
    let options = cli.config().suggest_options();

    match suggest_with_options(grammar, input, &options)
        .and_then(|report| formatter.format(input, &report, grammar))
    {
        Ok(output) => {
            println!("{}", output);
            true
        }
        Err(e) => {
            eprintln!("{}", formatter.format_error(&e));
            false
        }
    }
}

/// Run application in interactive REPL mode
fn run_interactive_mode(cli: &CliInterface, grammar: Arc<dyn GrammarModel>) -> Result<()> {
    let suggester = Suggester::new(Arc::clone(&grammar), cli.config().suggest_options());
    let mut repl = ReplEngine::new(suggester, cli.config())?;

    while let Some(line) = repl.read_line()? {
        if line.trim().is_empty() {
            continue;
        }
        run_once(cli, grammar.as_ref(), &line);
    }

    println!("Goodbye!");
    Ok(())
}

/// Initialize logging system based on verbosity level
///
/// # Arguments
/// * `cli` - CLI interface with verbosity settings
fn initialize_logging(cli: &CliInterface) {
    let level = if cli.args().very_verbose {
        Level::TRACE
    } else if cli.args().verbose {
        Level::DEBUG
    } else {
        cli.config().logging.level.to_tracing_level()
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
