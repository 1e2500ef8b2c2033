//! smartdo command line front end
//!
//! A thin adapter over `smartdo-core`: it reads a JSON task snapshot (from a
//! file or stdin), runs one operation and prints the JSON result on stdout.
//! Logs and diagnostics go to stderr.
//!
//! Exit codes: `0` on success, `1` for unreadable or invalid input, `2` when
//! `validate` rejects the edit or `audit` finds cycles.

// The CLI reports results on stdout and diagnostics on stderr
#![allow(clippy::print_stdout, clippy::print_stderr)]

/// Argument parsing and error mapping
pub mod cli;
/// Command execution
pub mod commands;
/// Tracing setup
pub mod tracing;

pub use cli::{CliError, Commands, EXIT_FAILURE, EXIT_OK, EXIT_REJECTED};
pub use commands::{CommandContext, Outcome, execute};

/// Run a parsed invocation and return the process exit code.
#[must_use]
pub fn run(cli: cli::Cli) -> i32 {
    let span = crate::command_span!(cli.command.name());
    let _guard = span.enter();

    let outcome = CommandContext::load(
        cli.config.as_deref(),
        &cli.tasks,
        cli.now,
        std::io::stdin(),
    )
    .and_then(|ctx| execute(&cli.command, &ctx));

    match outcome {
        Ok(outcome) => match serde_json::to_string_pretty(&outcome.output) {
            Ok(json) => {
                println!("{json}");
                outcome.exit_code
            }
            Err(e) => {
                let err = CliError::other(format!("Failed to serialize output: {e}"));
                cli::render_error(&err, cli.json);
                EXIT_FAILURE
            }
        },
        Err(err) => {
            cli::render_error(&err, cli.json);
            cli::exit_code_for(&err)
        }
    }
}
