//! smartdo CLI binary

#![allow(clippy::print_stderr)]

use smartdo_cli::cli;
use smartdo_cli::tracing::{TracingConfig, TracingFormat};

fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = cli::parse();

    let tracing_config = TracingConfig {
        format: TracingFormat::resolve(cli.log_format, cli.json),
        level: cli.level.into(),
    };
    if let Err(e) = smartdo_cli::tracing::init_tracing(tracing_config) {
        eprintln!("{e:?}");
        std::process::exit(smartdo_cli::EXIT_FAILURE);
    }

    std::process::exit(smartdo_cli::run(cli));
}
