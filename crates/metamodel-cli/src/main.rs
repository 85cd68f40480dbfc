//! Metamodel CLI: the `metamodel` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Commands::Factories { config, json } => commands::factories::run(config, json),

        Commands::Introspect {
            model,
            config,
            r#type,
            json,
        } => commands::introspect::run(model, config, r#type, json),

        Commands::Validate {
            model,
            config,
            fail_on_error,
            json,
        } => commands::validate::run(model, config, fail_on_error, json),

        Commands::Layout {
            model,
            type_name,
            config,
            json,
        } => commands::layout::run(model, type_name, config, json),
    }
}

/// Logs go to stderr so stdout stays parseable with `--json`.
fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .unwrap_or_else(|e| {
            eprintln!("error: invalid --log-level {level:?}: {e}");
            std::process::exit(1);
        });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
