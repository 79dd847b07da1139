//! Curator CLI - educational resource curation.

mod cli;
mod commands;

use clap::{CommandFactory, Parser, error::ErrorKind};
use cli::{Cli, Commands};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Priority: RUST_LOG > --log-level > info with -v, warn otherwise
    let default_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| if cli.verbose { "info" } else { "warn" }.to_string());
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_level)))
        .init();

    let result = match cli.command {
        Some(Commands::Validate {
            file,
            output_dir,
            pause_ms,
            json,
        }) => commands::validate::run(file, output_dir, pause_ms, json, cli.verbose),

        Some(Commands::Tool { name, input }) => commands::tool::run(&name, &input.join(" "), cli.verbose),

        None if cli.test => commands::check::run(cli.verbose),

        None => match cli.curate.topic.clone() {
            Some(topic) if !topic.trim().is_empty() => commands::curate::run(topic, cli.curate, cli.verbose),
            _ => Cli::command()
                .error(
                    ErrorKind::MissingRequiredArgument,
                    "a TOPIC is required (or use --test, validate, tool)",
                )
                .exit(),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
