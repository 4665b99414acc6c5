//! Mailsift CLI - filter mailing lists against already-sent mail.

mod cli;
mod commands;
mod server;

use clap::Parser;
use cli::{Cli, Commands};
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Filter {
            file,
            output,
            format,
            oracle,
            json,
        } => commands::filter::run(file, output, format, oracle, json, cli.verbose),

        Commands::Preview { file, rows, json } => commands::preview::run(file, rows, json),

        Commands::Serve {
            port,
            allow_origin,
            oracle,
        } => commands::serve::run(port, allow_origin, oracle),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr. `RUST_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
