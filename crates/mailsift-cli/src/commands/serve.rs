//! Serve command - run the HTTP upload service.

use axum::http::HeaderValue;
use colored::Colorize;
use mailsift::Mailsift;

use crate::cli::OracleArgs;
use crate::server::{app, state::AppState};

use super::build_oracle;

pub fn run(
    port: u16,
    allow_origin: String,
    oracle: OracleArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let origin = HeaderValue::from_str(&allow_origin)
        .map_err(|_| format!("Invalid origin: {}", allow_origin))?;

    // Built before the runtime starts: the Gmail oracle owns a blocking client.
    let oracle = build_oracle(&oracle)?;
    let state = AppState::new(Mailsift::with_shared_oracle(oracle));

    let url = format!("http://localhost:{}", port);
    println!();
    println!(
        "{} {}",
        "Starting upload server at".cyan().bold(),
        url.white().bold()
    );
    println!();
    println!("  Oracle: {}", state.oracle_name());
    println!("  Allowed origin: {}", allow_origin);
    println!("  Upload: POST {}/api/upload", url);
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(app::run_server(state.clone(), port, origin));
    drop(runtime);

    println!("{}", "Shutting down...".yellow());

    // Last handle on the oracle is released here, outside the runtime.
    drop(state);

    result
}
