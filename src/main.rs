//! cognito-auth
//!
//! CLI for Cognito user pools: sign up, log in, refresh and validate tokens.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cognito_auth::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout carries command results only
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            err.exit_code()
        }
    }
}
