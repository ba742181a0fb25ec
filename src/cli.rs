use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::commands;
use crate::Result;

/// Cognito user pool client: create users, log in, refresh sessions and
/// validate tokens.
#[derive(Parser, Debug)]
#[command(name = "cognito-auth")]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Log progress to stderr (`RUST_LOG` takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Subcommands; each maps onto a single call to the identity provider.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new Cognito user
    Create(commands::create::CreateArgs),
    /// Create a login session
    Login(commands::login::LoginArgs),
    /// Refresh an existing access token
    Refresh(commands::refresh::RefreshArgs),
    /// Validate an ID or access token against the user pool's keys
    Validate(commands::validate::ValidateArgs),
}

impl Cli {
    /// Run the CLI command
    pub async fn run(self) -> Result<ExitCode> {
        match self.command {
            Commands::Create(args) => commands::create::run(args).await,
            Commands::Login(args) => commands::login::run(args).await,
            Commands::Refresh(args) => commands::refresh::run(args).await,
            Commands::Validate(args) => commands::validate::run(args).await,
        }
    }
}
