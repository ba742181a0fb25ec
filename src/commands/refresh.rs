//! Refresh command

use std::process::ExitCode;

use clap::Args;

use super::ClientArgs;
use crate::directory::UserDirectoryService;
use crate::Result;

/// Flags of the `refresh` command.
#[derive(Args, Debug)]
pub struct RefreshArgs {
    /// Cognito refresh token
    #[arg(long = "refresh_token")]
    pub refresh_token: String,

    /// App client and endpoint of the user pool.
    #[command(flatten)]
    pub client: ClientArgs,
}

/// Exchanges the refresh token and prints the new session tokens as JSON.
pub async fn run(args: RefreshArgs) -> Result<ExitCode> {
    let directory = args.client.client()?;
    let tokens = directory
        .initiate_auth_refresh(&args.refresh_token, &args.client.client_id)
        .await?;

    println!("{}", serde_json::to_string_pretty(&tokens)?);
    Ok(ExitCode::SUCCESS)
}
