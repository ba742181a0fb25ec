//! Login command

use std::process::ExitCode;

use clap::Args;

use super::ClientArgs;
use crate::directory::UserDirectoryService;
use crate::Result;

/// Flags of the `login` command.
#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Email address of the user
    #[arg(long)]
    pub email: String,

    /// Password for the user
    #[arg(long)]
    pub password: String,

    /// App client and endpoint of the user pool.
    #[command(flatten)]
    pub client: ClientArgs,
}

/// Authenticates with email and password and prints the session tokens as JSON.
pub async fn run(args: LoginArgs) -> Result<ExitCode> {
    let directory = args.client.client()?;
    let tokens = directory
        .initiate_auth_password(&args.email, &args.password, &args.client.client_id)
        .await?;

    println!("{}", serde_json::to_string_pretty(&tokens)?);
    Ok(ExitCode::SUCCESS)
}
