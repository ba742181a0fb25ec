//! CLI subcommands.

pub mod create;
pub mod login;
pub mod refresh;
pub mod validate;

use clap::Args;
use url::Url;

use crate::directory::CognitoClient;
use crate::Result;

/// Flags shared by the commands that talk to the user pool API.
#[derive(Args, Debug)]
pub struct ClientArgs {
    /// App client id of the user pool
    #[arg(long = "clientid", env = "COGNITO_CLIENT_ID")]
    pub client_id: String,

    /// AWS region the user pool resides in
    #[arg(long, env = "AWS_REGION")]
    pub region: String,

    /// Send requests here instead of the regional endpoint
    #[arg(long, env = "COGNITO_ENDPOINT")]
    pub endpoint: Option<Url>,
}

impl ClientArgs {
    pub(crate) fn client(&self) -> Result<CognitoClient> {
        let client = match &self.endpoint {
            Some(endpoint) => CognitoClient::with_endpoint(endpoint.clone())?,
            None => CognitoClient::new(&self.region)?,
        };
        Ok(client)
    }
}
