//! Create command

use std::process::ExitCode;

use clap::Args;

use super::ClientArgs;
use crate::directory::{SignUpOutcome, UserAttribute, UserDirectoryService};
use crate::Result;

/// Flags of the `create` command.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Email address of the user
    #[arg(long)]
    pub email: String,

    /// Password for the user
    #[arg(long)]
    pub password: String,

    /// Full name of the user
    #[arg(long)]
    pub name: String,

    /// Extra user attribute as NAME=VALUE; may be repeated
    #[arg(long = "attribute", value_name = "NAME=VALUE", value_parser = parse_attribute)]
    pub attributes: Vec<UserAttribute>,

    /// App client and endpoint of the user pool.
    #[command(flatten)]
    pub client: ClientArgs,
}

/// Registers the user and prints the new user's id.
pub async fn run(args: CreateArgs) -> Result<ExitCode> {
    let directory = args.client.client()?;
    let outcome = create(&directory, &args).await?;

    println!("Success");
    println!(
        "user sub: {} (confirmed: {})",
        outcome.user_sub, outcome.user_confirmed
    );
    Ok(ExitCode::SUCCESS)
}

async fn create(
    directory: &impl UserDirectoryService,
    args: &CreateArgs,
) -> Result<SignUpOutcome> {
    let attributes: Vec<UserAttribute> = std::iter::once(UserAttribute::new("name", &args.name))
        .chain(args.attributes.iter().cloned())
        .collect();

    let outcome = directory
        .sign_up(&args.email, &args.password, &args.client.client_id, &attributes)
        .await?;
    Ok(outcome)
}

fn parse_attribute(raw: &str) -> std::result::Result<UserAttribute, String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok(UserAttribute::new(name.trim(), value))
        }
        _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{DirectoryError, SessionTokens};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingDirectory {
        sign_ups: Mutex<Vec<(String, Vec<UserAttribute>)>>,
    }

    impl UserDirectoryService for RecordingDirectory {
        async fn sign_up(
            &self,
            email: &str,
            _password: &str,
            _client_id: &str,
            attributes: &[UserAttribute],
        ) -> std::result::Result<SignUpOutcome, DirectoryError> {
            self.sign_ups
                .lock()
                .unwrap()
                .push((email.to_owned(), attributes.to_vec()));
            Ok(SignUpOutcome {
                user_confirmed: false,
                user_sub: "sub-1".into(),
            })
        }

        async fn initiate_auth_password(
            &self,
            _email: &str,
            _password: &str,
            _client_id: &str,
        ) -> std::result::Result<SessionTokens, DirectoryError> {
            unreachable!("create never logs in")
        }

        async fn initiate_auth_refresh(
            &self,
            _refresh_token: &str,
            _client_id: &str,
        ) -> std::result::Result<SessionTokens, DirectoryError> {
            unreachable!("create never refreshes")
        }
    }

    fn args(attributes: Vec<UserAttribute>) -> CreateArgs {
        CreateArgs {
            email: "jane@example.com".into(),
            password: "Secret123!".into(),
            name: "Jane Doe".into(),
            attributes,
            client: ClientArgs {
                client_id: "client".into(),
                region: "us-east-1".into(),
                endpoint: None,
            },
        }
    }

    #[tokio::test]
    async fn sends_name_before_extra_attributes() {
        let directory = RecordingDirectory::default();
        let extra = vec![UserAttribute::new("locale", "en-GB")];

        let outcome = create(&directory, &args(extra)).await.unwrap();

        assert_eq!(outcome.user_sub, "sub-1");
        let sign_ups = directory.sign_ups.lock().unwrap();
        assert_eq!(
            sign_ups.as_slice(),
            &[(
                "jane@example.com".to_owned(),
                vec![
                    UserAttribute::new("name", "Jane Doe"),
                    UserAttribute::new("locale", "en-GB")
                ]
            )]
        );
    }

    #[test]
    fn parses_attributes() {
        assert_eq!(
            parse_attribute("custom:team=platform=core").unwrap(),
            UserAttribute::new("custom:team", "platform=core")
        );
        assert_eq!(
            parse_attribute("nickname=").unwrap(),
            UserAttribute::new("nickname", "")
        );
        assert!(parse_attribute("=value").is_err());
        assert!(parse_attribute("missing").is_err());
    }
}
