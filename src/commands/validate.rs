//! Validate command

use std::process::ExitCode;
use std::time::Duration;

use clap::Args;
use url::Url;

use crate::jwk::{TokenVerifier, VerificationConfig, VerificationError, DEFAULT_FETCH_TIMEOUT};
use crate::{Result, TokenClaims};

/// Flags of the `validate` command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// JWT token
    #[arg(long)]
    pub token: String,

    /// ID of the Cognito user pool
    #[arg(long = "userpoolid", env = "COGNITO_USER_POOL_ID")]
    pub user_pool_id: String,

    /// AWS region the Cognito user pool resides in
    #[arg(long, env = "AWS_REGION")]
    pub region: String,

    /// Fetch keys from this URL instead of the pool's well-known location
    #[arg(long, env = "COGNITO_JWKS_URL")]
    pub jwks_url: Option<Url>,

    /// Reject tokens whose issuer is not a Cognito user pool
    #[arg(long)]
    pub strict_issuer: bool,

    /// Seconds to wait for the key set
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_FETCH_TIMEOUT.as_secs())]
    pub timeout: u64,
}

impl ValidateArgs {
    fn config(&self) -> Result<VerificationConfig> {
        let mut config = VerificationConfig::new(&self.region, &self.user_pool_id)?
            .with_timeout(Duration::from_secs(self.timeout))
            .with_strict_issuer(self.strict_issuer);
        if let Some(url) = &self.jwks_url {
            config = config.with_jwks_url(url.clone());
        }
        Ok(config)
    }
}

/// Verifies the token and prints whether it is valid.
///
/// A rejected token is a normal outcome: it is reported on stdout with its
/// failure category and reflected in the exit status only.
pub async fn run(args: ValidateArgs) -> Result<ExitCode> {
    let verifier = TokenVerifier::new(args.config()?)?;
    let result = verifier.verify(&args.token).await;

    println!("{}", report(&result));
    Ok(match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => ExitCode::from(err.exit_status()),
    })
}

fn report(result: &std::result::Result<TokenClaims, VerificationError>) -> String {
    match result {
        Ok(_) => "Token is valid".to_owned(),
        Err(err) => format!("Token is NOT valid ({}): {err}", err.category()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwk::PublicKeysError;

    fn args() -> ValidateArgs {
        ValidateArgs {
            token: "a.b.c".into(),
            user_pool_id: "abc123".into(),
            region: "us-east-1".into(),
            jwks_url: None,
            strict_issuer: false,
            timeout: 3,
        }
    }

    #[test]
    fn builds_config_from_flags() {
        let mut args = args();
        args.strict_issuer = true;
        args.jwks_url = Some(Url::parse("http://localhost:8080/keys").unwrap());

        let config = args.config().unwrap();
        assert_eq!(
            config.issuer(),
            "https://cognito-idp.us-east-1.amazonaws.com/abc123"
        );
        assert_eq!(config.jwks_url().as_str(), "http://localhost:8080/keys");
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert!(config.strict_issuer());
    }

    #[test]
    fn invalid_region_is_a_usage_error() {
        let mut args = args();
        args.region = "not a region".into();
        assert!(matches!(args.config(), Err(crate::Error::InvalidUrl(_))));
    }

    #[test]
    fn reports_valid_token() {
        assert_eq!(report(&Ok(TokenClaims::default())), "Token is valid");
    }

    #[test]
    fn reports_failure_category() {
        let expired = report(&Err(VerificationError::TokenExpired));
        assert_eq!(expired, "Token is NOT valid (TokenExpiredError): Token is expired");

        let unreachable = report(&Err(VerificationError::KeyFetch(
            PublicKeysError::UnexpectedStatus(reqwest::StatusCode::NOT_FOUND),
        )));
        assert!(
            unreachable.starts_with("Token is NOT valid (KeyFetchError): "),
            "got {unreachable}"
        );
    }
}
