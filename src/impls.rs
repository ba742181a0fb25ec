use std::process::ExitCode;

use crate::directory::DirectoryError;
use crate::jwk::VerificationError;
use crate::Error;

/// Token was checked and rejected.
const EXIT_INVALID: u8 = 1;
/// The identity provider could not be reached or answered badly.
const EXIT_UPSTREAM: u8 = 2;
/// Credentials or request rejected by the identity provider.
const EXIT_REJECTED: u8 = 3;
/// Bad command line input (sysexits `EX_USAGE`).
const EXIT_USAGE: u8 = 64;

impl Error {
    /// Process exit status reported for this error.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }

    pub(crate) fn exit_status(&self) -> u8 {
        match self {
            Error::VerificationError(err) => err.exit_status(),

            Error::DirectoryError(err) => match err {
                DirectoryError::InvalidEmail { .. } | DirectoryError::InvalidEndpoint(_) => {
                    EXIT_USAGE
                }
                DirectoryError::Service { status, .. } if status.is_client_error() => {
                    // Bad password, unknown user, existing user, policy violations
                    EXIT_REJECTED
                }
                DirectoryError::ChallengeRequired(_) => EXIT_REJECTED,
                DirectoryError::Client(_)
                | DirectoryError::Request(_)
                | DirectoryError::Service { .. }
                | DirectoryError::InvalidResponse(_)
                | DirectoryError::MissingAuthenticationResult => EXIT_UPSTREAM,
            },

            Error::InvalidUrl(_) => EXIT_USAGE,
            Error::Output(_) => EXIT_UPSTREAM,
        }
    }
}

impl VerificationError {
    pub(crate) fn exit_status(&self) -> u8 {
        match self {
            // Nothing was decided about the token itself
            VerificationError::KeyFetch(_) => EXIT_UPSTREAM,

            VerificationError::TokenFormat(_)
            | VerificationError::UnsupportedAlgorithm(_)
            | VerificationError::MissingKeyId
            | VerificationError::UnknownKey(_)
            | VerificationError::SignatureInvalid
            | VerificationError::IssuerMismatch { .. }
            | VerificationError::InvalidTokenUse
            | VerificationError::TokenExpired => EXIT_INVALID,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwk::PublicKeysError;

    #[test]
    fn rejected_tokens_exit_with_one() {
        for err in [
            VerificationError::MissingKeyId,
            VerificationError::SignatureInvalid,
            VerificationError::TokenExpired,
        ] {
            assert_eq!(Error::from(err).exit_status(), EXIT_INVALID);
        }
    }

    #[test]
    fn key_fetch_failures_are_upstream_errors() {
        let err = VerificationError::KeyFetch(PublicKeysError::UnexpectedStatus(
            reqwest::StatusCode::NOT_FOUND,
        ));
        assert_eq!(err.exit_status(), EXIT_UPSTREAM);
    }

    #[test]
    fn directory_errors_by_cause() {
        let rejected = DirectoryError::Service {
            status: reqwest::StatusCode::BAD_REQUEST,
            kind: "UsernameExistsException".into(),
            message: "User already exists".into(),
        };
        let unavailable = DirectoryError::Service {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            kind: "InternalErrorException".into(),
            message: String::new(),
        };

        assert_eq!(Error::from(rejected).exit_status(), EXIT_REJECTED);
        assert_eq!(Error::from(unavailable).exit_status(), EXIT_UPSTREAM);
        assert_eq!(
            Error::from(url::ParseError::EmptyHost).exit_status(),
            EXIT_USAGE
        );
    }
}
