use thiserror::Error;

pub(super) type DirectoryResult<T> = std::result::Result<T, DirectoryError>;

/// Errors returned by the user directory client.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The username is not a valid email address.
    #[error("invalid email address '{email}': {source}")]
    InvalidEmail {
        /// Rejected input.
        email: String,
        /// Parser diagnosis.
        #[source]
        source: email_address::Error,
    },

    /// The directory endpoint is not a valid URL.
    #[error("invalid user directory endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// The HTTP client could not be built.
    #[error("failed to build the HTTP client: {0}")]
    Client(reqwest::Error),

    /// The request did not complete.
    #[error("request to the user directory failed: {0}")]
    Request(reqwest::Error),

    /// The service rejected the request.
    #[error("{kind} ({status}): {message}")]
    Service {
        /// HTTP status of the response.
        status: reqwest::StatusCode,
        /// Exception name, e.g. `NotAuthorizedException`.
        kind: String,
        /// Human readable explanation from the service.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("unexpected response from the user directory: {0}")]
    InvalidResponse(reqwest::Error),

    /// The pool requires a challenge round trip this client does not perform.
    #[error("authentication requires answering the '{0}' challenge")]
    ChallengeRequired(String),

    /// The service answered without tokens or a challenge.
    #[error("the user directory returned no authentication result")]
    MissingAuthenticationResult,
}
