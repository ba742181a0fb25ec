/// Unified error type for the CLI and library entry points.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Errors that occur during key-set retrieval, signature or claim checks.
    #[error(transparent)]
    VerificationError(#[from] crate::jwk::VerificationError),

    /// Errors returned by the user directory.
    #[error(transparent)]
    DirectoryError(#[from] crate::directory::DirectoryError),

    /// A region, pool id or override did not form a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Command output could not be serialized.
    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}
