use thiserror::Error;

pub(super) type VerificationResult<T> = std::result::Result<T, VerificationError>;

/// Errors that can occur during token verification.
///
/// Variants are mutually exclusive and appear in the order the verifier
/// checks them.
#[derive(Debug, Error)]
pub enum VerificationError {
    /// The key set could not be fetched or decoded.
    #[error(transparent)]
    KeyFetch(#[from] PublicKeysError),

    /// The token is not a three-segment compact serialization with JSON
    /// header and payload.
    #[error("Malformed token: {0}")]
    TokenFormat(String),

    /// The header names an algorithm other than an RSA signature.
    #[error("Unsupported signing algorithm '{0}'")]
    UnsupportedAlgorithm(String),

    /// The token is missing the `kid` header.
    #[error("Missing 'kid' header in token")]
    MissingKeyId,

    /// No matching key was found for the specified `kid`.
    #[error("No matching public key found for kid '{0}'")]
    UnknownKey(String),

    /// The token signature could not be verified.
    #[error("Invalid signature")]
    SignatureInvalid,

    /// The `iss` claim is absent or does not name the configured user pool.
    #[error("Issuer mismatch: expected '{expected}', found '{found}'")]
    IssuerMismatch {
        /// Issuer of the configured user pool.
        expected: String,
        /// Issuer carried by the token, empty when absent.
        found: String,
    },

    /// The `token_use` claim is absent or neither `id` nor `access`.
    #[error("Token is not an id or access token")]
    InvalidTokenUse,

    /// The `exp` claim is absent, not numeric, or not in the future.
    #[error("Token is expired")]
    TokenExpired,
}

impl VerificationError {
    /// Name of the failure category, suitable for operator-facing output.
    pub fn category(&self) -> &'static str {
        match self {
            VerificationError::KeyFetch(_) => "KeyFetchError",
            VerificationError::TokenFormat(_) => "TokenFormatError",
            VerificationError::UnsupportedAlgorithm(_) => "UnsupportedAlgorithmError",
            VerificationError::MissingKeyId => "MissingKeyIdError",
            VerificationError::UnknownKey(_) => "UnknownKeyError",
            VerificationError::SignatureInvalid => "SignatureInvalidError",
            VerificationError::IssuerMismatch { .. } => "IssuerMismatchError",
            VerificationError::InvalidTokenUse => "InvalidTokenUseError",
            VerificationError::TokenExpired => "TokenExpiredError",
        }
    }
}

/// Failures retrieving or decoding the published key set.
#[derive(Debug, Error)]
pub enum PublicKeysError {
    /// The HTTP client could not be built.
    #[error("failed to build the HTTP client: {0}")]
    Client(reqwest::Error),

    /// The request failed or timed out.
    #[error("failed to fetch public keys from the identity provider: {0}")]
    FetchPublicKeys(reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("the identity provider answered the key set request with status {0}")]
    UnexpectedStatus(reqwest::StatusCode),

    /// The body is not a key-set document.
    #[error("failed to parse one or more public keys: {0}")]
    PublicKeyParseError(reqwest::Error),

    /// The selected key's `n` or `e` is not a usable RSA component.
    #[error("key '{kid}' has undecodable {component}")]
    InvalidKeyMaterial {
        /// Key id of the offending key.
        kid: String,
        /// `modulus` or `exponent`.
        component: &'static str,
    },
}
