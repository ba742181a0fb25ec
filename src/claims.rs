use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Allowed values of the Cognito `token_use` claim.
pub const ALLOWED_TOKEN_USES: [&str; 2] = ["id", "access"];

/// Claims decoded from a token payload.
///
/// Only available to callers once the signature has been verified. Cognito
/// ID and access tokens carry different claim sets, so the payload is kept
/// as a JSON object with typed accessors for the claims verification reads.
/// See: <https://docs.aws.amazon.com/cognito/latest/developerguide/amazon-cognito-user-pools-using-tokens-verifying-a-jwt.html>
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenClaims(Map<String, Value>);

impl TokenClaims {
    /// Issuer (`iss`), when present as a string.
    pub fn issuer(&self) -> Option<&str> {
        self.get_str("iss")
    }

    /// Expiration (`exp`) in seconds since the epoch, when numeric.
    pub fn expiration(&self) -> Option<f64> {
        self.0.get("exp").and_then(Value::as_f64)
    }

    /// Cognito `token_use`, `id` or `access` for well-formed tokens.
    pub fn token_use(&self) -> Option<&str> {
        self.get_str("token_use")
    }

    /// Subject (`sub`), the user's unique id in the pool.
    pub fn subject(&self) -> Option<&str> {
        self.get_str("sub")
    }

    /// Raw claim value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Claim value when it is a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// All claims.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for TokenClaims {
    fn from(claims: Map<String, Value>) -> Self {
        TokenClaims(claims)
    }
}
