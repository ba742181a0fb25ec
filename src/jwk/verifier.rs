use std::time::{SystemTime, UNIX_EPOCH};

use base64::prelude::BASE64_URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::Algorithm;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use super::config::{VerificationConfig, COGNITO_ISSUER_MARKER};
use super::error::{VerificationError, VerificationResult};
use super::fetcher::KeySetFetcher;
use super::key::{KeySet, RsaPublicKey};
use crate::claims::{TokenClaims, ALLOWED_TOKEN_USES};

/// Verifies Cognito ID and access tokens against the pool's published keys.
///
/// Each call fetches the key set afresh, so a verifier holds no state
/// besides its configuration and can be shared between tasks.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    config: VerificationConfig,
    fetcher: KeySetFetcher,
}

impl TokenVerifier {
    /// Creates a verifier; fails only if the HTTP client cannot be built.
    pub fn new(config: VerificationConfig) -> VerificationResult<TokenVerifier> {
        let fetcher = KeySetFetcher::new(config.timeout())?;
        Ok(TokenVerifier { config, fetcher })
    }

    /// Pool this verifier checks tokens against.
    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    /// Verifies `token` and returns its claims.
    ///
    /// Steps run in order and the first failure is returned: key-set fetch,
    /// structural parse, key selection, signature, then claims. Claims are
    /// never inspected before the signature has been checked.
    #[instrument(skip_all, fields(issuer = %self.config.issuer()))]
    pub async fn verify(&self, token: &str) -> VerificationResult<TokenClaims> {
        let keys = self.fetcher.fetch(self.config.jwks_url()).await?;
        let token = UnverifiedToken::parse(token)?;
        let claims = Self::verify_signature(token, &keys)?;
        self.validate_claims(&claims, unix_now())?;

        debug!(sub = claims.subject(), "Token verified");
        Ok(claims)
    }

    fn verify_signature(
        token: UnverifiedToken<'_>,
        keys: &KeySet,
    ) -> VerificationResult<TokenClaims> {
        let algorithm = token.algorithm()?;
        let kid = token.kid()?;

        let Some(jwk) = keys.get(kid) else {
            return Err(VerificationError::UnknownKey(kid.to_owned()));
        };

        let decoding_key = RsaPublicKey::from_jwk(jwk)?.decoding_key();

        let valid = jsonwebtoken::crypto::verify(
            token.signature,
            token.signing_input.as_bytes(),
            &decoding_key,
            algorithm,
        )
        .map_err(|_| VerificationError::SignatureInvalid)?;

        if !valid {
            return Err(VerificationError::SignatureInvalid);
        }

        Ok(TokenClaims::from(token.payload))
    }

    /// Applies the issuer, usage and expiry rules to verified claims.
    ///
    /// Pool rules only apply to issuers carrying the Cognito marker unless
    /// strict issuer checking is enabled.
    fn validate_claims(&self, claims: &TokenClaims, now: i64) -> VerificationResult<()> {
        let Some(issuer) = claims.issuer() else {
            return Err(self.issuer_mismatch(""));
        };

        if !issuer.contains(COGNITO_ISSUER_MARKER) {
            if self.config.strict_issuer() {
                return Err(self.issuer_mismatch(issuer));
            }
            debug!(issuer, "Issuer is not a Cognito user pool, skipping pool checks");
            return Ok(());
        }

        if issuer != self.config.issuer() {
            return Err(self.issuer_mismatch(issuer));
        }

        match claims.token_use() {
            Some(token_use) if ALLOWED_TOKEN_USES.contains(&token_use) => {}
            _ => return Err(VerificationError::InvalidTokenUse),
        }

        let Some(exp) = claims.expiration() else {
            return Err(VerificationError::TokenExpired);
        };

        #[expect(clippy::cast_possible_truncation, reason = "exp is whole seconds")]
        let exp = exp as i64;
        if exp <= now {
            return Err(VerificationError::TokenExpired);
        }

        Ok(())
    }

    fn issuer_mismatch(&self, found: &str) -> VerificationError {
        VerificationError::IssuerMismatch {
            expected: self.config.issuer().to_owned(),
            found: found.to_owned(),
        }
    }
}

/// Verifies `token` against the pool described by `config`.
pub async fn verify(token: &str, config: &VerificationConfig) -> VerificationResult<TokenClaims> {
    TokenVerifier::new(config.clone())?.verify(token).await
}

/// Compact token split into its parts, nothing trusted yet.
#[derive(Debug)]
struct UnverifiedToken<'a> {
    signing_input: &'a str,
    signature: &'a str,
    header: Map<String, Value>,
    payload: Map<String, Value>,
}

impl<'a> UnverifiedToken<'a> {
    fn parse(token: &'a str) -> VerificationResult<UnverifiedToken<'a>> {
        let malformed =
            || VerificationError::TokenFormat("expected three dot-separated segments".to_owned());

        let (signing_input, signature) = token.rsplit_once('.').ok_or_else(malformed)?;
        let (header, payload) = signing_input.split_once('.').ok_or_else(malformed)?;
        if payload.contains('.') {
            return Err(malformed());
        }

        Ok(UnverifiedToken {
            signing_input,
            signature,
            header: decode_segment(header, "header")?,
            payload: decode_segment(payload, "payload")?,
        })
    }

    fn algorithm(&self) -> VerificationResult<Algorithm> {
        match self.header.get("alg") {
            Some(Value::String(alg)) => match alg.as_str() {
                "RS256" => Ok(Algorithm::RS256),
                "RS384" => Ok(Algorithm::RS384),
                "RS512" => Ok(Algorithm::RS512),
                _ => Err(VerificationError::UnsupportedAlgorithm(alg.clone())),
            },
            Some(other) => Err(VerificationError::UnsupportedAlgorithm(other.to_string())),
            None => Err(VerificationError::UnsupportedAlgorithm("missing".to_owned())),
        }
    }

    fn kid(&self) -> VerificationResult<&str> {
        self.header
            .get("kid")
            .and_then(Value::as_str)
            .ok_or(VerificationError::MissingKeyId)
    }
}

fn decode_segment(segment: &str, name: &str) -> VerificationResult<Map<String, Value>> {
    let bytes = BASE64_URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| VerificationError::TokenFormat(format!("{name} is not base64url")))?;

    serde_json::from_slice(&bytes)
        .map_err(|_| VerificationError::TokenFormat(format!("{name} is not a JSON object")))
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
}
