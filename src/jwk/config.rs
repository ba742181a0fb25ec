use std::ops::Deref;
use std::time::Duration;

use url::Url;

/// Substring of `iss` that marks a token as minted by a Cognito user pool.
pub const COGNITO_ISSUER_MARKER: &str = "cognito-idp";

/// Timeout applied to the key-set fetch unless overridden.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Issuer URL of a Cognito user pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issuer(String);

impl Issuer {
    /// Builds `https://cognito-idp.<region>.amazonaws.com/<user_pool_id>`.
    pub fn new(region: impl AsRef<str>, user_pool_id: impl AsRef<str>) -> Issuer {
        let issuer = format!(
            "https://{COGNITO_ISSUER_MARKER}.{}.amazonaws.com/{}",
            region.as_ref(),
            user_pool_id.as_ref()
        );
        Issuer(issuer)
    }
}

impl Deref for Issuer {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

/// Per-call settings for [`TokenVerifier`](super::TokenVerifier).
///
/// Region and user pool id determine both the issuer a Cognito token must
/// carry and the location of the pool's published key set.
#[derive(Debug, Clone)]
pub struct VerificationConfig {
    region: String,
    user_pool_id: String,
    issuer: Issuer,
    jwks_url: Url,
    timeout: Duration,
    strict_issuer: bool,
}

impl VerificationConfig {
    pub(crate) const JWKS_PATH: &str = ".well-known/jwks.json";

    /// Creates a config for the given region and user pool.
    ///
    /// Fails only if the pair does not form a valid URL.
    pub fn new(
        region: impl AsRef<str>,
        user_pool_id: impl AsRef<str>,
    ) -> Result<VerificationConfig, url::ParseError> {
        let issuer = Issuer::new(&region, &user_pool_id);
        let jwks_url = Url::parse(&format!("{}/{}", &*issuer, Self::JWKS_PATH))?;

        Ok(VerificationConfig {
            region: region.as_ref().to_owned(),
            user_pool_id: user_pool_id.as_ref().to_owned(),
            issuer,
            jwks_url,
            timeout: DEFAULT_FETCH_TIMEOUT,
            strict_issuer: false,
        })
    }

    /// Fetches the key set from `url` instead of the pool's well-known location.
    ///
    /// The expected issuer is unaffected.
    #[must_use]
    pub fn with_jwks_url(mut self, url: Url) -> VerificationConfig {
        self.jwks_url = url;
        self
    }

    /// Bounds the key-set fetch by `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> VerificationConfig {
        self.timeout = timeout;
        self
    }

    /// Rejects tokens whose issuer is not a Cognito user pool instead of
    /// accepting them on signature alone.
    #[must_use]
    pub fn with_strict_issuer(mut self, strict: bool) -> VerificationConfig {
        self.strict_issuer = strict;
        self
    }

    /// AWS region of the user pool.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// User pool identifier.
    pub fn user_pool_id(&self) -> &str {
        &self.user_pool_id
    }

    /// Issuer a Cognito token for this pool must carry.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Location of the key set.
    pub fn jwks_url(&self) -> &Url {
        &self.jwks_url
    }

    /// Bound on the key-set fetch.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether non-Cognito issuers are rejected.
    pub fn strict_issuer(&self) -> bool {
        self.strict_issuer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_issuer_and_jwks_url() {
        let config = VerificationConfig::new("us-east-1", "abc123").unwrap();

        assert_eq!(config.region(), "us-east-1");
        assert_eq!(config.user_pool_id(), "abc123");
        assert_eq!(
            config.issuer(),
            "https://cognito-idp.us-east-1.amazonaws.com/abc123"
        );
        assert_eq!(
            config.jwks_url().as_str(),
            "https://cognito-idp.us-east-1.amazonaws.com/abc123/.well-known/jwks.json"
        );
        assert_eq!(config.timeout(), DEFAULT_FETCH_TIMEOUT);
        assert!(!config.strict_issuer());
    }

    #[test]
    fn jwks_override_keeps_issuer() {
        let url = Url::parse("http://127.0.0.1:9999/keys").unwrap();
        let config = VerificationConfig::new("eu-west-1", "pool")
            .unwrap()
            .with_jwks_url(url.clone());

        assert_eq!(config.jwks_url(), &url);
        assert_eq!(
            config.issuer(),
            "https://cognito-idp.eu-west-1.amazonaws.com/pool"
        );
    }

    #[test]
    fn rejects_region_that_breaks_the_url() {
        assert!(VerificationConfig::new("bad host", "pool").is_err());
    }
}
