use std::time::Duration;

use tracing::{debug, instrument, warn};
use url::Url;

use super::error::PublicKeysError;
use super::key::{KeyResponse, KeySet};

/// Fetches a published key set over HTTP.
///
/// Every call goes to the network; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct KeySetFetcher {
    http_client: reqwest::Client,
}

impl KeySetFetcher {
    /// Creates a fetcher whose requests are bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<KeySetFetcher, PublicKeysError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(PublicKeysError::Client)?;

        Ok(KeySetFetcher { http_client })
    }

    /// Downloads and decodes the key set at `url`.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn fetch(&self, url: &Url) -> Result<KeySet, PublicKeysError> {
        debug!("Fetching JWKs");

        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, "Failed to fetch JWKs");
                PublicKeysError::FetchPublicKeys(err)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "JWKs endpoint returned an error");
            return Err(PublicKeysError::UnexpectedStatus(status));
        }

        let public_keys = response
            .json::<KeyResponse>()
            .await
            .map_err(PublicKeysError::PublicKeyParseError)?;

        let keys = KeySet::from(public_keys);
        debug!(count = keys.len(), "Fetched JWKs");
        Ok(keys)
    }
}
