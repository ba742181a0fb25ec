use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use email_address::EmailAddress;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

use super::error::{DirectoryError, DirectoryResult};
use super::{SessionTokens, SignUpOutcome, UserAttribute, UserDirectoryService};

/// Requests to the user pool API are bounded by this timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const AMZ_JSON: &str = "application/x-amz-json-1.1";
const TARGET_HEADER: &str = "X-Amz-Target";
const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";

/// Client for the public (unsigned) operations of the Cognito user pool API.
#[derive(Debug, Clone)]
pub struct CognitoClient {
    http_client: reqwest::Client,
    endpoint: Url,
}

impl CognitoClient {
    /// Creates a client for the regional Cognito endpoint.
    pub fn new(region: impl AsRef<str>) -> DirectoryResult<CognitoClient> {
        let endpoint = Url::parse(&format!(
            "https://cognito-idp.{}.amazonaws.com/",
            region.as_ref()
        ))?;
        Self::with_endpoint(endpoint)
    }

    /// Creates a client for a custom endpoint, e.g. a local emulator.
    pub fn with_endpoint(endpoint: Url) -> DirectoryResult<CognitoClient> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(DirectoryError::Client)?;

        Ok(CognitoClient {
            http_client,
            endpoint,
        })
    }

    /// Endpoint requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    #[instrument(skip(self, body), fields(endpoint = %self.endpoint))]
    async fn call<B, R>(&self, operation: &str, body: &B) -> DirectoryResult<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        debug!("Calling user directory");

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, AMZ_JSON)
            .header(TARGET_HEADER, format!("{TARGET_PREFIX}.{operation}"))
            .json(body)
            .send()
            .await
            .map_err(DirectoryError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let failure = response.json::<ServiceFailure>().await.unwrap_or_default();
            let kind = failure
                .kind
                .rsplit('#')
                .next()
                .filter(|kind| !kind.is_empty())
                .unwrap_or("UnknownError")
                .to_owned();
            warn!(%status, kind = %kind, "User directory rejected the request");
            return Err(DirectoryError::Service {
                status,
                kind,
                message: failure.message,
            });
        }

        response
            .json::<R>()
            .await
            .map_err(DirectoryError::InvalidResponse)
    }

    async fn initiate_auth(
        &self,
        flow: &'static str,
        client_id: &str,
        parameters: BTreeMap<&'static str, &str>,
    ) -> DirectoryResult<SessionTokens> {
        let request = InitiateAuthRequest {
            auth_flow: flow,
            client_id,
            auth_parameters: parameters,
        };

        let response: InitiateAuthResponse = self.call("InitiateAuth", &request).await?;

        match (response.authentication_result, response.challenge_name) {
            (Some(tokens), _) => Ok(tokens),
            (None, Some(challenge)) => Err(DirectoryError::ChallengeRequired(challenge)),
            (None, None) => Err(DirectoryError::MissingAuthenticationResult),
        }
    }
}

impl UserDirectoryService for CognitoClient {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        client_id: &str,
        attributes: &[UserAttribute],
    ) -> DirectoryResult<SignUpOutcome> {
        validate_email(email)?;

        let request = SignUpRequest {
            client_id,
            username: email,
            password,
            user_attributes: attributes,
        };

        self.call("SignUp", &request).await
    }

    async fn initiate_auth_password(
        &self,
        email: &str,
        password: &str,
        client_id: &str,
    ) -> DirectoryResult<SessionTokens> {
        validate_email(email)?;

        let parameters = BTreeMap::from([("USERNAME", email), ("PASSWORD", password)]);
        self.initiate_auth("USER_PASSWORD_AUTH", client_id, parameters)
            .await
    }

    async fn initiate_auth_refresh(
        &self,
        refresh_token: &str,
        client_id: &str,
    ) -> DirectoryResult<SessionTokens> {
        let parameters = BTreeMap::from([("REFRESH_TOKEN", refresh_token)]);
        self.initiate_auth("REFRESH_TOKEN_AUTH", client_id, parameters)
            .await
    }
}

fn validate_email(email: &str) -> DirectoryResult<()> {
    EmailAddress::from_str(email)
        .map(|_| ())
        .map_err(|source| DirectoryError::InvalidEmail {
            email: email.to_owned(),
            source,
        })
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SignUpRequest<'a> {
    client_id: &'a str,
    username: &'a str,
    password: &'a str,
    user_attributes: &'a [UserAttribute],
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthRequest<'a> {
    auth_flow: &'static str,
    client_id: &'a str,
    auth_parameters: BTreeMap<&'static str, &'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthResponse {
    #[serde(default)]
    authentication_result: Option<SessionTokens>,
    #[serde(default)]
    challenge_name: Option<String>,
}

#[derive(Default, Deserialize)]
struct ServiceFailure {
    #[serde(default, rename = "__type")]
    kind: String,
    #[serde(default)]
    message: String,
}
