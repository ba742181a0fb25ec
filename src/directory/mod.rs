//! Cognito user pool operations used by the `create`, `login` and `refresh`
//! commands. None of them share state with token verification.

mod client;
mod error;

use std::future::Future;

use serde::{Deserialize, Serialize};

pub use client::*;
pub use error::*;

/// A user attribute sent on sign-up, e.g. `name`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserAttribute {
    /// Attribute name.
    pub name: String,
    /// Attribute value.
    pub value: String,
}

impl UserAttribute {
    /// Creates an attribute.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> UserAttribute {
        UserAttribute {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Result of a successful sign-up.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all(deserialize = "PascalCase"))]
pub struct SignUpOutcome {
    /// Whether the user is confirmed without further verification.
    pub user_confirmed: bool,
    /// Unique id of the new user in the pool.
    pub user_sub: String,
}

/// Tokens issued by a successful authentication.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all(deserialize = "PascalCase"))]
pub struct SessionTokens {
    /// Access token for resource servers.
    pub access_token: String,
    /// ID token carrying the user's identity claims.
    pub id_token: String,
    /// Refresh token; absent when the session was itself refreshed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Lifetime of the access and ID tokens in seconds.
    pub expires_in: u64,
    /// Token type, `Bearer`.
    pub token_type: String,
}

/// The three user pool operations the CLI maps its commands onto.
pub trait UserDirectoryService {
    /// Registers `email` with `password` and the given attributes.
    fn sign_up(
        &self,
        email: &str,
        password: &str,
        client_id: &str,
        attributes: &[UserAttribute],
    ) -> impl Future<Output = Result<SignUpOutcome, DirectoryError>> + Send;

    /// Starts a session with username and password.
    fn initiate_auth_password(
        &self,
        email: &str,
        password: &str,
        client_id: &str,
    ) -> impl Future<Output = Result<SessionTokens, DirectoryError>> + Send;

    /// Exchanges a refresh token for fresh ID and access tokens.
    fn initiate_auth_refresh(
        &self,
        refresh_token: &str,
        client_id: &str,
    ) -> impl Future<Output = Result<SessionTokens, DirectoryError>> + Send;
}
