//! # cognito-auth
//!
//! A command-line client for AWS Cognito user pools: create users, log in,
//! refresh sessions, and verify ID/access tokens against the pool's
//! published JWKs.
//!
//! Verification fetches the pool's key set on every call, rebuilds the RSA
//! public key named by the token's `kid`, checks the signature and only then
//! applies the pool's issuer, `token_use` and expiry rules.
//!
//! ## Example
//!
//! ```no_run
//! use cognito_auth::jwk::{TokenVerifier, VerificationConfig};
//!
//! #[tokio::main]
//! async fn main() -> cognito_auth::Result<()> {
//!     let config = VerificationConfig::new("us-east-1", "us-east-1_AbCdEf")?;
//!     let verifier = TokenVerifier::new(config)?;
//!
//!     match verifier.verify("eyJraWQiOi...").await {
//!         Ok(claims) => println!("valid token for {:?}", claims.subject()),
//!         Err(err) => println!("{}: {err}", err.category()),
//!     }
//!     Ok(())
//! }
//! ```

mod claims;
mod cli;
mod error;
mod impls;

pub mod commands;
pub mod directory;
pub mod jwk;

pub use claims::*;
pub use cli::*;
pub use error::*;

/// A crate-wide result type alias using the custom [`Error`] enum.
pub type Result<T> = std::result::Result<T, Error>;
