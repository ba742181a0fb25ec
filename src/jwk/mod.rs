//! Verification of Cognito ID and access tokens against the user pool's
//! published JSON Web Keys.

mod config;
mod error;
mod fetcher;
mod key;
mod verifier;

pub use error::*;

pub use config::*;
pub use fetcher::*;
pub use key::*;
pub use verifier::*;
