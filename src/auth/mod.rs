//! Authentication module
//!
//! Pingboard uses the OAuth2 client-credentials grant. The `Authenticator`
//! fetches a bearer token once and caches it for the rest of the run.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{CachedToken, TokenResponse};

#[cfg(test)]
mod tests;
