//! Auth types
//!
//! Token representations shared by the authenticator and its tests.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(token: String, seconds: i64) -> Self {
        let expires_at = Utc::now() + chrono::Duration::seconds(seconds);
        Self {
            token,
            expires_at: Some(expires_at),
        }
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false, // No expiration = valid for the whole run
        }
    }
}

/// Body returned by the OAuth token endpoint
///
/// Every field is optional so that a body lacking `access_token` surfaces as
/// an auth error rather than a JSON error.
#[derive(Debug, Default, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl TokenResponse {
    /// Convert into a cached token, rejecting a missing or empty `access_token`
    pub fn into_cached_token(self) -> Option<CachedToken> {
        let token = self.access_token.filter(|t| !t.trim().is_empty())?;
        Some(match self.expires_in {
            Some(secs) => CachedToken::expires_in(token, secs),
            None => CachedToken::new(token, None),
        })
    }
}
