//! Authenticator implementation
//!
//! Exchanges client credentials for a bearer token and applies it to requests.

use super::types::{CachedToken, TokenResponse};
use crate::config::Credentials;
use crate::error::{Error, Result};
use reqwest::{Client, RequestBuilder};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Authenticator for the OAuth client-credentials flow
pub struct Authenticator {
    /// Token endpoint URL
    token_url: String,
    /// Client credentials
    credentials: Credentials,
    /// Token cached for the lifetime of this authenticator
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    /// HTTP client for token requests
    http_client: Client,
}

impl Authenticator {
    /// Create a new authenticator
    pub fn new(token_url: impl Into<String>, credentials: Credentials) -> Self {
        Self::with_client(token_url, credentials, Client::new())
    }

    /// Create an authenticator with a custom HTTP client
    pub fn with_client(
        token_url: impl Into<String>,
        credentials: Credentials,
        http_client: Client,
    ) -> Self {
        Self {
            token_url: token_url.into(),
            credentials,
            cached_token: Arc::new(RwLock::new(None)),
            http_client,
        }
    }

    /// Apply the bearer token to a request builder
    pub async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.token().await?;
        Ok(req.bearer_auth(token))
    }

    /// Get a valid token, fetching one if none is cached or it expired
    pub async fn token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut cached = self.cached_token.write().await;

        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let new_token = self.fetch_token().await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token_str)
    }

    /// POST the client credentials to the token endpoint
    async fn fetch_token(&self) -> Result<CachedToken> {
        debug!(url = %self.token_url, "Requesting access token");

        let form = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.token_url)
            .query(&[("grant_type", "client_credentials")])
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::auth(format!("Token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::auth(format!(
                "Token request failed with status {status}: {body}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::auth(format!("Failed to read token response: {e}")))?;
        let token_response: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| Error::auth(format!("Malformed token response: {e}")))?;

        let token = token_response
            .into_cached_token()
            .ok_or_else(|| Error::auth("Token response has no access_token"))?;

        info!("Acquired access token");
        Ok(token)
    }

    /// Clear the cached token, forcing the next call to fetch a new one
    pub async fn clear_cache(&self) {
        let mut cached = self.cached_token.write().await;
        *cached = None;
    }

    /// Whether a token is currently cached
    pub async fn has_token(&self) -> bool {
        self.cached_token.read().await.is_some()
    }

    /// Token endpoint this authenticator talks to
    pub fn token_url(&self) -> &str {
        &self.token_url
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("token_url", &self.token_url)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
