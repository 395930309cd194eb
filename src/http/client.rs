//! HTTP client for the Pingboard API
//!
//! Provides a small HTTP client that handles:
//! - Base URL joining and URL validation
//! - Bearer authentication through the `Authenticator`
//! - Buffering the full JSON body together with the response headers
//! - Mapping non-2xx responses to `Error::HttpStatus`
//!
//! No retries: one failed request aborts the run.

use crate::auth::Authenticator;
use crate::error::{Error, Result};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for all requests
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            user_agent: format!("tap-pingboard/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters
    pub query: HashMap<String, String>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }
}

/// A fully buffered JSON response
#[derive(Debug, Clone)]
pub struct JsonResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Response headers (pagination tokens live here)
    pub headers: HeaderMap,
    /// Parsed body
    pub body: Value,
}

/// HTTP client with optional bearer authentication
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Option<Authenticator>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            config,
            authenticator: None,
        })
    }

    /// Create a client whose requests carry the authenticator's bearer token
    pub fn with_auth(config: HttpClientConfig, authenticator: Authenticator) -> Result<Self> {
        let mut client = Self::with_config(config)?;
        client.authenticator = Some(authenticator);
        Ok(client)
    }

    /// Make sure a bearer token is available before the first data request
    ///
    /// A client without an authenticator has nothing to do here.
    pub async fn authenticate(&self) -> Result<()> {
        if let Some(auth) = &self.authenticator {
            auth.token().await?;
        }
        Ok(())
    }

    /// Make a GET request and buffer the JSON body
    pub async fn get_json(&self, url: &str, config: RequestConfig) -> Result<JsonResponse> {
        self.request_json(Method::GET, url, config).await
    }

    /// Make a request and buffer the JSON body
    pub async fn request_json(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<JsonResponse> {
        let full_url = self.build_url(url)?;

        let mut req = self.client.request(method.clone(), full_url.clone());

        if !config.query.is_empty() {
            req = req.query(&config.query);
        }

        if let Some(ref auth) = self.authenticator {
            req = auth.apply(req).await?;
        }

        debug!(%method, url = %full_url, query = ?config.query, "Sending request");
        let response = req.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let headers = response.headers().clone();
        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text)
            .map_err(|e| Error::decode(format!("Failed to parse JSON from {full_url}: {e}")))?;

        debug!(status = status.as_u16(), bytes = text.len(), "Request succeeded");
        Ok(JsonResponse {
            status,
            headers,
            body,
        })
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> Result<url::Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(url::Url::parse(path)?);
        }

        let joined = match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => path.to_string(),
        };
        Ok(url::Url::parse(&joined)?)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_authenticator", &self.authenticator.is_some())
            .finish_non_exhaustive()
    }
}
