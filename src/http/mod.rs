//! HTTP client module
//!
//! Provides the HTTP client used for every data request.
//!
//! # Features
//!
//! - **Authentication**: Bearer token from the auth module on every request
//! - **Buffered responses**: Body parsed to JSON, headers kept for pagination
//! - **Error classification**: Non-2xx responses become `Error::HttpStatus`

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, JsonResponse, RequestConfig};
