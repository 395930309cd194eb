//! Tap configuration
//!
//! The configuration is read once at startup from a JSON (or YAML) file and
//! is immutable afterwards. Required keys are checked before anything
//! touches the network.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

/// Keys that must be present and non-empty in every config file
pub const REQUIRED_CONFIG_KEYS: [&str; 3] = ["start_date", "client_id", "client_secret"];

/// Default Pingboard REST API root
pub const DEFAULT_API_URL: &str = "https://app.pingboard.com/api/v2";

/// Default Pingboard OAuth token endpoint
pub const DEFAULT_TOKEN_URL: &str = "https://app.pingboard.com/oauth/token";

/// Client credentials used for the token exchange
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Complete tap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TapConfig {
    /// OAuth client credentials
    #[serde(flatten)]
    pub credentials: Credentials,

    /// Earliest point of interest for the sync
    #[serde(deserialize_with = "deserialize_start_date")]
    pub start_date: DateTime<Utc>,

    /// API root all stream paths are relative to
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// OAuth token endpoint
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Page size requested from the users endpoint
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Upper bound on pages fetched per stream
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_page_size() -> u32 {
    1000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_pages() -> u32 {
    10_000
}

fn deserialize_start_date<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_start_date(&raw).map_err(serde::de::Error::custom)
}

/// Parse a start date given either as RFC 3339 or as a plain `YYYY-MM-DD` date
pub fn parse_start_date(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("'{raw}' is neither an RFC 3339 timestamp nor a YYYY-MM-DD date"))
}

impl TapConfig {
    /// Load the configuration from a file; `.yaml`/`.yml` files are parsed as YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file: {e}")))?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        let value: Value = if is_yaml {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)
                .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?
        };

        Self::from_value(value)
    }

    /// Build the configuration from an already parsed JSON document
    pub fn from_value(value: Value) -> Result<Self> {
        let Some(object) = value.as_object() else {
            return Err(Error::config("Config must be a JSON object"));
        };

        for key in REQUIRED_CONFIG_KEYS {
            match object.get(key) {
                None | Some(Value::Null) => return Err(Error::missing_field(key)),
                Some(Value::String(s)) if s.trim().is_empty() => {
                    return Err(Error::missing_field(key))
                }
                Some(_) => {}
            }
        }

        let config: TapConfig = serde_json::from_value(value)
            .map_err(|e| Error::config(format!("Invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be greater than zero"));
        }
        if self.max_pages == 0 {
            return Err(Error::invalid_value("max_pages", "must be greater than zero"));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::invalid_value(
                "request_timeout_secs",
                "must be greater than zero",
            ));
        }
        url::Url::parse(&self.api_url)
            .map_err(|e| Error::invalid_value("api_url", e.to_string()))?;
        url::Url::parse(&self.token_url)
            .map_err(|e| Error::invalid_value("token_url", e.to_string()))?;
        Ok(())
    }

    /// Request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
