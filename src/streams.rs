//! Stream descriptors
//!
//! Everything that differs between streams lives in a `StreamDescriptor`;
//! one generic driver syncs any of them.

use crate::config::TapConfig;
use crate::error::{Error, Result};
use crate::normalize::RecordTransform;
use crate::pagination::{HeaderTokenPaginator, NoPaginator, Paginator};
use crate::types::{ReplicationMethod, StringMap};

/// Replication key shared by every stream
pub const REPLICATION_KEY: &str = "updated_at";

/// Side-loaded resources requested with users
pub const USERS_INCLUDE: &str = "departments,locations,groups,statuses";

/// Page size used for groups
pub const GROUPS_PAGE_SIZE: u32 = 3000;

/// Static description of one stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDescriptor {
    /// Stream name (also the schema and catalog id)
    pub name: String,
    /// Path relative to the API root
    pub path: String,
    /// Query parameters sent with every page
    pub query: StringMap,
    /// Dotted key path of the rows in the response
    pub response_key: Option<String>,
    /// Primary key fields
    pub primary_keys: Vec<String>,
    /// Field the stream is ordered by
    pub replication_key: Option<String>,
    /// Whether pages are followed through `X-Next-Page`
    pub paginated: bool,
    /// Per-page record transform
    pub transform: RecordTransform,
}

impl StreamDescriptor {
    /// The `users` stream
    pub fn users(page_size: u32) -> Self {
        let mut query = StringMap::new();
        query.insert("include".to_string(), USERS_INCLUDE.to_string());
        query.insert("page_size".to_string(), page_size.to_string());

        Self {
            name: "users".to_string(),
            path: "/users".to_string(),
            query,
            response_key: Some("users".to_string()),
            primary_keys: vec!["id".to_string()],
            replication_key: Some(REPLICATION_KEY.to_string()),
            paginated: true,
            transform: RecordTransform::Users,
        }
    }

    /// The `groups` stream
    pub fn groups() -> Self {
        let mut query = StringMap::new();
        query.insert("page_size".to_string(), GROUPS_PAGE_SIZE.to_string());

        Self {
            name: "groups".to_string(),
            path: "/groups".to_string(),
            query,
            response_key: Some("groups".to_string()),
            primary_keys: vec!["id".to_string()],
            replication_key: Some(REPLICATION_KEY.to_string()),
            paginated: true,
            transform: RecordTransform::Passthrough,
        }
    }

    /// Every stream the tap knows, in sync order
    pub fn all(config: &TapConfig) -> Vec<Self> {
        vec![Self::users(config.page_size), Self::groups()]
    }

    /// Look a stream up by name
    pub fn find(config: &TapConfig, name: &str) -> Result<Self> {
        Self::all(config)
            .into_iter()
            .find(|d| d.name == name)
            .ok_or_else(|| Error::StreamNotFound {
                stream: name.to_string(),
            })
    }

    /// Replication method implied by the replication key
    pub fn replication_method(&self) -> ReplicationMethod {
        ReplicationMethod::for_key(self.replication_key.as_deref())
    }

    /// Paginator for this stream
    pub fn paginator(&self, max_pages: u32) -> Box<dyn Paginator> {
        if self.paginated {
            Box::new(HeaderTokenPaginator::new().with_max_pages(max_pages))
        } else {
            Box::new(NoPaginator::new())
        }
    }
}
