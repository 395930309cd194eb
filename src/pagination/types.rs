//! Pagination types and traits
//!
//! Defines the core pagination abstractions used by all strategies.

use crate::error::Result;
use reqwest::header::HeaderMap;
use std::collections::{HashMap, HashSet};

/// Header carrying the token of the next page
pub const NEXT_PAGE_HEADER: &str = "X-Next-Page";

/// Query parameter the page token is sent back in
pub const PAGE_PARAM: &str = "page";

/// Default upper bound on pages per stream
pub const DEFAULT_MAX_PAGES: u32 = 10_000;

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available with these parameters
    Continue {
        /// Query parameters to add/replace
        query_params: HashMap<String, String>,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Create a continuation with a single parameter
    pub fn with_param(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut params = HashMap::new();
        params.insert(key.into(), value.into());
        Self::Continue {
            query_params: params,
        }
    }

    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue { .. })
    }
}

/// Pagination progress for one stream
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Token to send with the next request
    pub token: Option<String>,
    /// Every token requested so far
    pub seen_tokens: HashSet<String>,
    /// Pages processed
    pub pages: u32,
    /// Whether pagination is complete
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the token for the next page
    ///
    /// Returns `false` if the token was already requested earlier.
    pub fn set_token(&mut self, token: String) -> bool {
        let fresh = self.seen_tokens.insert(token.clone());
        self.token = Some(token);
        fresh
    }

    /// Count a processed page
    pub fn next_page(&mut self) {
        self.pages += 1;
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.token = None;
        self.done = true;
    }
}

/// Trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Query parameters for the next request
    fn initial_params(&self, state: &PaginationState) -> HashMap<String, String>;

    /// Inspect a response and decide whether another page follows
    fn process_response(
        &self,
        headers: &HeaderMap,
        state: &mut PaginationState,
    ) -> Result<NextPage>;

    /// Whether this strategy ever requests more than one page
    fn paginates(&self) -> bool {
        true
    }
}

/// Read the next page token from response headers
///
/// A missing header, a non-UTF-8 value or a blank value all mean there are
/// no more pages.
pub fn next_page_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(NEXT_PAGE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
