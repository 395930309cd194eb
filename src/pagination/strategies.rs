//! Pagination strategy implementations
//!
//! Each strategy handles a specific pagination pattern.

use super::types::{
    next_page_token, NextPage, PaginationState, Paginator, DEFAULT_MAX_PAGES, PAGE_PARAM,
};
use crate::error::{Error, Result};
use reqwest::header::HeaderMap;
use std::collections::HashMap;
use tracing::{debug, info};

// ============================================================================
// Header Token Pagination
// ============================================================================

/// Header token pagination (Pingboard)
///
/// The response carries the next page token in `X-Next-Page`; it is sent
/// back verbatim as `?page=<token>`.
///
/// The upstream API gives no guarantee that tokens advance, so a token that
/// was already requested fails with `Error::PaginationStalled`, and more than
/// `max_pages` pages fail with `Error::PageLimitExceeded`.
#[derive(Debug, Clone)]
pub struct HeaderTokenPaginator {
    /// Query parameter name for the token
    pub page_param: String,
    /// Maximum number of pages per stream
    pub max_pages: u32,
}

impl Default for HeaderTokenPaginator {
    fn default() -> Self {
        Self {
            page_param: PAGE_PARAM.to_string(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl HeaderTokenPaginator {
    /// Create a paginator with the default parameter name
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page limit
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }
}

impl Paginator for HeaderTokenPaginator {
    fn initial_params(&self, state: &PaginationState) -> HashMap<String, String> {
        let mut params = HashMap::new();
        if let Some(token) = &state.token {
            params.insert(self.page_param.clone(), token.clone());
        }
        params
    }

    fn process_response(
        &self,
        headers: &HeaderMap,
        state: &mut PaginationState,
    ) -> Result<NextPage> {
        state.next_page();

        let Some(token) = next_page_token(headers) else {
            debug!(pages = state.pages, "No next page token, pagination complete");
            state.mark_done();
            return Ok(NextPage::Done);
        };

        if state.pages >= self.max_pages {
            return Err(Error::PageLimitExceeded {
                max_pages: self.max_pages,
            });
        }

        if !state.set_token(token.clone()) {
            return Err(Error::PaginationStalled { token });
        }

        info!(token = %token, "Next page token retrieved");
        Ok(NextPage::with_param(&self.page_param, token))
    }
}

// ============================================================================
// No Pagination
// ============================================================================

/// Single request, no pagination
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPaginator;

impl NoPaginator {
    /// Create a new no-op paginator
    pub fn new() -> Self {
        Self
    }
}

impl Paginator for NoPaginator {
    fn initial_params(&self, _state: &PaginationState) -> HashMap<String, String> {
        HashMap::new()
    }

    fn process_response(
        &self,
        _headers: &HeaderMap,
        state: &mut PaginationState,
    ) -> Result<NextPage> {
        state.next_page();
        state.mark_done();
        Ok(NextPage::Done)
    }

    fn paginates(&self) -> bool {
        false
    }
}
