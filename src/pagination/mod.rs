//! Pagination module
//!
//! Supports: Header token (`X-Next-Page`), no pagination
//!
//! # Overview
//!
//! Each strategy derives the next page's query parameters from a response
//! and tracks when pagination is complete.

mod strategies;
mod types;

pub use strategies::{HeaderTokenPaginator, NoPaginator};
pub use types::{
    next_page_token, NextPage, PaginationState, Paginator, DEFAULT_MAX_PAGES, NEXT_PAGE_HEADER,
    PAGE_PARAM,
};
