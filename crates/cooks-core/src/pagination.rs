// ABOUTME: Page-number pagination for listing endpoints
// ABOUTME: Clamps client page sizes to a configured maximum and builds next/previous markers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use crate::constants::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::errors::{AppError, AppResult};

/// Server-side pagination bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Page size used when the client does not specify one
    pub default_page_size: u32,
    /// Largest page size a client may request
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

/// Pagination query parameters as sent by clients
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    /// 1-based page number
    pub page: Option<u32>,
    /// Requested page size
    pub page_size: Option<u32>,
}

/// Validated pagination request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    /// Number of items per page
    pub page_size: u32,
}

impl PageRequest {
    /// Validate a client query against the server bounds
    ///
    /// Page sizes above the maximum are clamped rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the page number or page size is zero
    pub fn from_query(query: PageQuery, config: PaginationConfig) -> AppResult<Self> {
        let page = query.page.unwrap_or(1);
        if page == 0 {
            return Err(AppError::invalid_input("page must be at least 1"));
        }

        let page_size = query.page_size.unwrap_or(config.default_page_size);
        if page_size == 0 {
            return Err(AppError::invalid_input("page_size must be at least 1"));
        }

        Ok(Self {
            page,
            page_size: page_size.min(config.max_page_size),
        })
    }

    /// First page with the default size
    #[must_use]
    pub const fn first(page_size: u32) -> Self {
        Self { page: 1, page_size }
    }

    /// SQL `LIMIT`
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    /// SQL `OFFSET`
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }

    /// Reject pages past the end of the result set
    ///
    /// Page 1 is always valid, even when there are no results.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the page starts beyond `total`
    pub fn ensure_in_range(&self, total: i64) -> AppResult<()> {
        if self.page > 1 && self.offset() >= total {
            return Err(AppError::not_found(format!("Page {}", self.page)));
        }
        Ok(())
    }
}

/// One page of results with navigation markers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of matching items across all pages
    pub count: i64,
    /// Next page number, if any
    pub next: Option<u32>,
    /// Previous page number, if any
    pub previous: Option<u32>,
    /// Items on this page
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Build a page from the fetched items and the total match count
    #[must_use]
    pub fn new(results: Vec<T>, total: i64, request: PageRequest) -> Self {
        let consumed = request.offset() + i64::try_from(results.len()).unwrap_or(i64::MAX);
        let next = (consumed < total).then_some(request.page + 1);
        let previous = (request.page > 1).then(|| request.page - 1);

        Self {
            count: total,
            next,
            previous,
            results,
        }
    }

    /// Convert the items while keeping the navigation markers
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}
