//! Pagination types and traits
//!
//! Defines the core pagination abstractions used by all strategies.

use super::strategies::{NextTokenPaginator, NoPaginator, SeenCountPaginator};
use crate::types::{JsonValue, QueryParams};

/// Where to resume a stream: query parameters for the next request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursor {
    params: QueryParams,
}

impl PageCursor {
    /// Create an empty cursor
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cursor carrying a single parameter
    pub fn with_param(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut params = QueryParams::new();
        params.insert(key.into(), value.into());
        Self { params }
    }

    /// Parameters to merge into the next request
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Check whether the cursor carries anything
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Phase of a stream's page sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationPhase {
    /// No page fetched yet
    Init,
    /// Another page must be fetched
    HasMore,
    /// No further requests for this stream
    Done,
}

/// Counters a strategy reads and updates between pages
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Pages processed so far
    pub pages: usize,
    /// Records seen so far
    pub records_seen: u64,
    /// Items counted by the strategy (e.g. `list` entries) so far
    pub items_seen: u64,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Inspect a page and return the cursor for the next one, if any
    fn next_cursor(
        &self,
        body: &JsonValue,
        records_count: usize,
        state: &mut PaginationState,
    ) -> Option<PageCursor>;
}

/// Configuration for pagination behavior
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PaginationConfig {
    /// Single request
    #[default]
    None,

    /// Total count in the body compared with items seen so far
    SeenCount {
        /// Path to the total item count (e.g. "cnt")
        total_path: String,
        /// Path to the array whose length is counted (e.g. "list")
        items_path: String,
        /// Query parameter carrying the number of items seen
        offset_param: String,
    },

    /// Continuation token read from the body
    NextToken {
        /// Path to the token in the response
        token_path: String,
        /// Query parameter the token is sent as
        cursor_param: String,
    },
}

impl PaginationConfig {
    /// Create seen-count pagination config
    pub fn seen_count(
        total_path: impl Into<String>,
        items_path: impl Into<String>,
        offset_param: impl Into<String>,
    ) -> Self {
        Self::SeenCount {
            total_path: total_path.into(),
            items_path: items_path.into(),
            offset_param: offset_param.into(),
        }
    }

    /// Create next-token pagination config
    pub fn next_token(token_path: impl Into<String>, cursor_param: impl Into<String>) -> Self {
        Self::NextToken {
            token_path: token_path.into(),
            cursor_param: cursor_param.into(),
        }
    }

    /// Build the strategy for this config
    pub fn build(&self) -> Box<dyn Paginator> {
        match self {
            Self::None => Box::new(NoPaginator),
            Self::SeenCount {
                total_path,
                items_path,
                offset_param,
            } => Box::new(SeenCountPaginator::new(
                total_path.clone(),
                items_path.clone(),
                offset_param.clone(),
            )),
            Self::NextToken {
                token_path,
                cursor_param,
            } => Box::new(NextTokenPaginator::new(
                token_path.clone(),
                cursor_param.clone(),
            )),
        }
    }
}
