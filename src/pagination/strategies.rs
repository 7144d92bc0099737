//! Pagination strategy implementations
//!
//! Each strategy handles a specific continuation signal.

use super::types::{PageCursor, PaginationState, Paginator};
use crate::extract::lookup;
use crate::types::JsonValue;

// ============================================================================
// Seen-Count Pagination
// ============================================================================

/// Total-count pagination (e.g. the 5 day / 3 hour forecast)
///
/// The body reports a total (`cnt`) and carries a page of items (`list`).
/// While fewer items have been seen than the total, the next request asks
/// for the items after those already seen.
#[derive(Debug, Clone)]
pub struct SeenCountPaginator {
    /// Path to the total item count
    pub total_path: String,
    /// Path to the counted array
    pub items_path: String,
    /// Query parameter for the number of items seen
    pub offset_param: String,
}

impl SeenCountPaginator {
    /// Create a new seen-count paginator
    pub fn new(
        total_path: impl Into<String>,
        items_path: impl Into<String>,
        offset_param: impl Into<String>,
    ) -> Self {
        Self {
            total_path: total_path.into(),
            items_path: items_path.into(),
            offset_param: offset_param.into(),
        }
    }
}

impl Paginator for SeenCountPaginator {
    fn next_cursor(
        &self,
        body: &JsonValue,
        _records_count: usize,
        state: &mut PaginationState,
    ) -> Option<PageCursor> {
        let page_items = lookup(body, &self.items_path)?.as_array()?.len() as u64;
        state.items_seen += page_items;

        let total = lookup(body, &self.total_path).and_then(as_count)?;

        // an empty page makes no progress
        if page_items == 0 || state.items_seen >= total {
            return None;
        }

        Some(PageCursor::with_param(
            &self.offset_param,
            state.items_seen.to_string(),
        ))
    }
}

/// Read a count given as an integer or integer text
fn as_count(value: &JsonValue) -> Option<u64> {
    match value {
        JsonValue::Number(n) => n.as_u64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ============================================================================
// Next-Token Pagination
// ============================================================================

/// Token pagination
///
/// Uses a token from the response to fetch the next page.
/// Common patterns:
/// - `{ "next": "abc123" }` sent back as `?cursor=abc123`
#[derive(Debug, Clone)]
pub struct NextTokenPaginator {
    /// Path to the token in the response
    pub token_path: String,
    /// Query parameter name for the token
    pub cursor_param: String,
}

impl NextTokenPaginator {
    /// Create a new token paginator
    pub fn new(token_path: impl Into<String>, cursor_param: impl Into<String>) -> Self {
        Self {
            token_path: token_path.into(),
            cursor_param: cursor_param.into(),
        }
    }
}

impl Paginator for NextTokenPaginator {
    fn next_cursor(
        &self,
        body: &JsonValue,
        records_count: usize,
        _state: &mut PaginationState,
    ) -> Option<PageCursor> {
        if records_count == 0 {
            return None;
        }

        let token = match lookup(body, &self.token_path)? {
            JsonValue::String(s) => s.trim().to_string(),
            JsonValue::Number(n) => n.to_string(),
            _ => return None,
        };

        if token.is_empty() {
            return None;
        }

        Some(PageCursor::with_param(&self.cursor_param, token))
    }
}

// ============================================================================
// No Pagination
// ============================================================================

/// No pagination - single request
#[derive(Debug, Clone, Default)]
pub struct NoPaginator;

impl Paginator for NoPaginator {
    fn next_cursor(
        &self,
        _body: &JsonValue,
        _records_count: usize,
        _state: &mut PaginationState,
    ) -> Option<PageCursor> {
        None
    }
}
