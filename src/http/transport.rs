//! Transport boundary
//!
//! The sync engine only sees `Transport`; retries, backoff and rate limiting
//! belong to the implementation behind it.

use crate::error::Result;
use crate::types::QueryParams;
use async_trait::async_trait;
use std::collections::HashMap;

/// A fetched page
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: String,
    /// Response headers, lower-cased names
    pub headers: HashMap<String, String>,
}

impl FetchResponse {
    /// Create a response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            headers: HashMap::new(),
        }
    }

    /// Check for a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fetches one page for a stream
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET for `url` with the given query parameters
    async fn fetch(&self, url: &str, params: &QueryParams) -> Result<FetchResponse>;
}
