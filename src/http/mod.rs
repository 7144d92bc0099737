//! HTTP transport module
//!
//! Provides the `Transport` boundary the sync engine fetches through, and a
//! reqwest-backed implementation with retry, backoff and a shared request
//! budget.
//!
//! # Features
//!
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Request Budget**: Token bucket shared across streams using governor
//! - **Backoff Strategies**: Constant, linear, and exponential backoff

mod client;
mod rate_limit;
mod transport;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::{FetchResponse, Transport};
