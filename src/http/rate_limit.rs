//! Shared request budget
//!
//! OpenWeatherMap quotas are counted per API key per minute, so every stream
//! of a run draws from one token bucket (governor). The limiter is cheap to
//! clone; clones share the same bucket.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::trace;

/// Configuration for the request budget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Calls allowed per minute for the API key
    pub calls_per_minute: u32,
    /// Calls that may be made back to back before throttling starts
    pub burst_size: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::free_tier()
    }
}

impl RateLimiterConfig {
    /// Create a new budget config
    pub fn new(calls_per_minute: u32, burst_size: u32) -> Self {
        Self {
            calls_per_minute,
            burst_size,
        }
    }

    /// Free plan: 60 calls per minute
    pub fn free_tier() -> Self {
        Self {
            calls_per_minute: 60,
            burst_size: 5,
        }
    }

    fn quota(&self) -> Quota {
        let per_minute = NonZeroU32::new(self.calls_per_minute).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(self.burst_size).unwrap_or(NonZeroU32::MIN);
        Quota::per_minute(per_minute).allow_burst(burst)
    }
}

/// Token bucket shared by every concurrent stream
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl RateLimiter {
    /// Create a limiter with the given budget
    pub fn new(config: &RateLimiterConfig) -> Self {
        Self {
            limiter: Arc::new(Governor::direct(config.quota())),
        }
    }

    /// Wait for a permit, returning how long the caller was held back
    pub async fn acquire(&self) -> Duration {
        let start = Instant::now();
        self.limiter.until_ready().await;
        let waited = start.elapsed();
        if waited > Duration::from_millis(1) {
            trace!(waited_ms = waited.as_millis() as u64, "Request budget throttled call");
        }
        waited
    }

    /// Take a permit if one is available right now
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod rate_limit_tests {
    use super::*;

    #[test]
    fn test_free_tier_default() {
        let config = RateLimiterConfig::default();
        assert_eq!(config.calls_per_minute, 60);
        assert_eq!(config.burst_size, 5);
    }

    #[tokio::test]
    async fn test_burst_then_throttle() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(60, 3));

        for _ in 0..3 {
            assert!(limiter.try_acquire());
        }
        // one token per second refills; the bucket is empty now
        assert!(!limiter.try_acquire());
    }

    #[tokio::test]
    async fn test_clones_share_budget() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(60, 2));
        let other = limiter.clone();

        assert!(limiter.try_acquire());
        assert!(other.try_acquire());
        assert!(!limiter.try_acquire());
        assert!(!other.try_acquire());
    }

    #[tokio::test]
    async fn test_acquire_within_burst_is_immediate() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(600, 10));
        let waited = limiter.acquire().await;
        assert!(waited < Duration::from_millis(100));
    }

    #[test]
    fn test_zero_values_clamp_to_one() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(0, 0));
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }
}
