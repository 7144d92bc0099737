//! Engine types
//!
//! Configuration and run reports for the sync engine.

use crate::config::SyncSettings;
use crate::error::{Error, FailureCause};
use serde::Serialize;
use std::collections::BTreeMap;

/// Configuration for sync operation
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Streams running at the same time
    pub max_concurrency: usize,
    /// Upper bound on pages per stream (0 = unlimited)
    pub max_pages_per_stream: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 2,
            max_pages_per_stream: 100,
        }
    }
}

impl SyncConfig {
    /// Create a new sync config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max concurrency
    #[must_use]
    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max;
        self
    }

    /// Set the page limit
    #[must_use]
    pub fn with_max_pages(mut self, max: usize) -> Self {
        self.max_pages_per_stream = max;
        self
    }
}

impl From<&SyncSettings> for SyncConfig {
    fn from(settings: &SyncSettings) -> Self {
        Self {
            max_concurrency: settings.max_concurrency,
            max_pages_per_stream: settings.max_pages_per_stream,
        }
    }
}

/// How far a stream got
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamStatus {
    /// Every page processed with no failures
    Completed,
    /// Some records emitted despite failures
    Partial,
    /// Failures and nothing emitted
    Failed,
}

/// Outcome of one stream
#[derive(Debug, Clone, Serialize)]
pub struct StreamReport {
    pub stream: String,
    pub status: StreamStatus,
    pub records_emitted: usize,
    pub records_dropped: usize,
    pub pages_fetched: usize,
    /// Failure counts by cause
    pub failures: BTreeMap<FailureCause, usize>,
    /// The error that stopped the stream, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl StreamReport {
    /// Empty report for a stream about to run
    pub fn new(stream: impl Into<String>) -> Self {
        Self {
            stream: stream.into(),
            status: StreamStatus::Completed,
            records_emitted: 0,
            records_dropped: 0,
            pages_fetched: 0,
            failures: BTreeMap::new(),
            error: None,
            duration_ms: 0,
        }
    }

    /// Count a record dropped by validation
    pub fn drop_record(&mut self, error: &Error) {
        self.records_dropped += 1;
        self.count(error.cause());
    }

    /// Record the error that stopped the stream
    pub fn fail(&mut self, error: &Error) {
        self.count(error.cause());
        self.error = Some(error.to_string());
    }

    /// Total failures of every cause
    pub fn failure_count(&self) -> usize {
        self.failures.values().sum()
    }

    /// Settle the status from the counters
    pub fn finish(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
        self.status = if self.failures.is_empty() {
            StreamStatus::Completed
        } else if self.records_emitted > 0 {
            StreamStatus::Partial
        } else {
            StreamStatus::Failed
        };
    }

    fn count(&mut self, cause: FailureCause) {
        *self.failures.entry(cause).or_insert(0) += 1;
    }
}

/// Outcome of the whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// Every stream completed
    Succeeded,
    /// Mixed outcome
    Partial,
    /// Every stream failed
    Failed,
}

/// Summary of a sync run
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub status: RunStatus,
    /// The run's provenance timestamp
    pub synced_at: String,
    /// Per-stream reports in configuration order
    pub streams: Vec<StreamReport>,
    pub duration_ms: u64,
}

impl SyncReport {
    /// Build a report; the run status follows from the stream statuses
    pub fn new(synced_at: impl Into<String>, streams: Vec<StreamReport>, duration_ms: u64) -> Self {
        let all = |status| streams.iter().all(|s| s.status == status);
        let status = if all(StreamStatus::Completed) {
            RunStatus::Succeeded
        } else if all(StreamStatus::Failed) {
            RunStatus::Failed
        } else {
            RunStatus::Partial
        };

        Self {
            status,
            synced_at: synced_at.into(),
            streams,
            duration_ms,
        }
    }

    /// Report for one stream
    pub fn stream(&self, name: &str) -> Option<&StreamReport> {
        self.streams.iter().find(|s| s.stream == name)
    }

    /// Records emitted across all streams
    pub fn records_emitted(&self) -> usize {
        self.streams.iter().map(|s| s.records_emitted).sum()
    }

    /// Failure counts by cause across all streams
    pub fn failures(&self) -> BTreeMap<FailureCause, usize> {
        let mut totals = BTreeMap::new();
        for (cause, count) in self.streams.iter().flat_map(|s| &s.failures) {
            *totals.entry(*cause).or_insert(0) += count;
        }
        totals
    }
}
