//! Error types for the OpenWeatherMap tap
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use serde::Serialize;
use thiserror::Error;

/// The main error type for the tap
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Stream '{stream}' is missing required setting: {field}")]
    MissingConfig { stream: String, field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Catalog Errors
    // ============================================================================
    #[error("Unknown schema: {name}")]
    UnknownSchema { name: String },

    #[error("Unknown stream: {stream}")]
    UnknownStream { stream: String },

    #[error("Invalid schema declaration: {message}")]
    Schema { message: String },

    // ============================================================================
    // Validation Errors
    // ============================================================================
    #[error("Type mismatch at '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("Required field missing: {path}")]
    RequiredFieldMissing { path: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Max retries ({max_retries}) exceeded")]
    MaxRetriesExceeded { max_retries: u32 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("JSONPath error: {message}")]
    JsonPath { message: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // Run Errors
    // ============================================================================
    #[error("Sink error: {message}")]
    Sink { message: String },

    #[error("Run cancelled")]
    Cancelled,

    #[error("Stream '{stream}' stopped after reaching the limit of {max_pages} pages")]
    PageLimit { stream: String, max_pages: usize },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

/// Summary bucket an error is counted under in a run report
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCause {
    /// A required setting was absent
    MissingConfig,
    /// A setting was present but unusable
    InvalidConfig,
    /// A record value had the wrong type
    TypeMismatch,
    /// A record lacked a required field
    RequiredFieldMissing,
    /// The HTTP fetch failed
    Transport,
    /// The response body could not be decoded
    Decode,
    /// The output sink rejected a record
    Sink,
    /// The run was cancelled
    Cancelled,
    /// The stream hit its page limit
    PageLimit,
    /// Anything else
    Other,
}

impl std::fmt::Display for FailureCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FailureCause::MissingConfig => "missing_config",
            FailureCause::InvalidConfig => "invalid_config",
            FailureCause::TypeMismatch => "type_mismatch",
            FailureCause::RequiredFieldMissing => "required_field_missing",
            FailureCause::Transport => "transport",
            FailureCause::Decode => "decode",
            FailureCause::Sink => "sink",
            FailureCause::Cancelled => "cancelled",
            FailureCause::PageLimit => "page_limit",
            FailureCause::Other => "other",
        };
        write!(f, "{name}")
    }
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing setting error for a stream
    pub fn missing_config(stream: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingConfig {
            stream: stream.into(),
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an unknown schema error
    pub fn unknown_schema(name: impl Into<String>) -> Self {
        Self::UnknownSchema { name: name.into() }
    }

    /// Create an unknown stream error
    pub fn unknown_stream(stream: impl Into<String>) -> Self {
        Self::UnknownStream {
            stream: stream.into(),
        }
    }

    /// Create a schema declaration error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(
        path: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            path: path.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a required field error
    pub fn required_field(path: impl Into<String>) -> Self {
        Self::RequiredFieldMissing { path: path.into() }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a JSONPath error
    pub fn json_path(message: impl Into<String>) -> Self {
        Self::JsonPath {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a sink error
    pub fn sink(message: impl Into<String>) -> Self {
        Self::Sink {
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// Check if this error only affects a single record
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            Error::TypeMismatch { .. } | Error::RequiredFieldMissing { .. }
        )
    }

    /// Summary bucket for this error
    pub fn cause(&self) -> FailureCause {
        match self {
            Error::MissingConfig { .. } => FailureCause::MissingConfig,
            Error::Config { .. }
            | Error::InvalidConfigValue { .. }
            | Error::YamlParse(_)
            | Error::UnknownSchema { .. }
            | Error::UnknownStream { .. }
            | Error::Schema { .. } => FailureCause::InvalidConfig,
            Error::TypeMismatch { .. } => FailureCause::TypeMismatch,
            Error::RequiredFieldMissing { .. } => FailureCause::RequiredFieldMissing,
            Error::Http(_)
            | Error::HttpStatus { .. }
            | Error::RateLimited { .. }
            | Error::Timeout { .. }
            | Error::MaxRetriesExceeded { .. }
            | Error::InvalidUrl(_) => FailureCause::Transport,
            Error::JsonParse(_) | Error::JsonPath { .. } | Error::Decode { .. } => {
                FailureCause::Decode
            }
            Error::Sink { .. } => FailureCause::Sink,
            Error::Cancelled => FailureCause::Cancelled,
            Error::PageLimit { .. } => FailureCause::PageLimit,
            Error::Io(_) | Error::Other(_) => FailureCause::Other,
        }
    }
}

/// Check if an HTTP status code is retryable
///
/// 520-524 are Cloudflare origin errors seen in front of the API.
fn is_retryable_status(status: u16) -> bool {
    matches!(
        status,
        429 | 500 | 502 | 503 | 504 | 520 | 521 | 522 | 523 | 524
    )
}

/// Result type alias for the tap
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }
}
