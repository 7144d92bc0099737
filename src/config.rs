//! Tap configuration
//!
//! Operator-supplied settings: the API key, per-stream location settings,
//! stream selection, and HTTP / sync tuning. Loaded from a JSON or YAML file
//! or an inline JSON string.

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::OptionStringExt;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use std::time::Duration;

/// Setting names understood by the request parameterizer
pub mod keys {
    pub const API_KEY: &str = "api_key";
    pub const CITY_NAME: &str = "current_weather_city_name";
    pub const LATITUDE: &str = "forecast_weather_lattitude";
    pub const LONGITUDE: &str = "forecast_weather_longitude";
    pub const UNITS: &str = "units";
    pub const LANG: &str = "lang";
}

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete tap configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TapConfig {
    /// OpenWeatherMap API key, sent as `appid`
    #[serde(default)]
    pub api_key: Option<String>,

    /// City for the current-weather stream (e.g. "London,uk")
    #[serde(default)]
    pub current_weather_city_name: Option<String>,

    /// Latitude for the coordinate-based streams
    #[serde(default, deserialize_with = "string_or_number")]
    pub forecast_weather_lattitude: Option<String>,

    /// Longitude for the coordinate-based streams
    #[serde(default, deserialize_with = "string_or_number")]
    pub forecast_weather_longitude: Option<String>,

    /// Units of measurement (standard, metric, imperial)
    #[serde(default)]
    pub units: Option<String>,

    /// Output language code
    #[serde(default)]
    pub lang: Option<String>,

    /// Streams to sync, in order (empty = all)
    #[serde(default)]
    pub streams: Vec<String>,

    /// Override for every stream's base URL
    #[serde(default)]
    pub base_url: Option<String>,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpSettings,

    /// Sync engine settings
    #[serde(default)]
    pub sync: SyncSettings,
}

impl TapConfig {
    /// Load from a JSON or YAML file, chosen by extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file: {e}")))?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        if is_yaml {
            Ok(serde_yaml::from_str(&content)?)
        } else {
            Self::from_json(&content)
        }
    }

    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::config(format!("Invalid config JSON: {e}")))
    }

    /// Look up a named setting; empty values count as absent
    pub fn setting(&self, name: &str) -> Option<&str> {
        let value = match name {
            keys::API_KEY => self.api_key.as_ref(),
            keys::CITY_NAME => self.current_weather_city_name.as_ref(),
            keys::LATITUDE => self.forecast_weather_lattitude.as_ref(),
            keys::LONGITUDE => self.forecast_weather_longitude.as_ref(),
            keys::UNITS => self.units.as_ref(),
            keys::LANG => self.lang.as_ref(),
            _ => None,
        }?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }

    /// Stream selection with blank entries removed
    pub fn selected_streams(&self) -> Vec<String> {
        self.streams
            .iter()
            .filter_map(|s| s.clone().none_if_empty())
            .map(|s| s.trim().to_string())
            .collect()
    }

    /// Build the HTTP client configuration
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .max_retries(self.http.max_retries);

        builder = if self.http.calls_per_minute == 0 {
            builder.no_rate_limit()
        } else {
            builder.rate_limit(RateLimiterConfig::new(
                self.http.calls_per_minute,
                self.http.burst_size.max(1),
            ))
        };

        builder.build()
    }
}

/// Accept a setting given either as a JSON string or a JSON number
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => Some(s),
        Some(Raw::Number(n)) => Some(n.to_string()),
        None => None,
    })
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries on transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Shared request budget across all streams (0 disables limiting)
    #[serde(default = "default_calls_per_minute")]
    pub calls_per_minute: u32,

    /// Burst size for the request budget
    #[serde(default = "default_burst_size")]
    pub burst_size: u32,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            calls_per_minute: default_calls_per_minute(),
            burst_size: default_burst_size(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

// free-tier quota
fn default_calls_per_minute() -> u32 {
    60
}

fn default_burst_size() -> u32 {
    5
}

// ============================================================================
// Sync Settings
// ============================================================================

/// Sync engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Streams running at the same time
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Upper bound on pages fetched for one stream in one run
    #[serde(default = "default_max_pages")]
    pub max_pages_per_stream: usize,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            max_pages_per_stream: default_max_pages(),
        }
    }
}

fn default_max_concurrency() -> usize {
    2
}

fn default_max_pages() -> usize {
    100
}
