//! Built-in stream catalog

use super::types::{LocationStrategy, StreamDescriptor};
use crate::error::{Error, Result};
use crate::pagination::PaginationConfig;
use crate::schema::{SchemaRegistry, CURRENT_WEATHER, FREE_FORECAST, ONE_CALL};
use std::sync::Arc;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Current observation for a city
pub const CURRENT_WEATHER_STREAM: &str = "current_weather_stream";

/// One-call forecast for a coordinate
pub const FORECAST_STREAM: &str = "forecast_stream";

/// 5 day / 3 hour forecast for a coordinate
pub const FREE_FORECAST_STREAM: &str = "free_forecast_stream";

/// The ordered set of streams a run can select from
#[derive(Debug, Clone)]
pub struct StreamCatalog {
    streams: Vec<Arc<StreamDescriptor>>,
}

impl StreamCatalog {
    /// Create a catalog; stream names must be unique
    pub fn new(streams: Vec<StreamDescriptor>) -> Result<Self> {
        let mut catalog = Self {
            streams: Vec::with_capacity(streams.len()),
        };
        for stream in streams {
            if catalog.get(&stream.name).is_some() {
                return Err(Error::config(format!(
                    "Stream '{}' is declared twice",
                    stream.name
                )));
            }
            catalog.streams.push(Arc::new(stream));
        }
        Ok(catalog)
    }

    /// The OpenWeatherMap streams, optionally pointed at another base URL
    ///
    /// Fails with `InvalidUrl` if the override does not parse.
    pub fn builtin(registry: &SchemaRegistry, base_url: Option<&str>) -> Result<Self> {
        let base_url = base_url.unwrap_or(DEFAULT_BASE_URL);
        url::Url::parse(base_url)?;

        let current = StreamDescriptor::new(
            CURRENT_WEATHER_STREAM,
            base_url,
            "/weather",
            registry.resolve(CURRENT_WEATHER)?,
            LocationStrategy::city_name(),
        )?;

        let forecast = StreamDescriptor::new(
            FORECAST_STREAM,
            base_url,
            "/onecall",
            registry.resolve(ONE_CALL)?,
            LocationStrategy::coordinates(),
        )?;

        let free_forecast = StreamDescriptor::new(
            FREE_FORECAST_STREAM,
            base_url,
            "/forecast",
            registry.resolve(FREE_FORECAST)?,
            LocationStrategy::coordinates(),
        )?
        .with_pagination(PaginationConfig::seen_count("cnt", "list", "start"));

        Self::new(vec![current, forecast, free_forecast])
    }

    /// Look up a stream by name
    pub fn get(&self, name: &str) -> Option<&Arc<StreamDescriptor>> {
        self.streams.iter().find(|s| s.name == name)
    }

    /// All streams in declaration order
    pub fn streams(&self) -> &[Arc<StreamDescriptor>] {
        &self.streams
    }

    /// Stream names in declaration order
    pub fn names(&self) -> Vec<&str> {
        self.streams.iter().map(|s| s.name.as_str()).collect()
    }

    /// Resolve a selection in the given order; empty selects every stream
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Arc<StreamDescriptor>>> {
        if names.is_empty() {
            return Ok(self.streams.clone());
        }

        let mut selected: Vec<Arc<StreamDescriptor>> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let stream = self.get(name).ok_or_else(|| Error::unknown_stream(name))?;
            if !selected.iter().any(|s| s.name == name) {
                selected.push(Arc::clone(stream));
            }
        }
        Ok(selected)
    }
}
