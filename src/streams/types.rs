//! Stream descriptor types

use crate::config::keys;
use crate::error::{Error, Result};
use crate::pagination::PaginationConfig;
use crate::schema::SchemaNode;
use crate::types::QueryParams;
use std::sync::Arc;

/// How a stream turns configuration into a location query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationStrategy {
    /// A single named place, e.g. `q=London,uk`
    PointLocation {
        /// Query parameter for the place
        param: String,
        /// Setting the place is read from
        setting: String,
    },
    /// Latitude / longitude pair
    CoordinateLocation {
        /// Setting for latitude
        lat_setting: String,
        /// Setting for longitude
        lon_setting: String,
    },
}

impl LocationStrategy {
    /// City-name lookup (`q` from `current_weather_city_name`)
    pub fn city_name() -> Self {
        Self::PointLocation {
            param: "q".to_string(),
            setting: keys::CITY_NAME.to_string(),
        }
    }

    /// Coordinate lookup from the forecast latitude / longitude settings
    pub fn coordinates() -> Self {
        Self::CoordinateLocation {
            lat_setting: keys::LATITUDE.to_string(),
            lon_setting: keys::LONGITUDE.to_string(),
        }
    }

    /// Settings this strategy reads
    pub fn settings(&self) -> Vec<&str> {
        match self {
            Self::PointLocation { setting, .. } => vec![setting.as_str()],
            Self::CoordinateLocation {
                lat_setting,
                lon_setting,
            } => vec![lat_setting.as_str(), lon_setting.as_str()],
        }
    }
}

/// One logical resource pulled from the API
#[derive(Debug, Clone)]
pub struct StreamDescriptor {
    /// Unique stream name
    pub name: String,
    /// API base URL
    pub base_url: String,
    /// Endpoint path
    pub path: String,
    /// Path selecting the record-bearing node(s)
    pub records_path: String,
    /// Root schema (always an object)
    pub schema: Arc<SchemaNode>,
    /// Whether more than one page may be fetched
    pub paginate: bool,
    /// Location query rule
    pub location: LocationStrategy,
    /// Fixed query parameters
    pub static_params: QueryParams,
    /// Continuation strategy, used when `paginate` is set
    pub pagination: PaginationConfig,
}

impl StreamDescriptor {
    /// Create a single-page descriptor with records at the response root
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        path: impl Into<String>,
        schema: Arc<SchemaNode>,
        location: LocationStrategy,
    ) -> Result<Self> {
        let name = name.into();
        if schema.as_object().is_none() {
            return Err(Error::schema(format!(
                "Stream '{name}' root schema must be an object, got {}",
                schema.kind_name()
            )));
        }

        Ok(Self {
            name,
            base_url: base_url.into(),
            path: path.into(),
            records_path: "$".to_string(),
            schema,
            paginate: false,
            location,
            static_params: QueryParams::new(),
            pagination: PaginationConfig::None,
        })
    }

    /// Set the records path
    #[must_use]
    pub fn with_records_path(mut self, path: impl Into<String>) -> Self {
        self.records_path = path.into();
        self
    }

    /// Enable pagination with the given strategy
    #[must_use]
    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.paginate = !matches!(pagination, PaginationConfig::None);
        self.pagination = pagination;
        self
    }

    /// Add a fixed query parameter
    #[must_use]
    pub fn with_static_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.static_params.insert(key.into(), value.into());
        self
    }

    /// Replace the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Full endpoint URL
    pub fn url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }
}
