//! Stream descriptors module
//!
//! One descriptor per API resource, binding an endpoint, a location rule, a
//! pagination rule and a schema.
//!
//! # Overview
//!
//! - `StreamDescriptor` - Immutable description of a stream
//! - `build_params` - Query parameters for a stream's next request
//! - `StreamCatalog` - The built-in streams and run selection

mod catalog;
mod params;
mod types;

pub use catalog::{
    StreamCatalog, CURRENT_WEATHER_STREAM, DEFAULT_BASE_URL, FORECAST_STREAM,
    FREE_FORECAST_STREAM,
};
pub use params::build_params;
pub use types::{LocationStrategy, StreamDescriptor};
