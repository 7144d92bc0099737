//! Schema registry module
//!
//! Declarative type trees for every object the weather API returns.
//!
//! # Overview
//!
//! - `SchemaNode` - Immutable tree of primitives, objects and arrays
//! - `SchemaRegistry` - Named shapes, resolved by reference at startup
//! - `weather_registry` - The OpenWeatherMap shapes (coord, wind, clouds, ...)

mod registry;
mod types;
mod weather;

pub use registry::SchemaRegistry;
pub use types::{ObjectSchema, PrimitiveKind, SchemaNode};
pub use weather::{weather_registry, CURRENT_WEATHER, FREE_FORECAST, ONE_CALL, SYNCED_AT};
