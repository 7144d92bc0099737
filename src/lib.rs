//! # tap-openweathermap
//!
//! A multi-stream extraction connector for the OpenWeatherMap REST API.
//! Pulls current observations and forecasts, validates every record against
//! a declared schema, stamps it with the run's `synced_at` and emits it as a
//! Singer message.
//!
//! ## Features
//!
//! - **Declared Schemas**: Immutable schema trees built once, shared by every stream
//! - **Per-Stream Parameters**: City-name and coordinate location strategies
//! - **Pagination**: Seen-count and next-token strategies behind one driver
//! - **Concurrent Streams**: Bounded concurrency with a shared request budget
//! - **Run Summary**: Completed / partial / failed per stream, with failure counts
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tap_openweathermap::{
//!     config::TapConfig, engine::SyncEngine, enrich::RunContext, http::HttpClient,
//!     output::StdoutSink, schema::weather_registry, streams::StreamCatalog,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> tap_openweathermap::Result<()> {
//!     let config = TapConfig::from_file("config.json")?;
//!     let catalog = StreamCatalog::builtin(&weather_registry()?, None)?;
//!     let transport = Arc::new(HttpClient::with_config(config.http_client_config())?);
//!
//!     let report = SyncEngine::new(transport)
//!         .sync(
//!             &catalog,
//!             Arc::new(RunContext::new(config)),
//!             Arc::new(StdoutSink::stdout()),
//!             CancellationToken::new(),
//!         )
//!         .await?;
//!     println!("{:?}", report.status);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          SyncEngine                             │
//! │   per stream: params → fetch → extract → validate → enrich      │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │ Streams  │   HTTP    │   Paginate    │ Validate  │   Output    │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Catalog  │ Transport │ Seen count    │ Coerce    │ Singer JSON │
//! │ Params   │ Retry     │ Next token    │ Required  │ Memory      │
//! │ Location │ Rate Limit│ Driver        │ Datetime  │             │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the tap
pub mod error;

/// Common types and type aliases
pub mod types;

/// Tap configuration
pub mod config;

/// Declared schema trees and the registry
pub mod schema;

/// HTTP transport with retry and rate limiting
pub mod http;

/// Stream descriptors, catalog and request parameters
pub mod streams;

/// Pagination strategies
pub mod pagination;

/// Record extraction from response bodies
pub mod extract;

/// Schema validation and coercion
pub mod validate;

/// Run context and provenance stamping
pub mod enrich;

/// Record sinks and Singer messages
pub mod output;

/// Main execution engine
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::TapConfig;
pub use engine::{SyncEngine, SyncReport};
pub use streams::StreamCatalog;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
