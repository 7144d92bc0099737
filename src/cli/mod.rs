//! CLI module
//!
//! Command-line interface for running the tap.
//!
//! # Commands
//!
//! - `streams` - List stream names
//! - `discover` - Print the catalog with JSON Schemas
//! - `read` - Extract data from streams

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
