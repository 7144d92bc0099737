//! Output module
//!
//! The boundary records leave the tap through.
//!
//! # Overview
//!
//! - `RecordSink` - Async trait the sync engine emits into
//! - `JsonLinesSink` / `StdoutSink` - Singer SCHEMA and RECORD messages as JSON lines
//! - `MemorySink` - Collects records in order, for tests and embedding

mod message;
mod sink;

pub use message::SingerMessage;
pub use sink::{JsonLinesSink, MemorySink, RecordSink, StdoutSink};
