//! Record extraction module
//!
//! Decodes a response body and applies a stream's records path to it.
//!
//! # Overview
//!
//! A records path selects the record-bearing node(s) of a response. A single
//! object becomes one record, an array yields one record per element, and a
//! path that matches nothing yields no records.

mod extractor;

pub use extractor::{decode_body, lookup, RawRecord, RecordExtractor};

#[cfg(test)]
mod tests;
