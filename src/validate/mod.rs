//! Schema validation module
//!
//! Checks raw records against their stream's schema tree and coerces
//! primitives to the declared kinds.
//!
//! # Overview
//!
//! - `validate_record` - Validate one record, returning only declared fields
//! - `coerce_primitive` - Number / integer / string / datetime coercion
//! - `format_instant` - Canonical datetime text, shared with enrichment
//!
//! Errors carry the offending field's path, e.g. `main.temp` or
//! `weather[2].id`.

mod coerce;
mod validator;

pub use coerce::{coerce_primitive, format_instant, parse_instant};
pub use validator::validate_record;
