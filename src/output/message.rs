//! Singer message envelope
//!
//! Records leave the tap as JSON lines tagged with a message type, the
//! format Singer targets read.

use crate::enrich::TypedRecord;
use crate::streams::StreamDescriptor;
use crate::types::JsonValue;
use serde::Serialize;

/// One line of tap output
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum SingerMessage<'a> {
    /// Stream schema, written before any of the stream's records
    Schema {
        stream: &'a str,
        schema: JsonValue,
        key_properties: Vec<String>,
    },
    /// One record
    Record {
        stream: &'a str,
        record: &'a TypedRecord,
    },
}

impl<'a> SingerMessage<'a> {
    /// Schema message for a stream
    pub fn schema(descriptor: &'a StreamDescriptor) -> Self {
        Self::Schema {
            stream: &descriptor.name,
            schema: descriptor.schema.to_json_schema(),
            key_properties: Vec::new(),
        }
    }

    /// Record message
    pub fn record(stream: &'a str, record: &'a TypedRecord) -> Self {
        Self::Record { stream, record }
    }
}
