//! Run context and record enrichment
//!
//! A run captures one timestamp when it starts; every record it emits, from
//! every stream, is stamped with that same value.

use crate::config::TapConfig;
use crate::schema::SYNCED_AT;
use crate::types::{JsonObject, JsonValue};
use crate::validate::format_instant;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// State shared read-only by every stream of one run
#[derive(Debug)]
pub struct RunContext {
    config: Arc<TapConfig>,
    synced_at: DateTime<Utc>,
    synced_at_text: String,
}

impl RunContext {
    /// Start a run now
    pub fn new(config: impl Into<Arc<TapConfig>>) -> Self {
        Self::with_synced_at(config, Utc::now())
    }

    /// Start a run with a fixed timestamp
    pub fn with_synced_at(config: impl Into<Arc<TapConfig>>, synced_at: DateTime<Utc>) -> Self {
        Self {
            config: config.into(),
            synced_at,
            synced_at_text: format_instant(synced_at),
        }
    }

    pub fn config(&self) -> &TapConfig {
        &self.config
    }

    /// When this run started
    pub fn synced_at(&self) -> DateTime<Utc> {
        self.synced_at
    }
}

/// A validated record carrying its run's provenance timestamp
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TypedRecord {
    fields: JsonObject,
}

impl TypedRecord {
    /// Field lookup
    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.fields.get(name)
    }

    /// All fields
    pub fn fields(&self) -> &JsonObject {
        &self.fields
    }

    /// The provenance timestamp
    pub fn synced_at(&self) -> Option<&str> {
        self.fields.get(SYNCED_AT).and_then(JsonValue::as_str)
    }

    /// Convert into a JSON object value
    pub fn into_value(self) -> JsonValue {
        JsonValue::Object(self.fields)
    }
}

/// Stamp a validated record with the run's `synced_at`
pub fn enrich(mut record: JsonObject, ctx: &RunContext) -> TypedRecord {
    record.insert(
        SYNCED_AT.to_string(),
        JsonValue::String(ctx.synced_at_text.clone()),
    );
    TypedRecord { fields: record }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn object(value: JsonValue) -> JsonObject {
        match value {
            JsonValue::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_enrich_sets_synced_at() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap();
        let ctx = RunContext::with_synced_at(TapConfig::default(), at);

        let record = enrich(object(json!({"name": "Oslo"})), &ctx);
        assert_eq!(record.synced_at(), Some("2024-03-01T06:00:00Z"));
        assert_eq!(record.get("name"), Some(&json!("Oslo")));
    }

    #[test]
    fn test_enrich_overwrites_upstream_value() {
        let ctx = RunContext::with_synced_at(
            TapConfig::default(),
            Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap(),
        );
        let record = enrich(object(json!({"synced_at": "1999-01-01T00:00:00Z"})), &ctx);
        assert_eq!(record.synced_at(), Some("2024-03-01T06:00:00Z"));
    }

    #[test]
    fn test_every_record_shares_one_timestamp() {
        let ctx = RunContext::new(TapConfig::default());
        let first = enrich(object(json!({"id": 1})), &ctx);
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = enrich(object(json!({"id": 2})), &ctx);

        assert_eq!(first.synced_at(), second.synced_at());
        assert_eq!(
            first.synced_at().map(str::to_string),
            Some(format_instant(ctx.synced_at()))
        );
    }

    #[test]
    fn test_typed_record_serializes_as_object() {
        let ctx = RunContext::with_synced_at(
            TapConfig::default(),
            Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap(),
        );
        let record = enrich(object(json!({"id": 7})), &ctx);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"id": 7, "synced_at": "2024-03-01T06:00:00Z"})
        );
        assert_eq!(
            record.into_value(),
            json!({"id": 7, "synced_at": "2024-03-01T06:00:00Z"})
        );
    }
}
