//! JSON record extractor

use crate::error::{Error, Result};
use crate::types::JsonValue;

/// Untyped record as found in a response
pub type RawRecord = JsonValue;

/// Paths that select the whole decoded body
const ROOT_PATHS: [&str; 4] = ["", "$", "$[*]", "$.[*]"];

/// Applies a records path to decoded response bodies
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    records_path: String,
}

impl RecordExtractor {
    /// Create an extractor for the given records path
    pub fn new(records_path: impl Into<String>) -> Self {
        Self {
            records_path: records_path.into(),
        }
    }

    /// The records path
    pub fn records_path(&self) -> &str {
        &self.records_path
    }

    /// Decode a body and extract its records
    pub fn extract_body(&self, body: &str) -> Result<Vec<RawRecord>> {
        let value = decode_body(body)?;
        self.extract(&value)
    }

    /// Extract records from an already decoded body
    pub fn extract(&self, value: &JsonValue) -> Result<Vec<RawRecord>> {
        let path = self.records_path.trim();

        if ROOT_PATHS.contains(&path) {
            return Ok(flatten(value.clone()));
        }

        // jsonpath-rust only for wildcards and filters
        if path.contains('*') || path.contains("[?") {
            return extract_with_jsonpath(value, path);
        }

        Ok(lookup(value, path).cloned().map(flatten).unwrap_or_default())
    }
}

/// Parse a response body as JSON
pub fn decode_body(body: &str) -> Result<JsonValue> {
    serde_json::from_str(body).map_err(|e| Error::decode(format!("Failed to parse JSON: {e}")))
}

/// Resolve a simple dot path (`$.city.name`, `list[0].dt`) without cloning
pub fn lookup<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.trim();
    if ROOT_PATHS[..2].contains(&path) {
        return Some(value);
    }
    let path = path
        .strip_prefix("$.")
        .or_else(|| path.strip_prefix('$'))
        .unwrap_or(path);

    let mut current = value;
    for part in path.split('.') {
        if let Some(bracket_pos) = part.find('[') {
            let name = &part[..bracket_pos];
            let index_str = part[bracket_pos + 1..].strip_suffix(']')?;

            if !name.is_empty() {
                current = current.get(name)?;
            }

            let index: i64 = index_str.parse().ok()?;
            let arr = current.as_array()?;
            let idx = if index < 0 {
                arr.len().checked_sub(index.unsigned_abs() as usize)?
            } else {
                usize::try_from(index).ok()?
            };
            current = arr.get(idx)?;
        } else {
            current = current.get(part)?;
        }
    }

    Some(current)
}

/// Arrays yield their elements; null yields nothing; anything else is one record
fn flatten(value: JsonValue) -> Vec<RawRecord> {
    match value {
        JsonValue::Array(items) => items,
        JsonValue::Null => Vec::new(),
        other => vec![other],
    }
}

/// Extract records using full JSONPath syntax
fn extract_with_jsonpath(value: &JsonValue, path: &str) -> Result<Vec<RawRecord>> {
    use jsonpath_rust::JsonPath;

    let jp = JsonPath::try_from(path).map_err(|e| Error::json_path(format!("Invalid JSONPath: {e}")))?;

    Ok(flatten(jp.find(value)))
}
