//! Recursive record validation

use super::coerce::coerce_primitive;
use crate::error::{Error, Result};
use crate::schema::{ObjectSchema, SchemaNode};
use crate::types::{json_type_name, JsonObject, JsonValue};

/// Path reported for a record that is not an object at all
const ROOT: &str = "$";

/// Validate a raw record against an object schema
///
/// Declared fields are validated and coerced, undeclared fields are dropped,
/// absent optional fields are omitted. `null` passes through for optional
/// fields and counts as missing for required ones.
pub fn validate_record(schema: &SchemaNode, raw: &JsonValue) -> Result<JsonObject> {
    let Some(object) = schema.as_object() else {
        return Err(Error::schema(format!(
            "Record schema must be an object, got {}",
            schema.kind_name()
        )));
    };

    match raw {
        JsonValue::Object(map) => validate_object(object, map, ""),
        other => Err(Error::type_mismatch(ROOT, "object", json_type_name(other))),
    }
}

fn validate_node(node: &SchemaNode, value: &JsonValue, path: &str) -> Result<JsonValue> {
    if value.is_null() {
        return Ok(JsonValue::Null);
    }

    match node {
        SchemaNode::Primitive(kind) => coerce_primitive(*kind, value, path),
        SchemaNode::Object(object) => match value {
            JsonValue::Object(map) => validate_object(object, map, path).map(JsonValue::Object),
            other => Err(Error::type_mismatch(path, "object", json_type_name(other))),
        },
        SchemaNode::Array(element) => match value {
            JsonValue::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| validate_node(element, item, &format!("{path}[{i}]")))
                .collect::<Result<Vec<_>>>()
                .map(JsonValue::Array),
            other => Err(Error::type_mismatch(path, "array", json_type_name(other))),
        },
    }
}

fn validate_object(object: &ObjectSchema, map: &JsonObject, path: &str) -> Result<JsonObject> {
    let mut out = JsonObject::new();

    for (name, field) in object.fields() {
        let child = if path.is_empty() {
            name.to_string()
        } else {
            format!("{path}.{name}")
        };

        match map.get(name) {
            None | Some(JsonValue::Null) if object.is_required(name) => {
                return Err(Error::required_field(child));
            }
            None => {}
            Some(value) => {
                out.insert(name.to_string(), validate_node(field, value, &child)?);
            }
        }
    }

    Ok(out)
}
