//! Schema types
//!
//! A `SchemaNode` is an immutable tree describing the shape of a record.
//! Subtrees are shared through `Arc`, so a shape registered once (e.g. `wind`)
//! can be referenced from several streams without copying.

use crate::error::{Error, Result};
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Kind of a leaf value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Number,
    Integer,
    DateTime,
}

impl PrimitiveKind {
    /// JSON Schema type name
    pub fn json_type(self) -> &'static str {
        match self {
            PrimitiveKind::String | PrimitiveKind::DateTime => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Integer => "integer",
        }
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrimitiveKind::String => write!(f, "string"),
            PrimitiveKind::Number => write!(f, "number"),
            PrimitiveKind::Integer => write!(f, "integer"),
            PrimitiveKind::DateTime => write!(f, "datetime"),
        }
    }
}

/// Ordered set of named fields with a required subset
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSchema {
    fields: Vec<(String, Arc<SchemaNode>)>,
    required: BTreeSet<String>,
}

impl ObjectSchema {
    /// Create an object schema; field names must be unique
    pub fn new<I, S>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Arc<SchemaNode>)>,
        S: Into<String>,
    {
        let mut seen = BTreeSet::new();
        let mut ordered = Vec::new();
        for (name, node) in fields {
            let name = name.into();
            if !seen.insert(name.clone()) {
                return Err(Error::schema(format!("duplicate field '{name}'")));
            }
            ordered.push((name, node));
        }
        Ok(Self {
            fields: ordered,
            required: BTreeSet::new(),
        })
    }

    /// Mark fields as required; each must be declared
    pub fn require(mut self, names: &[&str]) -> Result<Self> {
        for name in names {
            if self.field(name).is_none() {
                return Err(Error::schema(format!(
                    "required field '{name}' is not declared"
                )));
            }
            self.required.insert((*name).to_string());
        }
        Ok(self)
    }

    /// Declared fields in order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Arc<SchemaNode>)> {
        self.fields.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&Arc<SchemaNode>> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, node)| node)
    }

    /// Required field names
    pub fn required(&self) -> &BTreeSet<String> {
        &self.required
    }

    /// Check if a field is required
    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    /// Number of declared fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if no fields are declared
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A node in a schema tree
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// Leaf value
    Primitive(PrimitiveKind),
    /// Nested object
    Object(ObjectSchema),
    /// Homogeneous array
    Array(Arc<SchemaNode>),
}

impl SchemaNode {
    pub fn string() -> Arc<Self> {
        Arc::new(Self::Primitive(PrimitiveKind::String))
    }

    pub fn number() -> Arc<Self> {
        Arc::new(Self::Primitive(PrimitiveKind::Number))
    }

    pub fn integer() -> Arc<Self> {
        Arc::new(Self::Primitive(PrimitiveKind::Integer))
    }

    pub fn datetime() -> Arc<Self> {
        Arc::new(Self::Primitive(PrimitiveKind::DateTime))
    }

    /// Array of the given element shape
    pub fn array(element: Arc<SchemaNode>) -> Arc<Self> {
        Arc::new(Self::Array(element))
    }

    /// Object with no required fields
    pub fn object<I, S>(fields: I) -> Result<Arc<Self>>
    where
        I: IntoIterator<Item = (S, Arc<SchemaNode>)>,
        S: Into<String>,
    {
        Ok(Arc::new(Self::Object(ObjectSchema::new(fields)?)))
    }

    /// Object with required fields
    pub fn object_with_required<I, S>(fields: I, required: &[&str]) -> Result<Arc<Self>>
    where
        I: IntoIterator<Item = (S, Arc<SchemaNode>)>,
        S: Into<String>,
    {
        Ok(Arc::new(Self::Object(
            ObjectSchema::new(fields)?.require(required)?,
        )))
    }

    /// Get the object schema if this is an object node
    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Short name of the node kind
    pub fn kind_name(&self) -> String {
        match self {
            Self::Primitive(kind) => kind.to_string(),
            Self::Object(_) => "object".to_string(),
            Self::Array(_) => "array".to_string(),
        }
    }

    /// Render as a JSON Schema document
    ///
    /// Every type is nullable, matching what downstream Singer targets expect.
    pub fn to_json_schema(&self) -> Value {
        match self {
            Self::Primitive(kind) => {
                let mut schema = json!({ "type": [kind.json_type(), "null"] });
                if *kind == PrimitiveKind::DateTime {
                    schema["format"] = json!("date-time");
                }
                schema
            }
            Self::Array(element) => json!({
                "type": ["array", "null"],
                "items": element.to_json_schema(),
            }),
            Self::Object(object) => {
                let mut properties = Map::new();
                for (name, node) in object.fields() {
                    properties.insert(name.to_string(), node.to_json_schema());
                }
                let mut schema = json!({
                    "type": ["object", "null"],
                    "properties": properties,
                });
                if !object.required().is_empty() {
                    schema["required"] = json!(object.required());
                }
                schema
            }
        }
    }
}
