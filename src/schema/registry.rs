//! Named schema registry
//!
//! Shapes are registered once at startup and looked up by name. Lookups hand
//! out shared references, so composing a stream schema from registered shapes
//! never copies a subtree.

use super::types::SchemaNode;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of named schema shapes
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    shapes: HashMap<String, Arc<SchemaNode>>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shape under a name
    ///
    /// Names are unique; registering the same name twice is a declaration error.
    pub fn register(&mut self, name: impl Into<String>, node: Arc<SchemaNode>) -> Result<()> {
        let name = name.into();
        if self.shapes.contains_key(&name) {
            return Err(Error::schema(format!("shape '{name}' registered twice")));
        }
        self.shapes.insert(name, node);
        Ok(())
    }

    /// Resolve a shape by name
    pub fn resolve(&self, name: &str) -> Result<Arc<SchemaNode>> {
        self.shapes
            .get(name)
            .cloned()
            .ok_or_else(|| Error::unknown_schema(name))
    }
}
