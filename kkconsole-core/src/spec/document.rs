//! Path-addressed cluster specification document
//!
//! The wizard edits the specification as a YAML tree rather than as a typed
//! struct so that any field a step exposes can be patched with a dotted
//! path, and so that fields the console does not model survive a round trip
//! to the backend untouched.

use super::ClusterSpecification;
use crate::error::{ConsoleError, ConsoleResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_yaml::{Mapping, Value};

/// Mutable cluster specification document
#[derive(Debug, Clone, PartialEq)]
pub struct SpecDocument {
    root: Value,
}

impl SpecDocument {
    /// Wrap an existing YAML tree. The root must be a mapping.
    pub fn new(root: Value) -> ConsoleResult<Self> {
        if !root.is_mapping() {
            return Err(ConsoleError::document_path("", "document root must be a mapping"));
        }
        Ok(Self { root })
    }

    pub fn from_specification(spec: &ClusterSpecification) -> ConsoleResult<Self> {
        Self::new(serde_yaml::to_value(spec)?)
    }

    /// Parse a hand-authored or backend-provided YAML document
    pub fn from_yaml(text: &str) -> ConsoleResult<Self> {
        Self::new(serde_yaml::from_str(text)?)
    }

    /// Serialize the document into the payload sent to the backend
    pub fn to_yaml(&self) -> ConsoleResult<String> {
        Ok(serde_yaml::to_string(&self.root)?)
    }

    pub fn to_specification(&self) -> ConsoleResult<ClusterSpecification> {
        Ok(serde_yaml::from_value(self.root.clone())?)
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Cluster identity, empty when unset
    pub fn name(&self) -> &str {
        self.get_str("metadata.name").unwrap_or("")
    }

    /// Read the value at a dotted path
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut node = &self.root;
        for segment in path.split('.') {
            node = node.as_mapping()?.get(segment)?;
        }
        Some(node)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// True when the path holds a non-empty string
    pub fn has_text(&self, path: &str) -> bool {
        self.get_str(path).map_or(false, |s| !s.is_empty())
    }

    /// Length of the sequence at the path, zero when absent
    pub fn seq_len(&self, path: &str) -> usize {
        self.get(path)
            .and_then(Value::as_sequence)
            .map_or(0, Vec::len)
    }

    /// Deserialize the value at a path into a typed structure
    pub fn get_typed<T: DeserializeOwned>(&self, path: &str) -> ConsoleResult<Option<T>> {
        match self.get(path) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Ok(Some(serde_yaml::from_value(value.clone())?)),
        }
    }

    /// Assign `value` at `path`, creating intermediate mappings as needed.
    ///
    /// Sibling fields are never touched. Descending through a value that is
    /// not a mapping (a list, a string) is a programmer error and fails
    /// without modifying the document. Null intermediates are replaced by
    /// empty mappings.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> ConsoleResult<()> {
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(ConsoleError::document_path(path, "empty path segment"));
        }
        let Some((leaf, parents)) = segments.split_last() else {
            return Err(ConsoleError::document_path(path, "empty path"));
        };

        // Validate before mutating so a failed write leaves no empty
        // intermediate mappings behind.
        let mut cursor = &self.root;
        for (depth, segment) in parents.iter().enumerate() {
            match cursor.as_mapping().and_then(|m| m.get(*segment)) {
                None | Some(Value::Null) => break,
                Some(child) if child.is_mapping() => cursor = child,
                Some(_) => {
                    return Err(ConsoleError::document_path(
                        path,
                        format!("'{}' is not a mapping", segments[..=depth].join(".")),
                    ))
                }
            }
        }

        let mut node = &mut self.root;
        for segment in parents {
            let map = node
                .as_mapping_mut()
                .ok_or_else(|| ConsoleError::document_path(path, "parent is not a mapping"))?;
            let child = map
                .entry(Value::String((*segment).to_string()))
                .or_insert_with(|| Value::Mapping(Mapping::new()));
            if child.is_null() {
                *child = Value::Mapping(Mapping::new());
            }
            node = child;
        }

        let map = node
            .as_mapping_mut()
            .ok_or_else(|| ConsoleError::document_path(path, "parent is not a mapping"))?;
        map.insert(Value::String((*leaf).to_string()), value.into());
        tracing::debug!(path, "document field updated");
        Ok(())
    }

    /// Serialize a typed value and assign it at `path`
    pub fn set_typed<T: Serialize>(&mut self, path: &str, value: &T) -> ConsoleResult<()> {
        let value = serde_yaml::to_value(value)?;
        self.set(path, value)
    }
}
