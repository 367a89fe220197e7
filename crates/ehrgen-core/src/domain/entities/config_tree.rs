//! Hierarchical tool configuration addressed by dotted paths.
//!
//! The base tool configuration is one JSON document, for example:
//!
//! ```text
//! fhir.tools.template.config   -> template stage base configuration
//! project.package.igConfig     -> (inside that slice) implementation guide
//! ```
//!
//! Stages receive a slice of the base tree with [`ConfigPatch`]es applied on
//! top. Patches replace whatever value sits at their path.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::domain::error::DomainError;

/// A JSON configuration tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigTree {
    root: Value,
}

impl ConfigTree {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// Parse a tree from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, DomainError> {
        serde_json::from_str(text)
            .map(Self::new)
            .map_err(|e| DomainError::InvalidConfigPath {
                path: "<root>".into(),
                reason: format!("tool configuration is not valid JSON: {e}"),
            })
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Value at a dotted path, if every segment exists.
    pub fn get(&self, path: &str) -> Option<&Value> {
        segments(path)?
            .into_iter()
            .try_fold(&self.root, |node, key| node.as_object()?.get(key))
    }

    /// Copy of the sub-tree at `path`, which must be an object.
    pub fn slice(&self, path: &str) -> Result<ConfigTree, DomainError> {
        match self.get(path) {
            Some(value @ Value::Object(_)) => Ok(ConfigTree::new(value.clone())),
            Some(_) => Err(DomainError::InvalidConfigPath {
                path: path.into(),
                reason: "expected an object".into(),
            }),
            None => Err(DomainError::InvalidConfigPath {
                path: path.into(),
                reason: "no such key".into(),
            }),
        }
    }

    /// Set the value at a dotted path, creating intermediate objects.
    ///
    /// Fails if an intermediate segment exists and is not an object.
    pub fn set(&mut self, path: &str, value: Value) -> Result<(), DomainError> {
        let keys = segments(path).ok_or_else(|| DomainError::InvalidConfigPath {
            path: path.into(),
            reason: "empty path segment".into(),
        })?;
        let (last, parents) = keys.split_last().ok_or_else(|| DomainError::InvalidConfigPath {
            path: path.into(),
            reason: "empty path".into(),
        })?;

        if self.root.is_null() {
            self.root = Value::Object(Map::new());
        }

        let mut node = &mut self.root;
        for key in parents {
            let map = node
                .as_object_mut()
                .ok_or_else(|| DomainError::InvalidConfigPath {
                    path: path.into(),
                    reason: format!("'{key}' is not inside an object"),
                })?;
            node = map
                .entry((*key).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if node.is_null() {
                *node = Value::Object(Map::new());
            }
        }

        let map = node
            .as_object_mut()
            .ok_or_else(|| DomainError::InvalidConfigPath {
                path: path.into(),
                reason: format!("parent of '{last}' is not an object"),
            })?;
        map.insert((*last).to_string(), value);
        Ok(())
    }

    /// Apply patches in order.
    pub fn apply(&mut self, patches: &[ConfigPatch]) -> Result<(), DomainError> {
        patches
            .iter()
            .try_for_each(|patch| self.set(&patch.path, patch.value.clone()))
    }

    /// Deserialize the sub-tree at `path` into a typed settings struct.
    pub fn extract<T: DeserializeOwned>(&self, path: &str) -> Result<T, DomainError> {
        let value = self
            .get(path)
            .cloned()
            .ok_or_else(|| DomainError::InvalidConfigPath {
                path: path.into(),
                reason: "no such key".into(),
            })?;
        serde_json::from_value(value).map_err(|e| DomainError::InvalidConfigPath {
            path: path.into(),
            reason: e.to_string(),
        })
    }
}

/// A replacement value for one dotted configuration path.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigPatch {
    pub path: String,
    pub value: Value,
}

impl ConfigPatch {
    pub fn new(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
        }
    }
}

fn segments(path: &str) -> Option<Vec<&str>> {
    let keys: Vec<&str> = path.split('.').collect();
    if keys.iter().any(|k| k.is_empty()) {
        None
    } else {
        Some(keys)
    }
}
