//! Per-run state shared by the pipeline stages.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

/// Key under which stage one's generator properties are recorded.
pub const GENERATOR_PROPERTIES_KEY: &str = "ehrServiceGenProperties";

/// Mutable state carried through one pipeline run.
///
/// Created once per invocation, owned by the orchestrator, passed by
/// mutable reference to each stage, and discarded when the run ends.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    run_id: Uuid,
    output_dir: PathBuf,
    properties: BTreeMap<String, Value>,
}

impl ExecutionContext {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            output_dir: output_dir.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Typed read of a property. `None` if absent or of another shape.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.properties
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Set a property, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.properties.insert(key.into(), value)
    }

    /// Serialize and set a property.
    pub fn set_as<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(value)?;
        self.properties.insert(key.into(), value);
        Ok(())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }
}
