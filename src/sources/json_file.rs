use super::{descriptor_from_value, read_json};
use crate::model::ModuleRegistry;
use crate::traits::{RegistrySource, SourceError};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

/// Registry stored as a single JSON object: `{ "<module>": { "types": ... } }`.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RegistrySource for JsonFileSource {
    fn source_id(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> Result<ModuleRegistry, SourceError> {
        let Value::Object(entries) = read_json(&self.path).await? else {
            return Err(SourceError::NotAnObject {
                path: self.path.clone(),
            });
        };

        let mut registry = ModuleRegistry::new();
        for (module, value) in entries {
            let descriptor = descriptor_from_value(&self.path, &module, value)?;
            registry.insert(module, descriptor);
        }

        debug!(path = %self.path.display(), modules = registry.len(), "Loaded registry file");
        Ok(registry)
    }
}
