use crate::model::ModuleRegistry;
use crate::traits::{RegistrySource, SourceError};
use async_trait::async_trait;

/// A registry that is already in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    registry: ModuleRegistry,
}

impl StaticSource {
    pub fn new(registry: ModuleRegistry) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl RegistrySource for StaticSource {
    fn source_id(&self) -> String {
        "static".to_string()
    }

    async fn load(&self) -> Result<ModuleRegistry, SourceError> {
        Ok(self.registry.clone())
    }
}
