use crate::model::ModuleRegistry;
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON in {}: {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Expected a JSON object in {}", path.display())]
    NotAnObject { path: PathBuf },
    #[error("Module '{module}' in {} is not an object", path.display())]
    InvalidDescriptor { path: PathBuf, module: String },
    #[error("Module file name is not valid UTF-8: {}", path.display())]
    InvalidModuleName { path: PathBuf },
    #[error("No module descriptors (*.json) found in {}", .0.display())]
    EmptyDirectory(PathBuf),
}

#[async_trait]
pub trait RegistrySource: Send + Sync {
    /// Returns an identifier for where the registry comes from (a path, or
    /// "static" for in-memory registries).
    fn source_id(&self) -> String;

    /// Loads the full registry, in its natural enumeration order.
    async fn load(&self) -> Result<ModuleRegistry, SourceError>;
}
