//! Registry source implementations.
//!
//! Each source implements [`RegistrySource`](crate::traits::RegistrySource):
//! - `json_file` - one JSON document mapping module names to descriptors
//! - `directory` - one `<module>.json` descriptor per file
//! - `static_source` - an in-memory registry

pub mod directory;
pub mod json_file;
pub mod static_source;

pub use directory::DirectorySource;
pub use json_file::JsonFileSource;
pub use static_source::StaticSource;

use crate::model::ModuleDescriptor;
use crate::traits::SourceError;
use serde_json::Value;
use std::path::Path;

async fn read_json(path: &Path) -> Result<Value, SourceError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&bytes).map_err(|source| SourceError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

fn descriptor_from_value(
    path: &Path,
    module: &str,
    value: Value,
) -> Result<ModuleDescriptor, SourceError> {
    match value {
        Value::Object(fields) => Ok(fields.into_iter().collect::<indexmap::IndexMap<_, _>>().into()),
        _ => Err(SourceError::InvalidDescriptor {
            path: path.to_path_buf(),
            module: module.to_string(),
        }),
    }
}
