use super::{descriptor_from_value, read_json};
use crate::model::ModuleRegistry;
use crate::traits::{RegistrySource, SourceError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Registry laid out as one descriptor file per module (`<module>.json`).
///
/// Directory listings have no meaningful order, so modules are sorted by file
/// name to keep the output stable between runs.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn descriptor_files(&self) -> Result<Vec<(String, PathBuf)>, SourceError> {
        let io_err = |source| SourceError::Io {
            path: self.root.clone(),
            source,
        };

        let mut entries = tokio::fs::read_dir(&self.root).await.map_err(io_err)?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let path = entry.path();
            if !entry.file_type().await.map_err(io_err)?.is_file() || !is_json(&path) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                return Err(SourceError::InvalidModuleName { path: path.clone() });
            };
            files.push((stem.to_string(), path.clone()));
        }

        files.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(files)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

#[async_trait]
impl RegistrySource for DirectorySource {
    fn source_id(&self) -> String {
        self.root.display().to_string()
    }

    async fn load(&self) -> Result<ModuleRegistry, SourceError> {
        let files = self.descriptor_files().await?;
        if files.is_empty() {
            return Err(SourceError::EmptyDirectory(self.root.clone()));
        }

        let mut registry = ModuleRegistry::new();
        for (module, path) in files {
            let descriptor = descriptor_from_value(&path, &module, read_json(&path).await?)?;
            debug!(module = %module, path = %path.display(), "Loaded module descriptor");
            registry.insert(module, descriptor);
        }

        Ok(registry)
    }
}
