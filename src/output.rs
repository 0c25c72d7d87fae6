//! Rendering and writing `schema.json`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::model::ExtractedSchema;

/// Default output file name.
pub const SCHEMA_FILE_NAME: &str = "schema.json";

/// Default registry file name, next to the schema.
pub const DEFINITIONS_FILE_NAME: &str = "definitions.json";

/// Errors that can occur while producing the output file.
#[derive(Error, Debug)]
pub enum OutputError {
    /// Schema could not be serialized
    #[error("Failed to serialize schema: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Output path has no file name component
    #[error("Invalid output path: {}", .0.display())]
    InvalidPath(PathBuf),

    /// Writing or renaming the file failed
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The program's own location could not be determined
    #[error("Cannot locate the running executable: {0}")]
    ExecutableLocation(#[source] io::Error),
}

/// Serializes the schema as 2-space indented JSON, without a trailing
/// newline. Same schema in, same bytes out.
pub fn render_schema(schema: &ExtractedSchema) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(schema)?)
}

/// Writes `contents` to `path` by way of `<path>.tmp` and a rename, so the
/// target is either the old file or the complete new one.
///
/// The parent directory must already exist. On failure the temp file is
/// removed best-effort.
///
/// The rename replaces the directory entry itself: a symlinked `path` becomes
/// a regular file (the link target is left as it was), and the new file gets
/// default permissions rather than the old file's mode.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), OutputError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| OutputError::InvalidPath(path.to_path_buf()))?;

    let mut temp_name = file_name.to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let result = fs::write(&temp_path, contents)
        .and_then(|()| fs::rename(&temp_path, path))
        .map_err(|source| OutputError::Write {
            path: path.to_path_buf(),
            source,
        });

    match &result {
        Ok(()) => debug!(path = %path.display(), bytes = contents.len(), "Wrote output file"),
        Err(_) => {
            let _ = fs::remove_file(&temp_path);
        }
    }

    result
}

/// Directory one level above the directory holding the running executable.
pub fn program_parent_dir() -> Result<PathBuf, OutputError> {
    let exe = std::env::current_exe().map_err(OutputError::ExecutableLocation)?;
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(dir.join(".."))
}

/// `<program-directory>/../schema.json`
pub fn default_output_path() -> Result<PathBuf, OutputError> {
    Ok(program_parent_dir()?.join(SCHEMA_FILE_NAME))
}

/// `<program-directory>/../definitions.json`
pub fn default_registry_path() -> Result<PathBuf, OutputError> {
    Ok(program_parent_dir()?.join(DEFINITIONS_FILE_NAME))
}
