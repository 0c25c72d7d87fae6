//! Extraction pipeline executor.
//!
//! [`ExtractionPipeline`] runs the three stages of a schema dump in order
//! (Load → Extract → Write) with:
//! - Console progress lines (`Available modules:`, `- <name>`, `Saved to <path>`)
//! - Structured logging via `tracing`
//! - Atomic replacement of the output file
//! - Per-stage timing in [`ExtractionStats`]

use indexmap::IndexMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, instrument};

use crate::extract::{extract_with, ExtractError};
use crate::model::MissingTypesPolicy;
use crate::output::{self, OutputError};
use crate::traits::{RegistrySource, SourceError};

// ============================================================================
// Report Types
// ============================================================================

/// Outcome of a completed pipeline run.
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    /// Where the registry was loaded from
    pub source_id: String,

    /// Resolved path of the written schema file
    pub output_path: PathBuf,

    /// Every module in the registry, in enumeration order
    pub modules: Vec<String>,

    /// Modules without a `types` field
    pub missing_types: Vec<String>,

    /// Type definitions per module present in the schema
    pub type_counts: IndexMap<String, usize>,

    /// Timing and size statistics
    pub stats: ExtractionStats,
}

/// Statistics about a pipeline run.
#[derive(Debug, Default, Clone)]
pub struct ExtractionStats {
    /// Total time for the whole run (milliseconds)
    pub total_duration_ms: u64,

    /// Time spent loading the registry (milliseconds)
    pub load_duration_ms: u64,

    /// Time spent building the schema (milliseconds)
    pub extract_duration_ms: u64,

    /// Time spent rendering and writing the file (milliseconds)
    pub write_duration_ms: u64,

    /// Sum of all per-module type definition counts
    pub type_definitions: usize,

    /// Size of the written file
    pub bytes_written: usize,
}

// ============================================================================
// Pipeline Errors
// ============================================================================

/// Errors that can occur during pipeline execution.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// The registry could not be loaded
    #[error("Failed to load registry: {0}")]
    Source(#[from] SourceError),

    /// Extraction was rejected by the missing-types policy
    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),

    /// The schema file could not be produced
    #[error(transparent)]
    Output(#[from] OutputError),

    /// Progress lines could not be written
    #[error("Console output failed: {0}")]
    Console(#[source] io::Error),

    /// The blocking write task panicked or was cancelled
    #[error("Write task failed: {0}")]
    TaskFailed(String),
}

// ============================================================================
// Pipeline Executor
// ============================================================================

/// Load → Extract → Write, run once to completion.
///
/// # Example
///
/// ```ignore
/// use schema_extractor::{ExtractionPipeline, JsonFileSource, MissingTypesPolicy};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pipeline = ExtractionPipeline::new(JsonFileSource::new("definitions.json"), "schema.json")
///         .with_missing_types(MissingTypesPolicy::Omit);
///
///     let report = pipeline.execute().await?;
///     println!("{} modules", report.modules.len());
///     Ok(())
/// }
/// ```
pub struct ExtractionPipeline<S>
where
    S: RegistrySource,
{
    /// Where the registry comes from
    source: S,

    /// Target file, replaced on every run
    output_path: PathBuf,

    /// Handling of descriptors without `types` (default: null)
    missing_types: MissingTypesPolicy,

    /// Whether `execute` prints progress lines to stdout
    console: bool,
}

impl<S> ExtractionPipeline<S>
where
    S: RegistrySource,
{
    /// Creates a pipeline writing to `output_path`.
    ///
    /// Default configuration:
    /// - Missing `types`: rendered as `null`
    /// - Console progress: enabled
    pub fn new(source: S, output_path: impl Into<PathBuf>) -> Self {
        Self {
            source,
            output_path: output_path.into(),
            missing_types: MissingTypesPolicy::default(),
            console: true,
        }
    }

    pub fn with_missing_types(mut self, policy: MissingTypesPolicy) -> Self {
        self.missing_types = policy;
        self
    }

    /// Enables or disables the stdout progress lines used by [`execute`](Self::execute).
    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    /// Runs the pipeline, printing progress to stdout unless disabled.
    pub async fn execute(&self) -> Result<ExtractionReport, PipelineError> {
        if self.console {
            self.execute_with_console(&mut io::stdout()).await
        } else {
            self.execute_with_console(&mut io::sink()).await
        }
    }

    /// Runs the pipeline, writing progress lines to `console`.
    ///
    /// # Errors
    ///
    /// Fails on the first problem, without retry:
    /// - registry missing or malformed
    /// - a module without `types` under [`MissingTypesPolicy::Error`]
    /// - the output file cannot be written (the previous file, if any, is left
    ///   untouched)
    #[instrument(skip(self, console), fields(source = %self.source.source_id()))]
    pub async fn execute_with_console<W>(
        &self,
        console: &mut W,
    ) -> Result<ExtractionReport, PipelineError>
    where
        W: Write,
    {
        let start = Instant::now();
        let mut stats = ExtractionStats::default();

        // ====================================================================
        // Stage 1: Load
        // ====================================================================

        info!("Loading module registry");
        let load_start = Instant::now();

        let registry = self.source.load().await?;

        stats.load_duration_ms = load_start.elapsed().as_millis() as u64;
        info!(
            duration_ms = stats.load_duration_ms,
            modules = registry.len(),
            "Registry loaded"
        );

        // ====================================================================
        // Stage 2: Extract
        // ====================================================================

        let extract_start = Instant::now();
        writeln!(console, "Available modules:").map_err(PipelineError::Console)?;

        let mut modules = Vec::with_capacity(registry.len());
        let mut console_error = None;
        let extraction = extract_with(&registry, self.missing_types, |module| {
            modules.push(module.to_string());
            if let Err(e) = writeln!(console, "- {}", module) {
                console_error.get_or_insert(e);
            }
        })?;
        if let Some(e) = console_error {
            return Err(PipelineError::Console(e));
        }

        let type_counts: IndexMap<String, usize> = extraction
            .schema
            .names()
            .map(|name| (name.to_string(), extraction.schema.type_count(name)))
            .collect();
        stats.type_definitions = type_counts.values().sum();
        stats.extract_duration_ms = extract_start.elapsed().as_millis() as u64;

        info!(
            duration_ms = stats.extract_duration_ms,
            modules = extraction.schema.len(),
            missing_types = extraction.missing_types.len(),
            type_definitions = stats.type_definitions,
            "Extraction completed"
        );

        // ====================================================================
        // Stage 3: Write
        // ====================================================================

        let write_start = Instant::now();
        let json = output::render_schema(&extraction.schema)?;
        stats.bytes_written = json.len();

        let target = self.output_path.clone();
        tokio::task::spawn_blocking(move || output::write_atomic(&target, &json))
            .await
            .map_err(|e| PipelineError::TaskFailed(e.to_string()))??;

        let output_path =
            std::fs::canonicalize(&self.output_path).unwrap_or_else(|_| self.output_path.clone());
        writeln!(console, "Saved to {}", output_path.display()).map_err(PipelineError::Console)?;

        stats.write_duration_ms = write_start.elapsed().as_millis() as u64;
        stats.total_duration_ms = start.elapsed().as_millis() as u64;

        info!(
            duration_ms = stats.write_duration_ms,
            path = %output_path.display(),
            bytes = stats.bytes_written,
            "Schema written"
        );

        Ok(ExtractionReport {
            source_id: self.source.source_id(),
            output_path,
            modules,
            missing_types: extraction.missing_types,
            type_counts,
            stats,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModuleDescriptor, ModuleRegistry};
    use crate::sources::StaticSource;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_source() -> StaticSource {
        let registry: ModuleRegistry = [
            ("A", ModuleDescriptor::with_types(json!({"X": 1}))),
            ("B", ModuleDescriptor::with_types(json!({"Y": 2, "Z": "u8"}))),
        ]
        .into_iter()
        .collect();
        StaticSource::new(registry)
    }

    #[tokio::test]
    async fn test_pipeline_execution() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schema.json");
        let pipeline = ExtractionPipeline::new(sample_source(), &path);

        let mut console = Vec::new();
        let report = pipeline.execute_with_console(&mut console).await.unwrap();

        assert_eq!(report.source_id, "static");
        assert_eq!(report.modules, vec!["A", "B"]);
        assert!(report.missing_types.is_empty());
        assert_eq!(report.output_path, path.canonicalize().unwrap());

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, json!({"A": {"X": 1}, "B": {"Y": 2, "Z": "u8"}}));
    }

    #[tokio::test]
    async fn test_console_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schema.json");
        let pipeline = ExtractionPipeline::new(sample_source(), &path);

        let mut console = Vec::new();
        let report = pipeline.execute_with_console(&mut console).await.unwrap();

        let text = String::from_utf8(console).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Available modules:");
        assert_eq!(lines[1], "- A");
        assert_eq!(lines[2], "- B");
        assert_eq!(
            lines[3],
            format!("Saved to {}", report.output_path.display())
        );
        assert_eq!(lines.len(), 4);
    }

    #[tokio::test]
    async fn test_pipeline_stats() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schema.json");
        let pipeline = ExtractionPipeline::new(sample_source(), &path).with_console(false);

        let report = pipeline.execute().await.unwrap();

        assert_eq!(report.type_counts.get("A"), Some(&1));
        assert_eq!(report.type_counts.get("B"), Some(&2));
        assert_eq!(report.stats.type_definitions, 3);
        assert_eq!(
            report.stats.bytes_written as u64,
            std::fs::metadata(&path).unwrap().len()
        );
    }

    #[tokio::test]
    async fn test_missing_types_error_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schema.json");
        let registry: ModuleRegistry = [("bare", ModuleDescriptor::new())].into_iter().collect();
        let pipeline = ExtractionPipeline::new(StaticSource::new(registry), &path)
            .with_missing_types(MissingTypesPolicy::Error)
            .with_console(false);

        let err = pipeline.execute().await.unwrap_err();

        assert!(matches!(err, PipelineError::Extract(_)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_unwritable_target_keeps_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no-such-dir").join("schema.json");
        let pipeline = ExtractionPipeline::new(sample_source(), &path).with_console(false);

        let err = pipeline.execute().await.unwrap_err();

        assert!(matches!(err, PipelineError::Output(OutputError::Write { .. })));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_runs_are_byte_identical() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schema.json");
        let pipeline = ExtractionPipeline::new(sample_source(), &path).with_console(false);

        pipeline.execute().await.unwrap();
        let first = std::fs::read(&path).unwrap();
        pipeline.execute().await.unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
    }
}
