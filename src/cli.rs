use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::model::MissingTypesPolicy;
use crate::output;
use crate::pipeline::{ExtractionPipeline, ExtractionReport};
use crate::sources::{DirectorySource, JsonFileSource};

/// Dump each module's `types` from an interface-definition registry into schema.json
#[derive(Parser, Debug)]
#[command(
    name = "schema-extractor",
    version,
    long_about = "Reads a registry of interface-definition modules, takes the `types` field of \
                  every module and writes the result as indented JSON.\n\n\
                  Examples:\n  \
                  schema-extractor\n  \
                  schema-extractor --registry definitions.json --output schema.json\n  \
                  schema-extractor --registry ./definitions/ --missing-types omit"
)]
pub struct CliArgs {
    #[arg(
        long,
        value_name = "PATH",
        env = "SCHEMA_EXTRACTOR_REGISTRY",
        help = "Registry JSON file, or a directory of <module>.json files \
                [default: <program-dir>/../definitions.json]"
    )]
    pub registry: Option<PathBuf>,

    #[arg(
        short = 'o',
        long,
        value_name = "PATH",
        env = "SCHEMA_EXTRACTOR_OUTPUT",
        help = "Output file [default: <program-dir>/../schema.json]"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        value_enum,
        default_value = "null",
        help = "How to handle a module without a `types` field"
    )]
    pub missing_types: MissingTypesArg,

    #[arg(long, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress progress lines and non-error logs"
    )]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MissingTypesArg {
    /// Keep the module with a null value
    Null,
    /// Leave the module out
    Omit,
    /// Fail the run
    Error,
}

impl From<MissingTypesArg> for MissingTypesPolicy {
    fn from(arg: MissingTypesArg) -> Self {
        match arg {
            MissingTypesArg::Null => MissingTypesPolicy::Null,
            MissingTypesArg::Omit => MissingTypesPolicy::Omit,
            MissingTypesArg::Error => MissingTypesPolicy::Error,
        }
    }
}

/// Runs one extraction as described by `args`.
pub async fn run(args: &CliArgs) -> Result<ExtractionReport> {
    let registry = match &args.registry {
        Some(path) => path.clone(),
        None => output::default_registry_path().context("Failed to resolve registry path")?,
    };
    let output_path = match &args.output {
        Some(path) => path.clone(),
        None => output::default_output_path().context("Failed to resolve output path")?,
    };

    debug!(registry = %registry.display(), output = %output_path.display(), "Resolved paths");

    let policy = MissingTypesPolicy::from(args.missing_types);
    let console = !args.quiet;

    let report = if registry.is_dir() {
        ExtractionPipeline::new(DirectorySource::new(&registry), &output_path)
            .with_missing_types(policy)
            .with_console(console)
            .execute()
            .await
    } else {
        ExtractionPipeline::new(JsonFileSource::new(&registry), &output_path)
            .with_missing_types(policy)
            .with_console(console)
            .execute()
            .await
    };

    let report =
        report.with_context(|| format!("Schema extraction from {} failed", registry.display()))?;

    info!(
        source = %report.source_id,
        output = %report.output_path.display(),
        modules = report.modules.len(),
        missing_types = report.missing_types.len(),
        type_definitions = report.stats.type_definitions,
        bytes = report.stats.bytes_written,
        total_ms = report.stats.total_duration_ms,
        "Schema extraction finished"
    );
    for (module, count) in &report.type_counts {
        debug!(module = %module, types = count, "Module type definitions");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["schema-extractor"]).unwrap();
        assert_eq!(args.missing_types, MissingTypesArg::Null);
        assert!(!args.quiet);
        assert!(!args.verbose);
    }

    #[test]
    fn test_all_flags() {
        let args = CliArgs::try_parse_from([
            "schema-extractor",
            "--registry",
            "defs.json",
            "-o",
            "out.json",
            "--missing-types",
            "omit",
            "-q",
        ])
        .unwrap();

        assert_eq!(args.registry, Some(PathBuf::from("defs.json")));
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
        assert_eq!(
            MissingTypesPolicy::from(args.missing_types),
            MissingTypesPolicy::Omit
        );
        assert!(args.quiet);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(CliArgs::try_parse_from(["schema-extractor", "-q", "-v"]).is_err());
    }

    #[tokio::test]
    async fn test_run_reports_counts() {
        let dir = tempfile::TempDir::new().unwrap();
        let registry = dir.path().join("definitions.json");
        let schema = dir.path().join("schema.json");
        std::fs::write(
            &registry,
            r#"{"a": {"types": {"X": "u8", "Y": "u16"}}, "b": {"rpc": {}}}"#,
        )
        .unwrap();

        let args = CliArgs::try_parse_from([
            OsStr::new("schema-extractor"),
            OsStr::new("-q"),
            OsStr::new("--registry"),
            registry.as_os_str(),
            OsStr::new("--output"),
            schema.as_os_str(),
        ])
        .unwrap();

        let report = run(&args).await.unwrap();

        assert_eq!(report.modules, vec!["a", "b"]);
        assert_eq!(report.missing_types, vec!["b"]);
        assert_eq!(report.type_counts.get("a"), Some(&2));
        assert_eq!(report.stats.type_definitions, 2);
        assert!(schema.exists());
    }

    #[test]
    fn test_rejects_unknown_policy() {
        assert!(CliArgs::try_parse_from(["schema-extractor", "--missing-types", "skip"]).is_err());
    }
}
