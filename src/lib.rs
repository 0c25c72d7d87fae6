pub mod cli;
pub mod extract;
pub mod logging;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod sources;
pub mod traits;

// Re-export common types for convenience
pub use extract::{extract, extract_with, ExtractError, Extraction};
pub use model::*;
pub use pipeline::{ExtractionPipeline, ExtractionReport, ExtractionStats, PipelineError};
pub use sources::{DirectorySource, JsonFileSource, StaticSource};
pub use traits::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
