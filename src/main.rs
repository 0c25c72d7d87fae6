use schema_extractor::cli::{self, CliArgs};
use schema_extractor::{logging, VERSION};

use clap::Parser;
use std::env;
use tracing::debug;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    let env_level = env::var(logging::LOG_LEVEL_ENV).ok();
    logging::init(logging::resolve_level(
        args.log_level.as_deref(),
        args.verbose,
        args.quiet,
        env_level.as_deref(),
    ));

    debug!("schema-extractor v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    if let Err(e) = cli::run(&args).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
