//! Logging setup for the `schema-extractor` binary.
//!
//! Logs go to stderr so stdout carries only the progress lines. `RUST_LOG`
//! takes precedence over everything else; without it the level comes from
//! the CLI flags or `SCHEMA_EXTRACTOR_LOG_LEVEL`, defaulting to `warn`.

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable consulted when no level flag is given.
pub const LOG_LEVEL_ENV: &str = "SCHEMA_EXTRACTOR_LOG_LEVEL";

static INIT: Once = Once::new();

/// Parses a level name (case-insensitive).
pub fn parse_level(level_str: &str) -> Option<Level> {
    match level_str.trim().to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Picks the effective level: explicit `--log-level`, then `--verbose` /
/// `--quiet`, then the environment value, then `warn`.
pub fn resolve_level(
    log_level: Option<&str>,
    verbose: bool,
    quiet: bool,
    env_level: Option<&str>,
) -> Level {
    if let Some(level_str) = log_level {
        return parse_level(level_str).unwrap_or_else(|| {
            eprintln!(
                "Invalid log level '{}', defaulting to WARN. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::WARN
        });
    }

    if verbose {
        Level::DEBUG
    } else if quiet {
        Level::ERROR
    } else {
        env_level.and_then(parse_level).unwrap_or(Level::WARN)
    }
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init(level: Level) {
    INIT.call_once(|| {
        let filter = if env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(format!("schema_extractor={}", level))
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Some(Level::DEBUG));
        assert_eq!(parse_level("INFO"), Some(Level::INFO));
        assert_eq!(parse_level(" warn "), Some(Level::WARN));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn test_resolve_level_precedence() {
        assert_eq!(
            resolve_level(Some("trace"), true, false, Some("error")),
            Level::TRACE
        );
        assert_eq!(resolve_level(None, true, false, Some("error")), Level::DEBUG);
        assert_eq!(resolve_level(None, false, true, Some("info")), Level::ERROR);
        assert_eq!(resolve_level(None, false, false, Some("info")), Level::INFO);
        assert_eq!(resolve_level(None, false, false, None), Level::WARN);
    }

    #[test]
    fn test_resolve_level_invalid_falls_back() {
        assert_eq!(resolve_level(Some("bogus"), false, false, None), Level::WARN);
        assert_eq!(resolve_level(None, false, false, Some("bogus")), Level::WARN);
    }
}
