//! Logging infrastructure
//!
//! Structured logging uses the `tracing` crate. The client emits a `render`
//! span per request plus debug events for each pipeline stage (compression,
//! encoding, URL composition) and an info event once the response arrives.
//!
//! # Usage
//!
//! ```rust
//! use puml::core::logging::init_logging;
//!
//! // Defaults: info level, compact format
//! let _ = init_logging(None, None);
//! ```
//!
//! # Log Formats
//!
//! - `compact`: Single-line format, good for scripts
//! - `pretty`: Multi-line format with colors, good for development
//! - `json`: JSON format, good for log aggregation systems
//!
//! # Environment Variables
//!
//! - `PUML_LOG_LEVEL`: Set log level (trace|debug|info|warn|error|off)
//! - `PUML_LOG_FORMAT`: Set log format (compact|pretty|json)
//! - `RUST_LOG`: Standard `EnvFilter` directives, used only when no level
//!   is given otherwise, e.g. `RUST_LOG="puml::client=debug" puml render in.puml out`
//!
//! A bare level applies to `puml` targets only; dependencies such as the HTTP
//! stack stay at `warn` (see [`filter_directives`]).
//!
//! Logs are always written to stderr so stdout stays usable for tokens and URLs.

use std::str::FromStr;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Level used when neither an argument nor the environment names one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Level applied to dependencies (HTTP stack, TLS) when a bare level is given
const DEPENDENCY_LOG_LEVEL: &str = "warn";

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact single-line format
    Compact,
    /// Pretty multi-line format with colors
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LogFormat {
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Turn a log level or directive string into `EnvFilter` directives
///
/// A bare level such as `debug` applies to this crate only, while
/// dependencies stay at `warn`. Strings that already hold directives
/// (`target=level`, comma lists) pass through unchanged.
pub fn filter_directives(level: &str) -> String {
    let level = level.trim();
    if level.eq_ignore_ascii_case("off") {
        return "off".to_string();
    }
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    format!(
        "{},{}={}",
        DEPENDENCY_LOG_LEVEL,
        env!("CARGO_CRATE_NAME"),
        level.to_lowercase()
    )
}

/// Initialize the global tracing subscriber
///
/// `level` falls back to `PUML_LOG_LEVEL`, then `RUST_LOG`, then `info`.
/// `format` falls back to `PUML_LOG_FORMAT`, then `compact`.
///
/// Returns an error for an unknown format or when a global subscriber is
/// already installed.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    init_logging_with_default(level, format, DEFAULT_LOG_LEVEL)
}

/// Like [`init_logging`], with `default_level` as the final level fallback
pub fn init_logging_with_default(
    level: Option<&str>,
    format: Option<&str>,
    default_level: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let log_format = format
        .map(|s| s.to_string())
        .or_else(|| std::env::var("PUML_LOG_FORMAT").ok())
        .unwrap_or_else(|| "compact".to_string());
    let format =
        LogFormat::from_str(&log_format).map_err(|e| format!("Invalid log format: {}", e))?;

    let filter = match level
        .map(|s| s.to_string())
        .or_else(|| std::env::var("PUML_LOG_LEVEL").ok())
    {
        Some(level) => EnvFilter::try_new(filter_directives(&level))
            .unwrap_or_else(|_| EnvFilter::new(filter_directives(default_level))),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(filter_directives(default_level))),
    };

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match format {
        LogFormat::Compact => fmt::Layer::default()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_level(true)
            .with_file(false)
            .with_line_number(false)
            .with_span_events(FmtSpan::NONE)
            .boxed(),
        LogFormat::Pretty => fmt::Layer::default()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::ACTIVE)
            .pretty()
            .boxed(),
        LogFormat::Json => fmt::Layer::default()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::CLOSE)
            .json()
            .boxed(),
    };

    Registry::default()
        .with(layer.with_filter(filter))
        .try_init()?;

    Ok(())
}

/// Initialize logging with default settings (info level, compact format)
pub fn init_default_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(None, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
        assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
        assert!(LogFormat::from_str("yaml").is_err());
    }

    #[test]
    fn test_filter_directives_scope_bare_levels() {
        assert_eq!(filter_directives("debug"), "warn,puml=debug");
        assert_eq!(filter_directives(" TRACE "), "warn,puml=trace");
        assert_eq!(filter_directives("off"), "off");
        assert_eq!(filter_directives("OFF"), "off");
        // Explicit directives are left alone
        assert_eq!(filter_directives("puml::client=debug"), "puml::client=debug");
        assert_eq!(filter_directives("info,ureq=trace"), "info,ureq=trace");
        assert!(EnvFilter::try_new(filter_directives("debug")).is_ok());
    }

    #[test]
    fn test_log_format_variants() {
        let variants = LogFormat::variants();
        assert_eq!(variants.len(), 3);
        assert!(variants.contains(&"pretty"));
    }
}
