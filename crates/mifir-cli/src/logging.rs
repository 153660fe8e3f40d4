//! Logging infrastructure using `tracing` and `tracing-subscriber`.
//!
//! # Log Levels
//!
//! - `error`: fatal failures (unreadable input, unwritable output)
//! - `warn`: degraded output (sentinels, coerced values)
//! - `info`: per-run progress and summary counts
//! - `debug`: resolver pass detail, omitted custom fields

use std::io;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Maximum level to emit.
    pub level_filter: LevelFilter,
    /// Whether `RUST_LOG` may override the configured level.
    pub use_env_filter: bool,
    /// Output format.
    pub format: LogFormat,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
    /// JSON format for machine parsing.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            format: LogFormat::default(),
        }
    }
}

/// Initialize the global tracing subscriber. Call once at startup.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) {
    let filter = build_env_filter(config);
    match config.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_writer(io::stderr)
                .with_target(false);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_writer(io::stderr)
                .with_target(false)
                .without_time();
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .without_time();
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    }
}

/// Build an `EnvFilter` from the configuration, respecting `RUST_LOG`
/// unless an explicit verbosity flag was given.
fn build_env_filter(config: &LogConfig) -> EnvFilter {
    if config.use_env_filter
        && let Ok(filter) = EnvFilter::try_from_default_env()
    {
        return filter;
    }
    let level = config.level_filter.to_string().to_lowercase();
    // External crates stay at warn level to reduce noise.
    EnvFilter::new(format!(
        "warn,mifir_cli={level},mifir_map={level},mifir_model={level},mifir_report={level}",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_format_builds_a_layer() {
        // Layer construction exercises the subscriber features each
        // format needs without installing a global subscriber.
        let _json = fmt::layer::<tracing_subscriber::Registry>()
            .json()
            .with_writer(io::sink);
        let _compact = fmt::layer::<tracing_subscriber::Registry>()
            .compact()
            .with_writer(io::sink);
        let _pretty =
            fmt::layer::<tracing_subscriber::Registry>().with_writer(io::sink);
    }

    #[test]
    fn explicit_verbosity_sets_per_crate_levels() {
        let config = LogConfig {
            level_filter: LevelFilter::DEBUG,
            use_env_filter: false,
            format: LogFormat::Compact,
        };
        let filter = build_env_filter(&config);
        assert!(filter.to_string().contains("mifir_report=debug"));
    }
}
