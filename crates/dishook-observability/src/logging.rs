//! Logging configuration using tracing

use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::{
    filter::Directive, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Crates whose chatter is capped at `warn`
const QUIET_TARGETS: &[&str] = &["hyper=warn", "hyper_util=warn", "reqwest=warn", "rustls=warn"];

/// Logging format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
    /// Compact format
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

impl LogFormat {
    /// Read `LOG_FORMAT`, defaulting to pretty output
    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|f| f.parse().ok())
            .unwrap_or_default()
    }
}

/// Read `LOG_LEVEL`, falling back to `default`
pub fn level_from_env(default: Level) -> Level {
    std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|l| l.parse().ok())
        .unwrap_or(default)
}

fn env_filter(default_level: Level) -> EnvFilter {
    QUIET_TARGETS
        .iter()
        .filter_map(|d| d.parse::<Directive>().ok())
        .fold(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
            EnvFilter::add_directive,
        )
}

/// Initialize logging with the specified format.
///
/// Log output goes to stderr so command output on stdout stays clean.
pub fn init_logging(format: LogFormat, default_level: Level) {
    let env_filter = env_filter(default_level);

    match format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false),
                )
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .compact()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .with_thread_ids(false),
                )
                .init();
        }
    }
}
