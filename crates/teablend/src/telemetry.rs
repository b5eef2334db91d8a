use crate::config::TelemetryConfig;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

const CRATE_TARGETS: [&str; 2] = ["teablend", "teablend_cli"];

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("log filter '{directive}' is not a valid tracing directive")]
    InvalidFilter {
        directive: String,
        #[source]
        source: ParseError,
    },
    #[error("a global tracing subscriber is already installed: {0}")]
    AlreadyInstalled(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A bare level such as `debug` applies to the engine and its front end
/// only; dependencies stay at `warn`. Anything else is used verbatim.
fn directive(log_level: &str) -> String {
    let level = log_level.trim();
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }

    std::iter::once("warn".to_string())
        .chain(CRATE_TARGETS.iter().map(|target| format!("{target}={level}")))
        .collect::<Vec<_>>()
        .join(",")
}

fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let directive = directive(&config.log_level);
    EnvFilter::try_new(&directive).map_err(|source| TelemetryError::InvalidFilter { directive, source })
}

/// Installs the global subscriber. Output goes to stderr so stdout carries
/// only command results.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)
}
