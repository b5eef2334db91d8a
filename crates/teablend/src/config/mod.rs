use crate::engine::EngineConfig;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Distinguishes runtime behavior for different stages of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the engine and its tooling.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    /// Alternate catalog document; the bundled catalog is used when unset.
    pub catalog_path: Option<PathBuf>,
    pub engine: EngineConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let catalog_path = env::var("TEABLEND_CATALOG_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let defaults = EngineConfig::default();
        let engine = EngineConfig {
            axis_blend_weight: read_number("TEABLEND_AXIS_BLEND_WEIGHT", defaults.axis_blend_weight)?,
            affinity_weight: read_number("TEABLEND_AFFINITY_WEIGHT", defaults.affinity_weight)?,
            normalization_multiplier: read_number(
                "TEABLEND_NORMALIZATION_MULTIPLIER",
                defaults.normalization_multiplier,
            )?,
            signal_floor: read_number("TEABLEND_SIGNAL_FLOOR", defaults.signal_floor)?,
            axis_clamp: read_number("TEABLEND_AXIS_CLAMP", defaults.axis_clamp)?,
            affinity_tie_gap: read_number("TEABLEND_AFFINITY_TIE_GAP", defaults.affinity_tie_gap)?,
            explanation_signal_count: read_number(
                "TEABLEND_EXPLANATION_SIGNALS",
                defaults.explanation_signal_count,
            )?,
        };
        engine.validate().map_err(ConfigError::InvalidEngine)?;

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            catalog_path,
            engine,
        })
    }
}

fn read_number<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
        Err(_) => Ok(default),
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidNumber { var: &'static str, value: String },
    InvalidEngine(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { var, value } => {
                write!(f, "{var} must be a number, got '{value}'")
            }
            ConfigError::InvalidEngine(reason) => {
                write!(f, "engine configuration is invalid: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for var in [
            "APP_ENV",
            "APP_LOG_LEVEL",
            "TEABLEND_CATALOG_PATH",
            "TEABLEND_AXIS_BLEND_WEIGHT",
            "TEABLEND_AFFINITY_WEIGHT",
            "TEABLEND_NORMALIZATION_MULTIPLIER",
            "TEABLEND_SIGNAL_FLOOR",
            "TEABLEND_AXIS_CLAMP",
            "TEABLEND_AFFINITY_TIE_GAP",
            "TEABLEND_EXPLANATION_SIGNALS",
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.catalog_path.is_none());
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn engine_overrides_are_applied() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "ci");
        env::set_var("TEABLEND_AFFINITY_WEIGHT", "0.25");
        env::set_var("TEABLEND_EXPLANATION_SIGNALS", " 3 ");
        env::set_var("TEABLEND_CATALOG_PATH", "/srv/teablend/catalog.json");

        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Test);
        assert_eq!(config.engine.affinity_weight, 0.25);
        assert_eq!(config.engine.explanation_signal_count, 3);
        assert_eq!(
            config.catalog_path,
            Some(PathBuf::from("/srv/teablend/catalog.json"))
        );
    }

    #[test]
    fn rejects_non_numeric_override() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("TEABLEND_AXIS_CLAMP", "wide");

        let err = AppConfig::load().expect_err("invalid number");
        reset_env();

        assert!(matches!(
            err,
            ConfigError::InvalidNumber { var: "TEABLEND_AXIS_CLAMP", .. }
        ));
    }

    #[test]
    fn rejects_out_of_range_override() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("TEABLEND_AXIS_BLEND_WEIGHT", "1.4");

        let err = AppConfig::load().expect_err("weight above one");
        reset_env();

        assert!(err.to_string().contains("axis_blend_weight"));
    }
}
