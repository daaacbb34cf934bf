use crate::presentation::config::{Environment, LoggingSettings};

/// Configuration for tracing initialization.
pub struct TracingConfig {
    pub environment: Environment,
    pub json_format: bool,
    pub default_level: String,
}

impl TracingConfig {
    /// JSON output is forced in production and can be requested anywhere with `LOG_FORMAT=json`.
    pub fn from_settings(logging: &LoggingSettings, environment: Environment) -> Self {
        Self {
            environment,
            json_format: logging.enable_json || environment.is_prod() || env_requests_json(),
            default_level: logging.level.clone(),
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::from_settings(
            &LoggingSettings::default(),
            Environment::from_env().unwrap_or_default(),
        )
    }
}

fn env_requests_json() -> bool {
    std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
