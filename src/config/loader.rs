//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::ValidationError;

/// Environment variable overriding the listener bind address.
pub const BIND_ADDRESS_ENV: &str = "GATEWAY_BIND_ADDRESS";

/// Error type for configuration loading. Always fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read configuration from a TOML file, or start from the defaults when no
/// file is given. The result is not validated yet.
pub fn read_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            parse_config(&content)
        }
        None => Ok(GatewayConfig::default()),
    }
}

/// Parse a TOML document into a configuration.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Apply environment overrides using `lookup` to resolve variables.
///
/// Empty values are ignored, so an exported-but-blank variable keeps the
/// configured value.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

    if let Some(bind) = non_empty(BIND_ADDRESS_ENV) {
        config.listener.bind_address = bind;
    }

    for route in &mut config.routes {
        let Some(key) = route.target_env.as_deref() else {
            continue;
        };
        if let Some(target) = non_empty(key) {
            tracing::debug!(route = %route.name, env = %key, "Route target overridden from environment");
            route.target = target;
        }
    }
}
