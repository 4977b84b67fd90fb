//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Every route target must be a bare `http://host[:port]` URL
//! - Prefixes must be absolute and unique
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system; a gateway with one
//!   broken route refuses to start instead of serving the others

use std::collections::HashMap;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{GatewayConfig, RouteConfig};
use crate::routing::{TargetError, UpstreamTarget};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("route name must not be empty (prefix {prefix:?})")]
    EmptyRouteName { prefix: String },

    #[error("route `{name}`: prefix {prefix:?} must start with '/' and contain no '?', '#' or '*'")]
    InvalidPrefix { name: String, prefix: String },

    #[error("route `{name}`: prefix {prefix:?} is already used by route `{existing}`")]
    DuplicatePrefix {
        name: String,
        prefix: String,
        existing: String,
    },

    #[error("route `{name}`: invalid target {target:?}: {source}")]
    InvalidTarget {
        name: String,
        target: String,
        source: TargetError,
    },

    #[error("invalid {field} address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("timeout `{0}` must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("health path {0:?} must start with '/' and contain no '{{', '}}', '*' or ':'")]
    InvalidHealthPath(String),
}

/// Validate the complete configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = route_errors(&config.routes);

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "metrics",
            value: config.observability.metrics_address.clone(),
        });
    }

    let timeouts = [
        ("connect_ms", config.timeouts.connect_ms),
        ("upstream_ms", config.timeouts.upstream_ms),
        ("pool_idle_ms", config.timeouts.pool_idle_ms),
    ];
    for (field, value) in timeouts {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(field));
        }
    }

    let health = &config.health.path;
    if !health.starts_with('/') || health.contains(['{', '}', '*', ':']) {
        errors.push(ValidationError::InvalidHealthPath(health.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate route definitions only. Used by the route table as well.
pub fn validate_routes(routes: &[RouteConfig]) -> Result<(), Vec<ValidationError>> {
    let errors = route_errors(routes);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn route_errors(routes: &[RouteConfig]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashMap<&str, &str> = HashMap::new();

    for route in routes {
        if route.name.is_empty() {
            errors.push(ValidationError::EmptyRouteName {
                prefix: route.prefix.clone(),
            });
        }

        if !is_valid_prefix(&route.prefix) {
            errors.push(ValidationError::InvalidPrefix {
                name: route.name.clone(),
                prefix: route.prefix.clone(),
            });
        } else if let Some(existing) = seen.get(route.prefix.as_str()) {
            errors.push(ValidationError::DuplicatePrefix {
                name: route.name.clone(),
                prefix: route.prefix.clone(),
                existing: existing.to_string(),
            });
        } else {
            seen.insert(&route.prefix, &route.name);
        }

        if let Err(source) = UpstreamTarget::parse(&route.target) {
            errors.push(ValidationError::InvalidTarget {
                name: route.name.clone(),
                target: route.target.clone(),
                source,
            });
        }
    }

    errors
}

fn is_valid_prefix(prefix: &str) -> bool {
    prefix.starts_with('/') && !prefix.contains(['?', '#', '*'])
}
