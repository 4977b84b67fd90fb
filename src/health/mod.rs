//! The gateway's own liveness endpoint.
//!
//! Reports on this process only. Backends are not probed; each backend
//! exposes its own health endpoint for fleet-wide checks.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

/// Liveness state. The gateway only ever reports itself as up while it can
/// answer at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Liveness {
    Up,
}

/// Payload of the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub service: String,
    pub status: Liveness,
}

/// Answers health requests with a fixed payload.
#[derive(Debug, Clone)]
pub struct HealthResponder {
    service_name: Arc<str>,
}

impl HealthResponder {
    pub fn new(service_name: impl Into<Arc<str>>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            service: self.service_name.to_string(),
            status: Liveness::Up,
        }
    }
}

/// `GET <health path>` handler.
pub async fn health_handler(State(responder): State<HealthResponder>) -> Json<HealthStatus> {
    Json(responder.health())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_names_service_and_is_up() {
        let status = HealthResponder::new("API Gateway").health();
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "service": "API Gateway", "status": "UP" })
        );
    }
}
