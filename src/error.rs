//! Request-time gateway errors and their HTTP mapping.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Errors produced while dispatching a single request.
///
/// Backend responses, 5xx included, are never turned into these; only
/// failures of the gateway itself are.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No route prefix matched the request path.
    #[error("no route matches path {path}")]
    NoRouteMatch { path: String },

    /// Connecting to or talking with the backend failed.
    #[error("upstream {upstream} unreachable: {source}")]
    BackendUnreachable {
        upstream: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },

    /// The backend did not answer before the deadline.
    #[error("upstream {upstream} did not respond within {timeout:?}")]
    BackendTimeout { upstream: String, timeout: Duration },

    /// The outbound request could not be assembled.
    #[error("could not build upstream request: {0}")]
    InvalidUpstreamRequest(#[from] axum::http::Error),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::NoRouteMatch { .. } => StatusCode::NOT_FOUND,
            GatewayError::BackendUnreachable { .. } => StatusCode::BAD_GATEWAY,
            GatewayError::BackendTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::InvalidUpstreamRequest(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::NoRouteMatch { .. } => "no_route",
            GatewayError::BackendUnreachable { .. } => "unreachable",
            GatewayError::BackendTimeout { .. } => "timeout",
            GatewayError::InvalidUpstreamRequest(_) => "invalid_request",
        }
    }

    /// Message shown to clients. Internal details stay in the logs.
    fn public_message(&self) -> &'static str {
        match self {
            GatewayError::NoRouteMatch { .. } => "No matching route found",
            GatewayError::BackendUnreachable { .. } => "Upstream request failed",
            GatewayError::BackendTimeout { .. } => "Upstream request timed out",
            GatewayError::InvalidUpstreamRequest(_) => "Upstream request could not be built",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    status: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.public_message(),
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_route_renders_json_404() {
        let response = GatewayError::NoRouteMatch {
            path: "/nowhere".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "No matching route found");
        assert_eq!(body["status"], 404);
    }

    #[test]
    fn timeout_maps_to_504() {
        let err = GatewayError::BackendTimeout {
            upstream: "user-service:8081".to_string(),
            timeout: Duration::from_secs(30),
        };
        assert_eq!(err.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(err.kind(), "timeout");
        assert!(err.to_string().contains("user-service:8081"));
    }
}
