//! Access log middleware.
//!
//! # Responsibilities
//! - Log every request once the response is known
//! - Record request count and latency metrics per route
//!
//! # Design Decisions
//! - Proxied requests are reported from the `ProxyTrace` extension, so the
//!   log shows the path the client sent next to the path forwarded upstream
//! - Requests answered by the gateway itself log at debug under `route="local"`

use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};

use crate::http::request::RequestIdExt;
use crate::http::response::ProxyTrace;
use crate::observability::metrics;

pub async fn access_log(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request.request_id().to_string();

    let response = next.run(request).await;
    let status = response.status().as_u16();
    let elapsed_ms = start.elapsed().as_millis() as u64;

    match response.extensions().get::<ProxyTrace>() {
        Some(trace) => {
            tracing::info!(
                request_id = %request_id,
                method = %method,
                path = %trace.original_path,
                forwarded_path = %trace.forwarded_path,
                route = %trace.route,
                upstream = %trace.upstream,
                status,
                elapsed_ms,
                "Request proxied"
            );
            metrics::record_request(method.as_str(), status, &trace.route, start);
        }
        None => {
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status,
                elapsed_ms,
                "Request served locally"
            );
            metrics::record_request(method.as_str(), status, "local", start);
        }
    }

    response
}
