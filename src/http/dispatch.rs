//! Proxy dispatch.
//!
//! # Responsibilities
//! - Match the request path against the route table
//! - Rewrite the path per route policy and retarget the authority
//! - Forward method, headers and streamed body to the backend
//! - Map transport failures to 502/504
//!
//! # Design Decisions
//! - The inbound request is consumed, never rewritten in place; the
//!   outbound request is a fresh value
//! - One attempt per request, whatever the method
//! - Outbound connections come from a pool keyed by backend authority;
//!   hyper returns them on completion and drops them on I/O error
//! - Dropping the dispatch future (client went away) drops the outbound
//!   call with it

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Request};
use axum::response::{IntoResponse, Response};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::{TokioExecutor, TokioTimer},
};

use crate::config::TimeoutConfig;
use crate::error::GatewayError;
use crate::http::headers::forwarding_headers;
use crate::http::request::RequestIdExt;
use crate::http::response::{from_upstream, ProxyTrace};
use crate::observability::metrics;
use crate::resilience::timeouts::{with_deadline, Deadline};
use crate::routing::{Route, RouteTable};

/// Pooled outbound HTTP client.
pub type UpstreamClient = Client<HttpConnector, Body>;

/// Build the outbound client shared by every dispatch.
pub fn upstream_client(timeouts: &TimeoutConfig) -> UpstreamClient {
    let mut connector = HttpConnector::new();
    connector.set_connect_timeout(Some(Duration::from_millis(timeouts.connect_ms)));
    connector.set_nodelay(true);

    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_millis(timeouts.pool_idle_ms))
        .pool_timer(TokioTimer::new())
        .build(connector)
}

/// Routes requests to backends.
#[derive(Clone)]
pub struct Dispatcher {
    routes: Arc<RouteTable>,
    client: UpstreamClient,
    upstream_timeout: Duration,
}

impl Dispatcher {
    pub fn new(routes: Arc<RouteTable>, timeouts: &TimeoutConfig) -> Self {
        Self {
            routes,
            client: upstream_client(timeouts),
            upstream_timeout: Duration::from_millis(timeouts.upstream_ms),
        }
    }

    /// Dispatch one request. Always produces a response.
    pub async fn dispatch(&self, request: Request<Body>) -> Response {
        let request_id = request.request_id().to_string();
        let original_path = request.uri().path().to_string();

        let Some(route) = self.routes.lookup(&original_path) else {
            tracing::warn!(request_id = %request_id, path = %original_path, "No route matched");
            return GatewayError::NoRouteMatch {
                path: original_path,
            }
            .into_response();
        };

        let forwarded_path = route.rewrite(&original_path).into_owned();
        tracing::debug!(
            request_id = %request_id,
            method = %request.method(),
            route = %route.name(),
            mode = %route.mode(),
            path = %original_path,
            forwarded_path = %forwarded_path,
            "Proxying request"
        );

        let mut response = match self.forward(route, request, &forwarded_path).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    request_id = %request_id,
                    route = %route.name(),
                    upstream = %route.target(),
                    error = %e,
                    "Upstream error"
                );
                metrics::record_upstream_error(route.name(), e.kind());
                e.into_response()
            }
        };

        response.extensions_mut().insert(ProxyTrace {
            route: route.name().to_string(),
            upstream: route.target().authority().to_string(),
            original_path,
            forwarded_path,
        });
        response
    }

    async fn forward(
        &self,
        route: &Route,
        request: Request<Body>,
        forwarded_path: &str,
    ) -> Result<Response, GatewayError> {
        let client_ip = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        let (parts, body) = request.into_parts();

        let target = route.target();
        let uri = target.uri_for(forwarded_path, parts.uri.query())?;

        let original_host = parts.headers.get(header::HOST).cloned().or_else(|| {
            parts
                .uri
                .authority()
                .and_then(|authority| authority.as_str().parse().ok())
        });
        let headers = forwarding_headers(
            &parts.headers,
            target.host_header(),
            original_host.as_ref(),
            client_ip,
        );

        let mut outbound = Request::builder().method(parts.method).uri(uri).body(body)?;
        *outbound.headers_mut() = headers;

        let upstream = target.authority().to_string();
        let response = with_deadline(self.upstream_timeout, self.client.request(outbound))
            .await
            .map_err(|e| match e {
                Deadline::Elapsed(timeout) => GatewayError::BackendTimeout { upstream, timeout },
                Deadline::Failed(source) => GatewayError::BackendUnreachable { upstream, source },
            })?;

        Ok(from_upstream(response, self.upstream_timeout))
    }
}
