//! Response handling.
//!
//! # Responsibilities
//! - Turn the backend response into the client response
//! - Strip hop-by-hop headers
//! - Attach the dispatch record for middleware running after the proxy step
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - The streamed body carries an idle deadline; a backend that stops
//!   sending mid-body cannot hold the client or the pooled connection
//! - Status, headers and body are otherwise passed through untouched

use std::time::Duration;

use axum::body::Body;
use axum::response::Response;
use hyper::body::Incoming;

use crate::http::headers::strip_hop_by_hop;
use crate::resilience::timeouts::IdleTimeoutBody;

/// What the dispatcher did with a request.
///
/// Inserted into response extensions so access logs and metrics can report
/// both the path the client sent and the path the backend received, without
/// the inbound request ever being rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyTrace {
    pub route: String,
    pub upstream: String,
    pub original_path: String,
    pub forwarded_path: String,
}

/// Convert a backend response into a streamed client response. The body
/// fails if the backend goes quiet for longer than `idle`.
pub fn from_upstream(response: hyper::Response<Incoming>, idle: Duration) -> Response {
    let (mut parts, body) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);
    Response::from_parts(parts, Body::new(IdleTimeoutBody::new(body, idle)))
}
