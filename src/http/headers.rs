//! Header manipulation for forwarded traffic.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers in both directions
//! - Overwrite Host with the backend authority
//! - Add X-Forwarded-For, X-Forwarded-Proto, X-Forwarded-Host
//!
//! # Design Decisions
//! - Headers named in `Connection` are hop-by-hop too (RFC 9110 §7.6.1)
//! - Client IP is appended to any X-Forwarded-For list already present
//! - Everything else is copied verbatim, including duplicates

use std::net::IpAddr;

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};

/// Headers that only apply to a single transport hop.
pub const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_FORWARDED_HOST: &str = "x-forwarded-host";
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Names listed in the `Connection` header(s), lowercased.
fn connection_tokens(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|token| token.trim().to_ascii_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

fn is_hop_by_hop(name: &HeaderName, listed: &[String]) -> bool {
    HOP_BY_HOP.contains(&name.as_str()) || listed.iter().any(|token| token == name.as_str())
}

/// Remove hop-by-hop headers in place.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in connection_tokens(headers) {
        headers.remove(name.as_str());
    }
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}

/// Build the outbound header map from the inbound one.
///
/// `original_host` is the authority the client addressed (Host header or
/// HTTP/2 `:authority`).
pub fn forwarding_headers(
    inbound: &HeaderMap,
    upstream_host: &HeaderValue,
    original_host: Option<&HeaderValue>,
    client_ip: Option<IpAddr>,
) -> HeaderMap {
    let listed = connection_tokens(inbound);
    let mut outbound = HeaderMap::with_capacity(inbound.len() + 3);

    for (name, value) in inbound {
        if *name == header::HOST || is_hop_by_hop(name, &listed) {
            continue;
        }
        outbound.append(name.clone(), value.clone());
    }

    outbound.insert(header::HOST, upstream_host.clone());

    if let Some(ip) = client_ip {
        let forwarded_for = match inbound.get(X_FORWARDED_FOR).and_then(|v| v.to_str().ok()) {
            Some(existing) if !existing.trim().is_empty() => format!("{existing}, {ip}"),
            _ => ip.to_string(),
        };
        if let Ok(value) = HeaderValue::from_str(&forwarded_for) {
            outbound.insert(X_FORWARDED_FOR, value);
        }
    }

    if !outbound.contains_key(X_FORWARDED_HOST) {
        if let Some(host) = original_host {
            outbound.insert(X_FORWARDED_HOST, host.clone());
        }
    }
    if !outbound.contains_key(X_FORWARDED_PROTO) {
        outbound.insert(X_FORWARDED_PROTO, HeaderValue::from_static("http"));
    }

    outbound
}
