//! Backend authority parsing.

use std::str::FromStr;

use axum::http::header::HeaderValue;
use axum::http::uri::{Authority, Scheme, Uri};
use thiserror::Error;
use url::Url;

/// Why a configured target was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("not a valid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("unsupported scheme `{0}`, only http is supported")]
    Scheme(String),

    #[error("missing host")]
    MissingHost,

    #[error("expected a bare authority without path, query, fragment or credentials")]
    NotAnAuthority,

    #[error("invalid authority: {0}")]
    Authority(String),
}

/// A validated `http://host[:port]` backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    authority: Authority,
    host_header: HeaderValue,
}

impl UpstreamTarget {
    /// Parse and validate a backend base URL.
    pub fn parse(raw: &str) -> Result<Self, TargetError> {
        let url = Url::parse(raw)?;

        if url.scheme() != "http" {
            return Err(TargetError::Scheme(url.scheme().to_string()));
        }
        let host = url.host_str().ok_or(TargetError::MissingHost)?;

        let has_extras = !url.username().is_empty()
            || url.password().is_some()
            || url.query().is_some()
            || url.fragment().is_some()
            || url.path() != "/";
        if has_extras {
            return Err(TargetError::NotAnAuthority);
        }

        let authority = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        let authority =
            Authority::from_str(&authority).map_err(|e| TargetError::Authority(e.to_string()))?;
        let host_header = HeaderValue::from_str(authority.as_str())
            .map_err(|e| TargetError::Authority(e.to_string()))?;

        Ok(Self {
            authority,
            host_header,
        })
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Value sent as the outbound `Host` header.
    pub fn host_header(&self) -> &HeaderValue {
        &self.host_header
    }

    /// Absolute URI for `path` (and the untouched `query`) on this backend.
    pub fn uri_for(&self, path: &str, query: Option<&str>) -> Result<Uri, axum::http::Error> {
        let path_and_query = match query {
            Some(query) => format!("{path}?{query}"),
            None => path.to_string(),
        };
        Uri::builder()
            .scheme(Scheme::HTTP)
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
    }
}

impl std::fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "http://{}", self.authority)
    }
}
