//! Route lookup.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Look up the matching route for a request path
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Routes are kept sorted by prefix length, longest first; the sort is
//!   stable so equal lengths keep registration order
//! - O(n) prefix scan, first hit wins (acceptable for typical route counts)
//! - Explicit NoMatch rather than silent default

use std::borrow::Cow;

use crate::config::{ConfigError, RouteConfig, ValidationError};
use crate::config::validation::validate_routes;
use crate::routing::matcher::PathPrefixMatcher;
use crate::routing::rewrite::{PathRewriter, RewriteMode};
use crate::routing::target::UpstreamTarget;

/// A compiled route.
#[derive(Debug, Clone)]
pub struct Route {
    name: String,
    prefix: String,
    target: UpstreamTarget,
    mode: RewriteMode,
    matcher: PathPrefixMatcher,
    rewriter: PathRewriter,
}

impl Route {
    pub fn new(
        name: impl Into<String>,
        prefix: impl Into<String>,
        target: UpstreamTarget,
        mode: RewriteMode,
    ) -> Self {
        let prefix = prefix.into();
        let rewriter = PathRewriter::compile(mode, &prefix);
        let matcher = rewriter.matcher(&prefix);
        Self {
            name: name.into(),
            prefix,
            target,
            mode,
            matcher,
            rewriter,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn target(&self) -> &UpstreamTarget {
        &self.target
    }

    pub fn mode(&self) -> RewriteMode {
        self.mode
    }

    pub fn matches(&self, path: &str) -> bool {
        self.matcher.matches(path)
    }

    /// Upstream path for a request path this route matched.
    pub fn rewrite<'a>(&self, path: &'a str) -> Cow<'a, str> {
        self.rewriter.rewrite(path)
    }
}

/// Immutable prefix → backend table.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Order compiled routes for lookup. Callers outside this module go
    /// through `from_config`, which validates first.
    fn new(mut routes: Vec<Route>) -> Self {
        routes.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        Self { routes }
    }

    /// Validate and compile configured routes. Any invalid route fails the
    /// whole table.
    pub fn from_config(configs: &[RouteConfig]) -> Result<Self, ConfigError> {
        validate_routes(configs).map_err(ConfigError::Validation)?;

        let mut routes = Vec::with_capacity(configs.len());
        for config in configs {
            let target = UpstreamTarget::parse(&config.target).map_err(|source| {
                ConfigError::Validation(vec![ValidationError::InvalidTarget {
                    name: config.name.clone(),
                    target: config.target.clone(),
                    source,
                }])
            })?;
            routes.push(Route::new(
                config.name.clone(),
                config.prefix.clone(),
                target,
                config.rewrite,
            ));
        }

        Ok(Self::new(routes))
    }

    /// Longest-prefix match for `path`.
    pub fn lookup(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.matches(path))
    }

    /// Routes in lookup order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
