//! Path rewrite policies.
//!
//! # Modes
//! - `PassThrough`: the upstream sees the original path
//! - `StripPrefix`: the configured prefix is removed by exact string removal
//! - `WildcardCapture`: the route is a `<prefix>/*rest` pattern and `/rest`
//!   alone is forwarded
//!
//! Every mode yields an absolute path. Query strings are not part of the
//! path and are carried over by the dispatcher untouched.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::routing::matcher::{PathPrefixMatcher, WildcardPattern};

/// Per-route rewrite policy, as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteMode {
    PassThrough,
    StripPrefix,
    WildcardCapture,
}

impl RewriteMode {
    /// One-off rewrite of `path` under `prefix`. Routes compile a
    /// [`PathRewriter`] once instead.
    pub fn rewrite(self, prefix: &str, path: &str) -> String {
        PathRewriter::compile(self, prefix).rewrite(path).into_owned()
    }
}

impl std::fmt::Display for RewriteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RewriteMode::PassThrough => "pass_through",
            RewriteMode::StripPrefix => "strip_prefix",
            RewriteMode::WildcardCapture => "wildcard_capture",
        };
        f.write_str(name)
    }
}

/// A rewrite policy compiled against one route prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathRewriter {
    PassThrough,
    StripPrefix { prefix: String },
    WildcardCapture(WildcardPattern),
}

impl PathRewriter {
    pub fn compile(mode: RewriteMode, prefix: &str) -> Self {
        match mode {
            RewriteMode::PassThrough => PathRewriter::PassThrough,
            RewriteMode::StripPrefix => PathRewriter::StripPrefix {
                prefix: prefix.to_string(),
            },
            RewriteMode::WildcardCapture => {
                PathRewriter::WildcardCapture(WildcardPattern::from_prefix(prefix))
            }
        }
    }

    /// The matcher that selects paths this rewriter accepts.
    ///
    /// A wildcard route also accepts its bare literal (`/api/users` for
    /// `/api/users/`), the other modes match the configured prefix.
    pub fn matcher(&self, prefix: &str) -> PathPrefixMatcher {
        match self {
            PathRewriter::WildcardCapture(pattern) => pattern.matcher(),
            _ => PathPrefixMatcher::new(prefix),
        }
    }

    /// Compute the upstream path for `path`, which must have matched the
    /// route this rewriter was compiled for.
    pub fn rewrite<'a>(&self, path: &'a str) -> Cow<'a, str> {
        match self {
            PathRewriter::PassThrough => Cow::Borrowed(path),
            PathRewriter::StripPrefix { prefix } => match path.strip_prefix(prefix.as_str()) {
                Some(rest) => absolute(rest),
                None => {
                    tracing::warn!(path = %path, prefix = %prefix, "Path outside strip prefix, forwarding root");
                    Cow::Borrowed("/")
                }
            },
            PathRewriter::WildcardCapture(pattern) => match pattern.capture(path) {
                Some(rest) => absolute(rest),
                None => {
                    tracing::warn!(path = %path, literal = %pattern.literal(), "Path outside wildcard pattern, forwarding root");
                    Cow::Borrowed("/")
                }
            },
        }
    }
}

fn absolute(rest: &str) -> Cow<'_, str> {
    if rest.is_empty() {
        Cow::Borrowed("/")
    } else if rest.starts_with('/') {
        Cow::Borrowed(rest)
    } else {
        Cow::Owned(format!("/{rest}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(mode: RewriteMode, prefix: &str, path: &str) -> String {
        mode.rewrite(prefix, path)
    }

    #[test]
    fn pass_through_keeps_path() {
        assert_eq!(
            rewrite(RewriteMode::PassThrough, "/api/events", "/api/events/7/rsvp"),
            "/api/events/7/rsvp"
        );
    }

    #[test]
    fn strip_prefix_removes_prefix() {
        assert_eq!(
            rewrite(RewriteMode::StripPrefix, "/api/users", "/api/users/42/profile"),
            "/42/profile"
        );
    }

    #[test]
    fn strip_prefix_exact_match_becomes_root() {
        assert_eq!(rewrite(RewriteMode::StripPrefix, "/api/users", "/api/users"), "/");
    }

    #[test]
    fn strip_prefix_with_trailing_slash_stays_absolute() {
        assert_eq!(
            rewrite(RewriteMode::StripPrefix, "/static/", "/static/css/app.css"),
            "/css/app.css"
        );
        assert_eq!(rewrite(RewriteMode::StripPrefix, "/static/", "/static/"), "/");
    }

    #[test]
    fn strip_prefix_is_not_repeated() {
        assert_eq!(
            rewrite(RewriteMode::StripPrefix, "/api", "/api/api/x"),
            "/api/x"
        );
    }

    #[test]
    fn strip_prefix_outside_prefix_falls_back_to_root() {
        assert_eq!(rewrite(RewriteMode::StripPrefix, "/api", "/other"), "/");
    }

    #[test]
    fn wildcard_forwards_capture() {
        assert_eq!(
            rewrite(RewriteMode::WildcardCapture, "/api/users", "/api/users/login"),
            "/login"
        );
        assert_eq!(
            rewrite(RewriteMode::WildcardCapture, "/api/users/", "/api/users"),
            "/"
        );
    }

    #[test]
    fn root_wildcard_forwards_whole_path() {
        assert_eq!(
            rewrite(RewriteMode::WildcardCapture, "/", "/static/app.js"),
            "/static/app.js"
        );
        assert_eq!(rewrite(RewriteMode::WildcardCapture, "/", "/"), "/");
    }

    #[test]
    fn wildcard_matcher_accepts_bare_literal() {
        let rewriter = PathRewriter::compile(RewriteMode::WildcardCapture, "/api/users/");
        let matcher = rewriter.matcher("/api/users/");
        assert!(matcher.matches("/api/users"));
        assert!(matcher.matches("/api/users/1"));

        let strip = PathRewriter::compile(RewriteMode::StripPrefix, "/api/users/");
        assert!(!strip.matcher("/api/users/").matches("/api/users"));
    }

    #[test]
    fn mode_names_match_config_spelling() {
        let mode: RewriteMode = serde_json::from_str("\"wildcard_capture\"").unwrap();
        assert_eq!(mode, RewriteMode::WildcardCapture);
        assert_eq!(RewriteMode::StripPrefix.to_string(), "strip_prefix");
    }
}
