//! Path prefix matching.
//!
//! # Design Decisions
//! - Matching is case-sensitive and byte-exact
//! - Prefixes respect segment boundaries: `/api/users` matches `/api/users`
//!   and `/api/users/42`, never `/api/usersettings`
//! - A prefix ending in `/` matches anything below it
//! - No regex to guarantee O(n) matching

/// Matches the request path against a literal prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns true if `path` lies at or below this prefix.
    pub fn matches(&self, path: &str) -> bool {
        match path.strip_prefix(self.prefix.as_str()) {
            Some("") => true,
            Some(rest) => self.prefix.ends_with('/') || rest.starts_with('/'),
            None => false,
        }
    }
}

/// A `<literal>/*rest` pattern. The capture keeps its leading slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardPattern {
    literal: String,
}

impl WildcardPattern {
    /// Compile a wildcard pattern from a route prefix. Trailing slashes on the
    /// prefix belong to the capture, so `/` captures every path.
    pub fn from_prefix(prefix: &str) -> Self {
        Self {
            literal: prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Returns the captured `/rest`, or `None` when `path` is outside the
    /// pattern. A path equal to the literal yields an empty capture.
    pub fn capture<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.literal.as_str())?;
        if rest.is_empty() || rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }

    /// Matcher equivalent to this pattern.
    pub fn matcher(&self) -> PathPrefixMatcher {
        PathPrefixMatcher::new(self.literal.clone())
    }
}
