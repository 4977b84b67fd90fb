//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → router.rs (longest-prefix lookup)
//!     → matcher.rs (segment-aware prefix test)
//!     → Return: matched Route or NoMatch
//!     → rewrite.rs (route policy → upstream path)
//!
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → Validate every entry, parse target authorities
//!     → Compile matchers and rewriters
//!     → Sort by prefix length
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: longest prefix wins, ties go to the first registered

pub mod matcher;
pub mod rewrite;
pub mod router;
pub mod target;

pub use rewrite::{PathRewriter, RewriteMode};
pub use router::{Route, RouteTable};
pub use target::{TargetError, UpstreamTarget};
