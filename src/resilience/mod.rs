//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to backend:
//!     → timeouts.rs (enforce the upstream deadline)
//!     → On failure: mapped to 502/504, never retried
//! ```
//!
//! # Design Decisions
//! - Every upstream call has a deadline
//! - One attempt per request, for every method

pub mod timeouts;
