//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, health route, proxy fallback)
//!     → request.rs (request ID)
//!     → dispatch.rs (route lookup, rewrite, forward)
//!     → headers.rs (hop-by-hop, Host, X-Forwarded-*)
//!     → response.rs (stream backend response, attach ProxyTrace)
//!     → middleware/access_log.rs (log + metrics with the original path)
//!     → Send to client
//! ```

pub mod dispatch;
pub mod headers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use dispatch::Dispatcher;
pub use request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use response::ProxyTrace;
pub use server::{AppState, HttpServer};
