//! HTTP service layer.
//!
//! # Data Flow
//! ```text
//! inbound connection
//!     → server.rs (Axum setup, middleware, graceful shutdown)
//!     → handlers.rs (/health, /get → fetch, /post → submit)
//!     → forward::Forwarder (the core)
//!     → JSON outcome back to the caller
//! ```
//!
//! This layer is thin glue by design: parameter extraction, caller-error
//! rejection, and status mapping. All forwarding semantics live in
//! `forward` and `affinity`.

pub mod handlers;
pub mod server;

pub use server::HttpServer;
