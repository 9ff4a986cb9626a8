//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! forwarding calls produce:
//!     → tracing events (structured, request-ID correlated)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Tracing subscriber is initialized in `main`, EnvFilter-driven
//! - Metric updates are cheap (atomic increments); recording never fails

pub mod metrics;
