//! Session affinity subsystem.
//!
//! # Data Flow
//! ```text
//! destination URL + identity keys
//!     → fingerprint.rs (normalize origin, hash)
//!     → cache.rs (bounded TTL/LRU store of cookies + headers)
//!     → forward::Forwarder (sole reader/writer)
//! ```
//!
//! # Design Decisions
//! - The cache is constructed once at startup and injected; no global singleton
//! - Eviction is strict LRU; expiry is a fixed TTL from last write
//! - No lock spans the lookup → network call → write-back sequence; concurrent
//!   calls to one fingerprint race and the last write wins

pub mod cache;
pub mod fingerprint;

pub use cache::{AffinityCache, SessionRecord};
pub use fingerprint::fingerprint;
