//! Request forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! caller JSON
//!     → descriptor.rs (parsed request parameters)
//!     → forwarder.rs (affinity lookup, outbound call, affinity write-back)
//!         → proxy.rs (upstream proxy scheme normalization)
//!         → encoding.rs (brotli passthrough decode, base64 projection)
//!     → outcome.rs (classified result, wire shape)
//! ```
//!
//! # Design Decisions
//! - One outbound call per invocation; transport failures are reported
//!   immediately, never retried
//! - Every failure is converted to the outcome shape at this boundary;
//!   nothing propagates to the caller as a raw error

pub mod descriptor;
pub mod encoding;
pub mod forwarder;
pub mod outcome;
pub mod proxy;

pub use descriptor::{ProxySpec, RequestDescriptor};
pub use forwarder::Forwarder;
pub use outcome::{ErrorKind, ForwardOutcome};
