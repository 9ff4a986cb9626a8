//! Session-affine forwarding HTTP proxy library.

pub mod affinity;
pub mod config;
pub mod forward;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use affinity::{AffinityCache, SessionRecord};
pub use config::ProxyConfig;
pub use forward::{Forwarder, RequestDescriptor};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
