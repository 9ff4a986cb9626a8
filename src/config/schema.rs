//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files, and
//! every section has defaults so an empty document is a valid config.

use serde::{Deserialize, Serialize};

/// Root configuration for the forwarding proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, request timeout).
    pub listener: ListenerConfig,

    /// Session affinity cache settings.
    pub affinity: AffinityConfig,

    /// Outbound forwarding settings.
    pub forward: ForwardConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:9000").
    pub bind_address: String,

    /// Whole-request timeout in seconds for inbound calls. Generous, since
    /// a forwarding call may legitimately wait on a slow upstream.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:9000".to_string(),
            request_timeout_secs: 1500,
        }
    }
}

/// Session affinity cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AffinityConfig {
    /// Maximum number of resident session records. The cache itself defaults
    /// lower; the forwarding read path runs at 5000.
    pub capacity: usize,

    /// Time-to-live in seconds, measured from an entry's last write.
    pub ttl_secs: u64,
}

impl Default for AffinityConfig {
    fn default() -> Self {
        Self {
            capacity: 5000,
            ttl_secs: 240,
        }
    }
}

/// Outbound forwarding configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardConfig {
    /// Per-call timeout in seconds when the caller does not supply one.
    pub default_timeout_secs: u64,

    /// Report completed responses with status >= 400 in the error shape
    /// (no `encoded` field) and skip the affinity hook for them.
    pub strict_status: bool,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: 10,
            strict_status: false,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_yields_defaults() {
        let config: ProxyConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:9000");
        assert_eq!(config.affinity.capacity, 5000);
        assert_eq!(config.affinity.ttl_secs, 240);
        assert_eq!(config.forward.default_timeout_secs, 10);
        assert!(!config.forward.strict_status);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [affinity]
            capacity = 100
            "#,
        )
        .unwrap();
        assert_eq!(config.affinity.capacity, 100);
        assert_eq!(config.affinity.ttl_secs, 240);
    }
}
