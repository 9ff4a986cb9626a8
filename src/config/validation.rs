//! Semantic validation of a deserialized config.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// A single semantic problem found in a config document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("affinity.capacity must be greater than zero")]
    ZeroAffinityCapacity,

    #[error("affinity.ttl_secs must be greater than zero")]
    ZeroAffinityTtl,

    #[error("forward.default_timeout_secs must be greater than zero")]
    ZeroDefaultTimeout,

    #[error("observability.metrics_address {0:?} is not a valid socket address")]
    InvalidMetricsAddress(String),
}

/// Check everything serde cannot express. Collects all problems instead of
/// stopping at the first.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.affinity.capacity == 0 {
        errors.push(ValidationError::ZeroAffinityCapacity);
    }
    if config.affinity.ttl_secs == 0 {
        errors.push(ValidationError::ZeroAffinityTtl);
    }
    if config.forward.default_timeout_secs == 0 {
        errors.push(ValidationError::ZeroDefaultTimeout);
    }
    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
