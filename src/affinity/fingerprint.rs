//! Fingerprint computation for session affinity.
//!
//! # Responsibilities
//! - Normalize a destination URL to its origin: scheme + host + trailing slash
//! - Fold caller-supplied identity keys into the affinity identifier
//! - Produce a deterministic hash usable as a cache key
//!
//! # Design Decisions
//! - Computation is pure and order-sensitive over the identity-key list
//! - Empty identity keys are filtered out before concatenation
//! - Path, query, and fragment never participate (affinity is origin-level)

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use url::Url;

/// Normalize a URL to its origin form, `scheme://host[:port]/`.
///
/// The trailing slash makes `https://a.com` and `https://a.com/` identical.
/// A scheme-default port is dropped during URL parsing, so a spelled-out
/// `https://a.com:443/` folds into `https://a.com/` as well; the two name
/// the same origin and share one affinity record.
fn normalized_origin(url: &Url) -> String {
    let mut origin = format!("{}://{}", url.scheme(), url.host_str().unwrap_or(""));
    if let Some(port) = url.port() {
        origin.push(':');
        origin.push_str(&port.to_string());
    }
    origin.push('/');
    origin
}

/// Compute the affinity fingerprint for a destination and identity keys.
///
/// Two requests to the same origin with the same key list collide on purpose;
/// that collision is what gives a logical client its session continuity.
pub fn fingerprint(url: &Url, identity_keys: &[String]) -> u64 {
    let mut identifier = normalized_origin(url);
    for key in identity_keys.iter().filter(|k| !k.is_empty()) {
        identifier.push_str(key);
    }

    let mut hasher = DefaultHasher::new();
    identifier.hash(&mut hasher);
    hasher.finish()
}
