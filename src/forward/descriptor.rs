//! Caller-supplied description of one outbound request.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

/// Upstream proxy specification.
///
/// Callers send either a bare URL string or an object carrying the URL under
/// a `parsed` field. An object without `parsed` means no proxy at all.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProxySpec {
    Url(String),
    Object {
        #[serde(default)]
        parsed: Option<String>,
    },
}

impl ProxySpec {
    /// The proxy URL, if one was actually supplied.
    pub fn url(&self) -> Option<&str> {
        match self {
            ProxySpec::Url(url) => Some(url),
            ProxySpec::Object { parsed } => parsed.as_deref(),
        }
    }
}

/// Parameters for one forwarding call. Constructed per call, never persisted.
///
/// `headers` is deliberately tri-state: absent, empty, or populated. Absent
/// skips the caller-header merge step entirely, which is not the same thing
/// as merging an empty map.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RequestDescriptor {
    pub url: String,
    pub proxy: Option<ProxySpec>,
    pub headers: Option<HashMap<String, String>>,
    /// Form-encoded request body; only sent for submit (POST) calls.
    pub body: Option<HashMap<String, Value>>,
    pub params: Option<HashMap<String, Value>>,
    /// Per-call timeout in seconds; the configured default applies when absent.
    pub timeout: Option<u64>,
    pub disable_intercept: Option<bool>,
    pub intercept: Option<bool>,
    /// Asymmetric defaults apply when absent: true for submit, false for fetch.
    pub verify_ssl: Option<bool>,
}

impl RequestDescriptor {
    /// Whether this call participates in session affinity and follows
    /// redirects. `disable_intercept` wins over `intercept` when both are
    /// present; interception is on by default.
    pub fn intercept_enabled(&self) -> bool {
        match (self.disable_intercept, self.intercept) {
            (Some(disabled), _) => !disabled,
            (None, Some(enabled)) => enabled,
            (None, None) => true,
        }
    }
}
