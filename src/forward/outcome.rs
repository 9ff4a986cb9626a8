//! Forwarding outcome classification and wire shape.
//!
//! # Design Decisions
//! - Any 2xx–5xx response is a completed exchange, not a failure
//! - `encoded` exists only on the fully successful path; no other field is
//!   ever silently omitted
//! - Transport failures carry an error kind plus a human-readable message

use std::collections::HashMap;

use serde::Serialize;

/// Classification of a failed forwarding attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// The upstream proxy could not be reached or rejected the connection.
    ProxyError,
    /// The call exceeded its configured timeout.
    ConnectionTimeout,
    /// DNS failure, refused connection, reset.
    ConnectionError,
    /// Anything else, including unparseable target URLs.
    GeneralError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ProxyError => "proxy-error",
            ErrorKind::ConnectionTimeout => "connection-timeout",
            ErrorKind::ConnectionError => "connection-error",
            ErrorKind::GeneralError => "general-error",
        }
    }
}

/// Result of one forwarding call, in the shape returned to callers.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ForwardOutcome {
    /// Completed exchange on the fully successful path.
    Success {
        response: String,
        encoded: String,
        response_url: String,
        status: u16,
        headers: HashMap<String, String>,
        success: bool,
    },
    /// Completed exchange reported as an error under strict-status mode:
    /// same shape as success minus `encoded`.
    HttpError {
        response: String,
        response_url: String,
        status: u16,
        headers: HashMap<String, String>,
        success: bool,
    },
    /// The exchange never completed.
    Failure {
        error: ErrorKind,
        message: String,
        success: bool,
    },
}

impl ForwardOutcome {
    pub fn success(
        response: String,
        encoded: String,
        response_url: String,
        status: u16,
        headers: HashMap<String, String>,
    ) -> Self {
        ForwardOutcome::Success {
            response,
            encoded,
            response_url,
            status,
            headers,
            success: true,
        }
    }

    pub fn http_error(
        response: String,
        response_url: String,
        status: u16,
        headers: HashMap<String, String>,
    ) -> Self {
        ForwardOutcome::HttpError {
            response,
            response_url,
            status,
            headers,
            success: false,
        }
    }

    pub fn failure(error: ErrorKind, message: String) -> Self {
        ForwardOutcome::Failure {
            error,
            message,
            success: false,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ForwardOutcome::Success { .. })
    }

    /// Upstream status, when the exchange completed.
    pub fn status(&self) -> Option<u16> {
        match self {
            ForwardOutcome::Success { status, .. } => Some(*status),
            ForwardOutcome::HttpError { status, .. } => Some(*status),
            ForwardOutcome::Failure { .. } => None,
        }
    }

    /// Stable label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            ForwardOutcome::Success { .. } => "success",
            ForwardOutcome::HttpError { .. } => "http-error",
            ForwardOutcome::Failure { error, .. } => error.as_str(),
        }
    }
}
