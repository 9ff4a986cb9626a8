//! Route handlers for the forwarding API.
//!
//! # Responsibilities
//! - Parse the caller's JSON parameters into a request descriptor
//! - Reject missing required fields distinctly from transport errors
//! - Map forwarding outcomes to response statuses (200 success, 401 otherwise)

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::forward::{ForwardOutcome, RequestDescriptor};
use crate::http::server::AppState;

/// Caller errors surfaced by the routing layer, distinct from any transport
/// error the forwarder reports.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("No url specified")]
    MissingUrl,

    #[error("No proxy specified")]
    MissingProxy,

    #[error("Invalid parameters: {0}")]
    Invalid(#[from] serde_json::Error),
}

impl RouteError {
    fn status(&self) -> StatusCode {
        match self {
            RouteError::MissingUrl | RouteError::MissingProxy => StatusCode::FORBIDDEN,
            RouteError::Invalid(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub(crate) async fn health() -> StatusCode {
    StatusCode::OK
}

/// `POST /get`: read-style forwarding. The fetch route requires an upstream
/// proxy; this asymmetry with `/post` is per-endpoint policy, not a bug.
pub(crate) async fn fetch(State(state): State<AppState>, body: String) -> Response {
    let request_id = Uuid::new_v4();
    match parse_descriptor(&body, true) {
        Ok(descriptor) => {
            tracing::debug!(request_id = %request_id, url = %descriptor.url, "fetch");
            respond(state.forwarder.fetch(&descriptor).await)
        }
        Err(err) => {
            tracing::warn!(request_id = %request_id, error = %err, "fetch rejected");
            reject(err, "fetch-route")
        }
    }
}

/// `POST /post`: write-style forwarding. `url` is required; `proxy` is not.
pub(crate) async fn submit(State(state): State<AppState>, body: String) -> Response {
    let request_id = Uuid::new_v4();
    match parse_descriptor(&body, false) {
        Ok(descriptor) => {
            tracing::debug!(request_id = %request_id, url = %descriptor.url, "submit");
            respond(state.forwarder.submit(&descriptor).await)
        }
        Err(err) => {
            tracing::warn!(request_id = %request_id, error = %err, "submit rejected");
            reject(err, "post-route")
        }
    }
}

pub(crate) async fn not_found() -> Response {
    let error = json!({
        "error": "Not Found",
        "success": false,
    });
    (StatusCode::NOT_FOUND, Json(error)).into_response()
}

fn parse_descriptor(body: &str, require_proxy: bool) -> Result<RequestDescriptor, RouteError> {
    let params: Value = serde_json::from_str(body)?;
    if require_proxy && params.get("proxy").map_or(true, Value::is_null) {
        return Err(RouteError::MissingProxy);
    }
    if params.get("url").map_or(true, Value::is_null) {
        return Err(RouteError::MissingUrl);
    }
    Ok(serde_json::from_value(params)?)
}

fn respond(outcome: ForwardOutcome) -> Response {
    let status = if outcome.is_success() {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };
    (status, Json(outcome)).into_response()
}

fn reject(err: RouteError, route: &'static str) -> Response {
    let error = json!({
        "error": err.to_string(),
        "success": false,
        "type": route,
    });
    (err.status(), Json(error)).into_response()
}
