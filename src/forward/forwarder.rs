//! Outbound request dispatch with session affinity.
//!
//! # Data Flow
//! ```text
//! descriptor
//!     → fingerprint (origin + identity keys)
//!     → affinity lookup (intercepting calls only)
//!     → outbound call (proxy slots, merged headers, seeded cookie jar,
//!       per-call timeout, redirect policy, TLS verification)
//!     → body decode (brotli passthrough, base64 projection)
//!     → affinity write-back (overwrite, or invalidate on 401/403)
//!     → classified outcome
//! ```
//!
//! # Design Decisions
//! - Redirects are followed only while intercepting; otherwise the raw
//!   redirect response is returned as-is
//! - Each call carries its own cookie jar, seeded from the affinity record.
//!   The jar sees every hop of a redirect chain, so a cookie set by an
//!   intermediate response is sent to the next hop and survives into the
//!   record. A caller-supplied Cookie header suppresses the jar's header
//!   for that request
//! - Session headers are applied under caller-supplied headers; the caller
//!   wins on conflict. An absent caller header map skips the merge step,
//!   which is not the same as supplying an empty map
//! - The lookup → call → write-back sequence is not atomic; concurrent calls
//!   to one fingerprint race and the last write wins

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_ENCODING};
use reqwest::redirect::Policy;
use reqwest::{Method, Response};
use serde_json::Value;
use url::Url;

use crate::affinity::{fingerprint, AffinityCache, SessionRecord};
use crate::config::ForwardConfig;
use crate::forward::descriptor::RequestDescriptor;
use crate::forward::encoding::{decompress_brotli, encode_base64};
use crate::forward::outcome::{ErrorKind, ForwardOutcome};
use crate::forward::proxy::plain_scheme_slot;
use crate::observability::metrics;

/// Statuses that invalidate the affinity record for a fingerprint.
const AUTH_FAILURE_STATUSES: [u16; 2] = [401, 403];

/// Redirect hop limit while intercepting.
const MAX_REDIRECTS: usize = 10;

/// Executes forwarding calls against upstream servers.
///
/// Holds the injected affinity cache; one instance serves every in-flight
/// request concurrently.
pub struct Forwarder {
    cache: Arc<AffinityCache>,
    config: ForwardConfig,
}

impl Forwarder {
    pub fn new(cache: Arc<AffinityCache>, config: ForwardConfig) -> Self {
        Self { cache, config }
    }

    /// Read-style forwarding: a GET to the target URL.
    pub async fn fetch(&self, descriptor: &RequestDescriptor) -> ForwardOutcome {
        self.dispatch(Method::GET, descriptor).await
    }

    /// Write-style forwarding: a POST with a form-encoded body.
    pub async fn submit(&self, descriptor: &RequestDescriptor) -> ForwardOutcome {
        self.dispatch(Method::POST, descriptor).await
    }

    async fn dispatch(&self, method: Method, descriptor: &RequestDescriptor) -> ForwardOutcome {
        let started = Instant::now();
        let op = if method == Method::POST { "submit" } else { "fetch" };
        let outcome = self.dispatch_inner(method, descriptor).await;
        metrics::record_forward(op, outcome.label(), started);
        outcome
    }

    async fn dispatch_inner(
        &self,
        method: Method,
        descriptor: &RequestDescriptor,
    ) -> ForwardOutcome {
        let url = match Url::parse(&descriptor.url) {
            Ok(url) => url,
            Err(err) => {
                return ForwardOutcome::failure(
                    ErrorKind::GeneralError,
                    format!("invalid url {:?}: {}", descriptor.url, err),
                )
            }
        };

        let intercept = descriptor.intercept_enabled();
        // Identity keys are an extension point; every current call site
        // forwards with origin-only affinity.
        let fp = fingerprint(&url, &[]);
        let session = if intercept {
            self.cache.get(fp).unwrap_or_default()
        } else {
            SessionRecord::default()
        };

        let proxy_url = descriptor
            .proxy
            .as_ref()
            .and_then(|p| p.url())
            .map(str::to_owned);
        let via_proxy = proxy_url.is_some();
        let verify_tls = descriptor.verify_ssl.unwrap_or(method == Method::POST);
        let timeout =
            Duration::from_secs(descriptor.timeout.unwrap_or(self.config.default_timeout_secs));

        let jar = Arc::new(Jar::default());
        seed_cookie_jar(&jar, &url, &session.cookies);

        let client = match build_client(
            proxy_url.as_deref(),
            verify_tls,
            timeout,
            intercept,
            jar.clone(),
        ) {
            Ok(client) => client,
            Err(err) => return transport_failure(&err, via_proxy),
        };

        let mut request = client.request(method.clone(), url.clone());

        // Session headers first, caller headers over them. An absent caller
        // map leaves the request with session headers only and skips the
        // merge entirely.
        let mut headers = HeaderMap::new();
        extend_string_headers(&mut headers, &session.headers);
        if let Some(caller) = &descriptor.headers {
            extend_string_headers(&mut headers, caller);
        }
        if descriptor.headers.is_some() || !headers.is_empty() {
            request = request.headers(headers);
        }

        if let Some(params) = &descriptor.params {
            request = request.query(&string_pairs(params));
        }
        if method == Method::POST {
            if let Some(body) = &descriptor.body {
                request = request.form(&string_pairs(body));
            }
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(url = %descriptor.url, error = %err, "Forwarding failed");
                return transport_failure(&err, via_proxy);
            }
        };

        self.complete(response, &jar, &url, fp, intercept, session)
            .await
    }

    async fn complete(
        &self,
        response: Response,
        jar: &Jar,
        request_url: &Url,
        fp: u64,
        intercept: bool,
        mut session: SessionRecord,
    ) -> ForwardOutcome {
        let status = response.status().as_u16();
        let response_url = response.url().to_string();
        let headers = header_pairs(response.headers());
        let is_brotli = response
            .headers()
            .get(CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .map(|v| v == "br")
            .unwrap_or(false);

        // The jar accumulated Set-Cookie from every hop of the exchange,
        // intermediate redirects included. Fold it into the session.
        session.cookies.extend(harvest_cookie_jar(jar, request_url));

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => return transport_failure(&err, false),
        };
        let body = if is_brotli {
            decompress_brotli(&bytes)
        } else {
            bytes.to_vec()
        };
        let text = String::from_utf8_lossy(&body).into_owned();

        if self.config.strict_status && status >= 400 {
            // Strict mode mirrors a client raising for status: error shape,
            // no encoded field, and the affinity hook is skipped.
            return ForwardOutcome::http_error(text, response_url, status, headers);
        }

        if intercept {
            if AUTH_FAILURE_STATUSES.contains(&status) {
                tracing::debug!(fingerprint = fp, status, "Invalidating affinity record");
                self.cache.set(fp, None);
            } else {
                self.cache.set(fp, Some(session));
            }
        }

        let encoded = encode_base64(&text);
        ForwardOutcome::success(text, encoded, response_url, status, headers)
    }
}

fn build_client(
    proxy_url: Option<&str>,
    verify_tls: bool,
    timeout: Duration,
    intercept: bool,
    jar: Arc<Jar>,
) -> reqwest::Result<reqwest::Client> {
    let redirect = if intercept {
        Policy::limited(MAX_REDIRECTS)
    } else {
        Policy::none()
    };
    let mut builder = reqwest::Client::builder()
        .timeout(timeout)
        .danger_accept_invalid_certs(!verify_tls)
        .cookie_provider(jar)
        .redirect(redirect);
    if let Some(proxy_url) = proxy_url {
        // Both slots are set; the https slot is the scheme-downgraded form.
        builder = builder
            .proxy(reqwest::Proxy::http(proxy_url)?)
            .proxy(reqwest::Proxy::https(plain_scheme_slot(proxy_url))?);
    }
    builder.build()
}

fn transport_failure(err: &reqwest::Error, via_proxy: bool) -> ForwardOutcome {
    ForwardOutcome::failure(classify_transport(err, via_proxy), err.to_string())
}

/// Map a transport error to the wire taxonomy. Connect failures through a
/// configured upstream proxy are attributed to the proxy.
fn classify_transport(err: &reqwest::Error, via_proxy: bool) -> ErrorKind {
    if err.is_timeout() {
        ErrorKind::ConnectionTimeout
    } else if err.is_connect() {
        if via_proxy {
            ErrorKind::ProxyError
        } else {
            ErrorKind::ConnectionError
        }
    } else {
        ErrorKind::GeneralError
    }
}

fn extend_string_headers(map: &mut HeaderMap, source: &HashMap<String, String>) {
    for (name, value) in source {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_str()),
            HeaderValue::from_str(value),
        ) {
            map.insert(name, value);
        }
    }
}

fn seed_cookie_jar(jar: &Jar, url: &Url, cookies: &HashMap<String, String>) {
    for (name, value) in cookies {
        jar.add_cookie_str(&format!("{}={}", name, value), url);
    }
}

/// Read the jar back into name/value pairs for the affinity record.
fn harvest_cookie_jar(jar: &Jar, url: &Url) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    if let Some(header) = jar.cookies(url) {
        if let Ok(raw) = header.to_str() {
            for pair in raw.split("; ") {
                if let Some((name, value)) = pair.split_once('=') {
                    cookies.insert(name.to_owned(), value.to_owned());
                }
            }
        }
    }
    cookies
}

/// Render a JSON map as form/query pairs the way a dynamic caller would see
/// them: strings stay bare, everything else uses its JSON rendering.
fn string_pairs(values: &HashMap<String, Value>) -> Vec<(String, String)> {
    values
        .iter()
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), rendered)
        })
        .collect()
}

fn header_pairs(headers: &HeaderMap) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            map.insert(name.as_str().to_owned(), value.to_owned());
        }
    }
    map
}
