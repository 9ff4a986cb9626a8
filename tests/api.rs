//! End-to-end tests driving the HTTP service with a real client.

use std::net::SocketAddr;

use serde_json::{json, Value};

use forward_proxy::config::ProxyConfig;
use forward_proxy::http::HttpServer;
use forward_proxy::lifecycle::Shutdown;

mod common;
use common::{start_upstream, MockResponse};

async fn spawn_service() -> (SocketAddr, Shutdown) {
    let config = ProxyConfig::default();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let server = HttpServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (addr, _shutdown) = spawn_service().await;

    let res = client()
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn test_fetch_route_requires_proxy() {
    let (addr, _shutdown) = spawn_service().await;

    let res = client()
        .post(format!("http://{}/get", addr))
        .json(&json!({ "url": "http://example.test/" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 403);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["type"], "fetch-route");
    assert_eq!(body["error"], "No proxy specified");
}

#[tokio::test]
async fn test_fetch_through_upstream_proxy() {
    // The mock upstream plays the part of the proxy: it receives the
    // absolute-form request line and answers for the target host.
    let upstream = start_upstream(|req| async move {
        assert_eq!(req.method, "GET");
        assert!(req.target.starts_with("http://backend.test/"));
        MockResponse::text(200, "proxied")
    })
    .await;
    let (addr, _shutdown) = spawn_service().await;

    let res = client()
        .post(format!("http://{}/get", addr))
        .json(&json!({
            "url": "http://backend.test/",
            "proxy": format!("http://{}", upstream),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], 200);
    assert_eq!(body["response"], "proxied");
    assert!(body["encoded"].is_string());
}

#[tokio::test]
async fn test_submit_route_requires_url_only() {
    let (addr, _shutdown) = spawn_service().await;

    let res = client()
        .post(format!("http://{}/post", addr))
        .json(&json!({ "body": { "a": 1 } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 403);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["type"], "post-route");
    assert_eq!(body["error"], "No url specified");
}

#[tokio::test]
async fn test_submit_direct_to_upstream() {
    let upstream = start_upstream(|req| async move {
        assert_eq!(req.method, "POST");
        assert!(req.body.contains("a=1"));
        MockResponse::text(200, "accepted")
    })
    .await;
    let (addr, _shutdown) = spawn_service().await;

    let res = client()
        .post(format!("http://{}/post", addr))
        .json(&json!({
            "url": format!("http://{}/submit", upstream),
            "body": { "a": 1 },
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["response"], "accepted");
}

#[tokio::test]
async fn test_transport_failure_maps_to_401_envelope() {
    let (addr, _shutdown) = spawn_service().await;

    let res = client()
        .post(format!("http://{}/post", addr))
        .json(&json!({ "url": "http://127.0.0.1:1/" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "connection-error");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_unknown_path_is_json_404() {
    let (addr, _shutdown) = spawn_service().await;

    let res = client()
        .get(format!("http://{}/nope", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_malformed_body_is_json_500() {
    let (addr, _shutdown) = spawn_service().await;

    let res = client()
        .post(format!("http://{}/get", addr))
        .body("definitely not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 500);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["type"], "fetch-route");
}

#[tokio::test]
async fn test_session_continuity_across_calls() {
    let upstream = start_upstream(|req| async move {
        if req.header("cookie") == Some("sid=abc") {
            MockResponse::text(200, "welcome back")
        } else {
            MockResponse::text(200, "first visit").with_header("set-cookie", "sid=abc")
        }
    })
    .await;
    let (addr, _shutdown) = spawn_service().await;
    let client = client();

    let params = json!({
        "url": format!("http://{}/", upstream),
        "proxy": { "country": "none" },
    });

    let first: Value = client
        .post(format!("http://{}/get", addr))
        .json(&params)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first["response"], "first visit");

    let second: Value = client
        .post(format!("http://{}/get", addr))
        .json(&params)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["response"], "welcome back");
}
