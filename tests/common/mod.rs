//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;
use axum::{
    body::Body,
    extract::Path,
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tower::ServiceExt;

use config_override::config::baseline::{ENABLED_KEY, OVERRIDABLE_KEYS_KEY};
use config_override::{AppState, HttpServer, RequestConfig, ServiceConfig, Settings, Shutdown};

pub const COOKIE_NAME: &str = "config_override_options";

/// Baseline used across the suite: two overridable keys, two that are not.
pub fn test_config(enabled: bool) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.settings.insert("API_DOMAIN".into(), json!("api.example.com"));
    config.settings.insert("COUNTRY".into(), json!("Australia"));
    config.settings.insert("SECRET_KEY".into(), json!("s3cret"));
    config.settings.insert(ENABLED_KEY.into(), json!(enabled));
    config.settings.insert(OVERRIDABLE_KEYS_KEY.into(), json!(["API_DOMAIN", "DEBUG"]));
    config
}

/// Application routes that report what the handler sees.
pub fn probe_routes() -> Router<AppState> {
    Router::new()
        .route("/probe/{key}", axum::routing::get(probe))
        .route("/slow/{key}", axum::routing::get(slow_probe))
}

async fn probe(Path(key): Path<String>, config: RequestConfig) -> Response {
    match config.read(&key) {
        Ok(value) => render(value).into_response(),
        Err(e) => (StatusCode::NOT_FOUND, e.to_string()).into_response(),
    }
}

/// Reads twice with a yield in between, so concurrent requests interleave.
async fn slow_probe(Path(key): Path<String>, config: RequestConfig) -> Response {
    let before = config.read(&key).map(render).unwrap_or_default();
    tokio::time::sleep(Duration::from_millis(50)).await;
    let after = config.read(&key).map(render).unwrap_or_default();
    format!("{}|{}", before, after).into_response()
}

fn render(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

pub fn server(config: ServiceConfig) -> HttpServer {
    HttpServer::with_routes(config, probe_routes())
}

/// Send one GET through the router in-process.
pub async fn get(router: &Router, uri: &str, cookie: Option<&str>) -> (StatusCode, HeaderMap, String) {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = cookie {
        builder = builder.header(header::COOKIE, format!("{}={}", COOKIE_NAME, value));
    }
    let request = builder.body(Body::empty()).unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

/// The raw `Set-Cookie` header for `name`, if the response set one.
pub fn set_cookie_header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{}=", name)))
        .map(str::to_string)
}

/// Just the cookie value from a `Set-Cookie` header for `name`.
pub fn set_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    set_cookie_header(headers, name).map(|h| {
        let pair = h.split(';').next().unwrap_or_default();
        pair.split_once('=').map(|(_, v)| v.to_string()).unwrap_or_default()
    })
}

/// Serve `server` on an ephemeral port. Returns the address and the
/// shutdown handle.
pub async fn start_server(server: HttpServer) -> (SocketAddr, Shutdown) {
    let (addr, shutdown, _) = start_server_with_updates(server).await;
    (addr, shutdown)
}

/// Like [`start_server`], but keeps the config update sender so the test can
/// push reloads into the running server.
pub async fn start_server_with_updates(
    server: HttpServer,
) -> (SocketAddr, Shutdown, mpsc::UnboundedSender<ServiceConfig>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let (update_tx, config_updates) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    (addr, shutdown, update_tx)
}
