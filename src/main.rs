//! config-override service
//!
//! Hosts the override admin surface and a small inspection route that shows
//! the effective value of an overridable key for the calling request.
//!
//! ```text
//!   Client ──cookie──▶ override_cookie middleware ──▶ RequestConfig
//!                                                        │
//!             ┌──────────────────────────────────────────┤
//!             ▼                                          ▼
//!   /config_override/{,update,reset}          /settings/{key}
//!   (Set-Cookie back to client)               (override ▸ baseline)
//! ```

use std::path::PathBuf;
use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use config_override::config::{load_config, watcher::ConfigWatcher, ServiceConfig, Settings};
use config_override::observability::{logging, metrics};
use config_override::{HttpServer, RequestConfig, Shutdown};

#[derive(Parser)]
#[command(name = "config-override")]
#[command(about = "HTTP service with cookie-driven, per-request configuration overrides", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload the baseline settings when the configuration file changes.
    #[arg(short, long, requires = "config")]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    logging::init(&config.observability.log_level);
    tracing::info!("config-override v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        mount_path = %config.admin.mount_path,
        settings = config.settings.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    // Keep the watcher handle alive for the lifetime of the server.
    let (_watcher, config_updates) = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, rx) = ConfigWatcher::new(path);
            (Some(watcher.run()?), rx)
        }
        _ => {
            let (_tx, rx) = mpsc::unbounded_channel();
            (None, rx)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/settings/{key}", get(show_setting));

    let shutdown = Shutdown::new();
    let _signals = shutdown.trigger_on_signal();

    let server = HttpServer::with_routes(config, app);
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Effective value of `key` for this request. Only whitelisted keys are shown.
async fn show_setting(Path(key): Path<String>, config: RequestConfig) -> Response {
    if !config.store().allowed().contains(&key) {
        return (StatusCode::FORBIDDEN, "Key is not overridable").into_response();
    }

    match config.read(&key) {
        Ok(value) => Json(serde_json::json!({
            "key": key,
            "value": value,
            "overridden": config.is_overridden(&key),
        }))
        .into_response(),
        Err(e) => (StatusCode::NOT_FOUND, e.to_string()).into_response(),
    }
}
