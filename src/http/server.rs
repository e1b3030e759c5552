//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router from the application's routes
//! - Mount the override admin surface and cookie middleware when enabled
//! - Wire up middleware (tracing, timeout, request ID)
//! - Apply baseline reloads while serving
//! - Bind server to listener and shut down gracefully

use axum::{extract::FromRef, http::StatusCode, middleware, Router};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin::setup_admin_router;
use crate::config::{ServiceConfig, SharedBaseline};
use crate::http::middleware::override_cookie_middleware;
use crate::http::request::MakeRequestUuid;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub baseline: SharedBaseline,
}

impl FromRef<AppState> for SharedBaseline {
    fn from_ref(state: &AppState) -> Self {
        state.baseline.clone()
    }
}

/// HTTP server hosting application routes with request-scoped overrides.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    baseline: SharedBaseline,
}

impl HttpServer {
    /// Create a server with only the override admin surface.
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_routes(config, Router::new())
    }

    /// Create a server around the application's own routes.
    ///
    /// Handlers read configuration through the
    /// [`RequestConfig`](crate::http::middleware::RequestConfig) extractor.
    pub fn with_routes(config: ServiceConfig, app: Router<AppState>) -> Self {
        let baseline = SharedBaseline::new(config.baseline());
        let state = AppState {
            baseline: baseline.clone(),
        };

        let router = Self::build_router(&config, app, state);
        Self {
            router,
            config,
            baseline,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServiceConfig, app: Router<AppState>, state: AppState) -> Router {
        let snapshot = state.baseline.load();

        let app = if snapshot.override_enabled() {
            tracing::debug!(
                mount_path = %config.admin.mount_path,
                cookie = %snapshot.cookie_name(),
                overridable = snapshot.overridable_keys().len(),
                "Attaching config override surface"
            );
            app.merge(setup_admin_router(&config.admin.mount_path))
                .layer(middleware::from_fn_with_state(
                    state.baseline.clone(),
                    override_cookie_middleware,
                ))
        } else {
            tracing::debug!("Config override disabled");
            app
        };

        app.with_state(state)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Handle to the live baseline.
    pub fn baseline(&self) -> &SharedBaseline {
        &self.baseline
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Configs arriving on `config_updates` replace the baseline in place.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ServiceConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let baseline = self.baseline.clone();
        let enabled = baseline.load().override_enabled();
        let mount_path = self.config.admin.mount_path.clone();
        tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                let next = new_config.baseline();
                if next.override_enabled() != enabled || new_config.admin.mount_path != mount_path {
                    tracing::warn!("Override switch or mount path changed; restart to apply");
                }
                let keys = next.len();
                baseline.replace(next);
                tracing::info!(keys, "Baseline configuration reloaded");
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
