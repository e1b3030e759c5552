//! Override admin surface.
//!
//! Read, update and reset the caller's override set. Routes only exist when
//! the override feature is enabled; otherwise every URL below 404s.

pub mod handlers;

use axum::{routing::get, Router};

use crate::http::server::AppState;
use self::handlers::*;

/// Routes mounted under `mount_path` (e.g. `/config_override`).
pub fn setup_admin_router(mount_path: &str) -> Router<AppState> {
    Router::new()
        .route(mount_path, get(show_overrides))
        .route(&format!("{}/", mount_path), get(show_overrides))
        .route(&format!("{}/update/{{key}}/{{value}}/", mount_path), get(update_override))
        .route(&format!("{}/reset/", mount_path), get(reset_overrides))
}
