//! Request-scoped configuration overrides for axum services.
//!
//! A client sends a cookie naming a few whitelisted settings and their
//! replacement values; handlers reading configuration through
//! [`RequestConfig`] see those values for that request only. The baseline
//! configuration shared by every other request is never touched.

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod overrides;

pub use config::{BaselineConfig, ServiceConfig, Settings, SharedBaseline};
pub use http::{AppState, HttpServer, RequestConfig};
pub use lifecycle::Shutdown;
pub use overrides::{ConfigFacade, OverrideError, OverrideSet};
