use std::collections::HashMap;
use axum::{
    extract::{Path, Query},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::http::cookies;
use crate::http::middleware::RequestConfig;
use crate::observability::metrics;
use crate::overrides::{codec, OverrideSet};

/// Render an override set for a response body; `None` when absent.
pub fn render_overrides(overrides: Option<&OverrideSet>) -> String {
    match overrides {
        Some(set) => Value::Object(set.clone()).to_string(),
        None => "None".to_string(),
    }
}

/// `GET {mount}/`: display the current override set.
pub async fn show_overrides(config: RequestConfig) -> String {
    render_overrides(config.overrides())
}

/// `GET {mount}/update/{key}/{value}/`: override one whitelisted key.
///
/// A rejected key still answers 200 with an error message, matching what
/// existing clients of this endpoint expect.
pub async fn update_override(
    Path((key, value)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
    mut config: RequestConfig,
) -> Response {
    if let Err(e) = config.set_override(&key, Value::String(value)) {
        tracing::warn!(key = %key, "Rejected override of non-whitelisted key");
        metrics::record_update(false);
        return format!("ERROR trying to override a params which is not allowed: {}", e)
            .into_response();
    }
    metrics::record_update(true);

    let overrides = config.overrides().cloned().unwrap_or_default();
    let message = format!("Overridden config updated to: {}", render_overrides(Some(&overrides)));
    tracing::debug!("{}", message);

    let redirect = params.get("redirect").is_some_and(|v| !v.is_empty());
    let mut response = if redirect {
        (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, HeaderValue::from_static("/"))]).into_response()
    } else {
        message.into_response()
    };

    let baseline = config.baseline();
    match cookies::set_cookie(baseline.cookie_name(), &codec::encode(&overrides)) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
            response
        }
        Err(e) => {
            tracing::error!(error = %e, "Override cookie is not a valid header value");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// `GET {mount}/reset/`: tell the client to drop the override cookie.
///
/// The current request keeps its overrides; the next one arrives without
/// the cookie and resolves to the baseline.
pub async fn reset_overrides(config: RequestConfig) -> Response {
    metrics::record_reset();

    let baseline = config.baseline();
    match cookies::expire_cookie(baseline.cookie_name()) {
        Ok(value) => {
            let mut response = "Overridden config reset".into_response();
            response.headers_mut().append(header::SET_COOKIE, value);
            response
        }
        Err(e) => {
            tracing::error!(error = %e, "Override cookie name is not a valid header value");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
