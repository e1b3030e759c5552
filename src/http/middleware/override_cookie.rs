//! Override cookie middleware.
//! Installs the request's override set before any handler runs.

use std::convert::Infallible;
use std::ops::{Deref, DerefMut};
use axum::{
    body::Body,
    extract::{FromRef, FromRequestParts, State},
    http::{request::Parts, Request},
    middleware::Next,
    response::Response,
};

use crate::config::SharedBaseline;
use crate::http::cookies;
use crate::http::request::request_id;
use crate::observability::metrics;
use crate::overrides::{codec, ConfigFacade, OverrideStore};

/// Decode the override cookie and attach a [`ConfigFacade`] to the request.
///
/// A malformed cookie is logged and dropped; the request continues on the
/// baseline configuration.
pub async fn override_cookie_middleware(
    State(baseline): State<SharedBaseline>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let snapshot = baseline.load();
    let mut store = OverrideStore::new(snapshot.overridable_keys());

    // 1. Look for the cookie
    if let Some(raw) = cookies::find_cookie(req.headers(), snapshot.cookie_name()) {
        tracing::debug!(request_id = %request_id(&req), cookie = %raw, "Config override by cookie");

        // 2. Decode and install, or discard
        if !raw.is_empty() {
            match codec::decode(raw) {
                Ok(decoded) => {
                    store.install_from_decoded(decoded);
                    metrics::record_override_installed();
                }
                Err(e) => {
                    tracing::warn!(
                        request_id = %request_id(&req),
                        cookie = %raw,
                        error = %e,
                        "Config override aborted, cookie is malformed"
                    );
                    metrics::record_cookie_rejected();
                }
            }
        }
    }

    // 3. Hand the request-scoped view to the handlers
    req.extensions_mut().insert(ConfigFacade::new(baseline.clone(), store));
    next.run(req).await
}

/// Extractor for the request's effective configuration.
///
/// Falls back to a facade without overrides when the override middleware is
/// not installed (feature disabled).
#[derive(Debug, Clone)]
pub struct RequestConfig(pub ConfigFacade);

impl<S> FromRequestParts<S> for RequestConfig
where
    S: Send + Sync,
    SharedBaseline: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<ConfigFacade>() {
            Some(facade) => Ok(Self(facade.clone())),
            None => Ok(Self(ConfigFacade::without_overrides(SharedBaseline::from_ref(state)))),
        }
    }
}

impl Deref for RequestConfig {
    type Target = ConfigFacade;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for RequestConfig {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
