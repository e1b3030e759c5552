//! Metrics collection and exposition.
//!
//! # Metrics
//! - `config_override_installed_total` (counter): cookies decoded and installed
//! - `config_override_cookie_rejected_total` (counter): malformed cookies discarded
//! - `config_override_updates_total` (counter): admin updates by outcome
//! - `config_override_resets_total` (counter): admin resets
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            describe_counter!("config_override_installed_total", "Override cookies installed");
            describe_counter!("config_override_cookie_rejected_total", "Malformed override cookies discarded");
            describe_counter!("config_override_updates_total", "Admin override updates");
            describe_counter!("config_override_resets_total", "Admin override resets");
            tracing::info!(address = %addr, "Metrics endpoint started");
        }
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_override_installed() {
    counter!("config_override_installed_total").increment(1);
}

pub fn record_cookie_rejected() {
    counter!("config_override_cookie_rejected_total").increment(1);
}

/// `accepted` is false when the whitelist rejected the key.
pub fn record_update(accepted: bool) {
    let outcome = if accepted { "accepted" } else { "rejected" };
    counter!("config_override_updates_total", "outcome" => outcome).increment(1);
}

pub fn record_reset() {
    counter!("config_override_resets_total").increment(1);
}
