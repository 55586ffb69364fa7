//! Metrics collection and exposition.
//!
//! # Metrics
//! - `ipconf_requests_total` (counter): total requests by method and status
//!
//! # Design Decisions
//! - Metric updates are cheap atomic increments and always recorded; the
//!   Prometheus endpoint itself is opt-in
//! - A failed exporter install is logged, never fatal

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{error, info};

/// Install the Prometheus exporter on its own bind address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => info!(address = %addr, "metrics endpoint started"),
        Err(e) => error!(address = %addr, error = %e, "failed to start metrics endpoint"),
    }
}

/// Record one dispatched request.
pub fn record_request(method: &str, status: u16) {
    counter!(
        "ipconf_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
    )
    .increment(1);
}
