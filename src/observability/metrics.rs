//! Metrics collection and exposition.
//!
//! # Metrics
//! - `cms_responses_total` (counter): responses by kind, outcome, status
//! - `cms_request_duration_seconds` (histogram): time spent in the content core
//!
//! Recording is a no-op until a recorder is installed, so tests and the
//! export command never need one.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::cms::{Outcome, ResponseKind};

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one finished response.
pub fn record_response(kind: ResponseKind, outcome: Outcome, status: u16, start: Instant) {
    counter!(
        "cms_responses_total",
        "kind" => kind.as_str(),
        "outcome" => outcome.as_str(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!("cms_request_duration_seconds", "kind" => kind.as_str())
        .record(start.elapsed().as_secs_f64());
}
