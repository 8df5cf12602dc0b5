//! Metrics collection and exposition.
//!
//! # Metrics
//! - `intake_submissions_total` (counter): submissions by form and outcome
//! - `intake_news_requests_total` (counter): news proxy calls by outcome
//! - `intake_news_duration_seconds` (histogram): upstream latency
//! - `intake_store_reconnects_total` (counter): reconnect attempts by outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_submission(form: &'static str, outcome: &'static str) {
    metrics::counter!("intake_submissions_total", "form" => form, "outcome" => outcome)
        .increment(1);
}

pub fn record_news(outcome: &'static str, start: Instant) {
    metrics::counter!("intake_news_requests_total", "outcome" => outcome).increment(1);
    metrics::histogram!("intake_news_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_reconnect(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!("intake_store_reconnects_total", "outcome" => outcome).increment(1);
}
