//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method and status
//! - `proxy_request_duration_seconds` (histogram): latency distribution
//! - `proxy_html_transforms_total` (counter): body rewrites by strategy
//! - `proxy_ignored_selectors_total` (counter): selectors the buffered
//!   fallback cannot honor

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter started"),
        Err(e) => tracing::error!(error = %e, "Failed to start metrics exporter"),
    }
}

/// Record a completed proxy request.
pub fn record_request(method: &str, status: u16, start_time: Instant) {
    counter!(
        "proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("proxy_request_duration_seconds").record(start_time.elapsed().as_secs_f64());
}

/// Record a body rewrite by strategy name.
pub fn record_transform(strategy: &'static str) {
    counter!("proxy_html_transforms_total", "strategy" => strategy).increment(1);
}

/// Record a selector the buffered fallback ignores.
pub fn record_ignored_selector(selector: &str) {
    counter!("proxy_ignored_selectors_total", "selector" => selector.to_string()).increment(1);
}
