//! Prometheus metrics for node requests
//!
//! Tracks:
//! - Request latency per node and outcome (histogram)
//! - Failed and successful requests per node (counters)
//! - Healthy consensus nodes (gauge)
//!
//! Every monitor owns its registry, so several clients can run in one process.

use std::time::Duration;

use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, IntGauge, Opts, Registry, TextEncoder,
};

/// Prometheus metrics collector
pub struct MetricsMonitor {
    registry: Registry,

    /// Request latency histogram
    pub request_latency: HistogramVec,

    /// Failed request count counter
    pub failed_request_count: CounterVec,

    /// Success request count counter
    pub success_request_count: CounterVec,

    /// Healthy consensus node gauge
    pub healthy_nodes: IntGauge,
}

impl MetricsMonitor {
    /// Create a new metrics monitor
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let request_latency = HistogramVec::new(
            HistogramOpts::new(
                "hashnet_request_latency_seconds",
                "Node request latency in seconds",
            ),
            &["node", "outcome"],
        )?;
        registry.register(Box::new(request_latency.clone()))?;

        let failed_request_count = CounterVec::new(
            Opts::new(
                "hashnet_failed_requests_total",
                "Total number of failed node requests",
            ),
            &["node", "error_type"],
        )?;
        registry.register(Box::new(failed_request_count.clone()))?;

        let success_request_count = CounterVec::new(
            Opts::new(
                "hashnet_success_requests_total",
                "Total number of successful node requests",
            ),
            &["node"],
        )?;
        registry.register(Box::new(success_request_count.clone()))?;

        let healthy_nodes = IntGauge::new(
            "hashnet_healthy_nodes",
            "Number of consensus nodes currently eligible for selection",
        )?;
        registry.register(Box::new(healthy_nodes.clone()))?;

        Ok(Self {
            registry,
            request_latency,
            failed_request_count,
            success_request_count,
            healthy_nodes,
        })
    }

    /// Record the latency of one attempt against `node`
    pub fn observe_request(&self, node: &str, outcome: &str, latency: Duration) {
        self.request_latency
            .with_label_values(&[node, outcome])
            .observe(latency.as_secs_f64());
    }

    pub fn record_failure(&self, node: &str, error_type: &str) {
        self.failed_request_count
            .with_label_values(&[node, error_type])
            .inc();
    }

    pub fn record_success(&self, node: &str) {
        self.success_request_count.with_label_values(&[node]).inc();
    }

    pub fn set_healthy_nodes(&self, count: usize) {
        self.healthy_nodes.set(count as i64);
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Get metrics in Prometheus text format
    pub fn gather(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }
}
