use std::sync::Arc;

use prometheus::{
    Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    proto::MetricFamily,
};

use podconn_core::{MetricsBackend, ProbeOutcome};
use podconn_model::AggregateCount;

const NAMESPACE: &str = "podconn";

/// Prometheus metrics backend.
///
/// ## Metrics
/// - `podconn_probes_started_total` - Counter of dispatched probes
/// - `podconn_probes_completed_total{outcome}` - Counter of finished probes
/// - `podconn_probe_duration_seconds` - Histogram of probe execution time
/// - `podconn_connections_total` - Gauge with the last aggregate
/// - `podconn_last_run_failed_probes` - Gauge with the failures of the last run
///
/// `outcome` is bounded: "success", "failure", "timeout".
#[derive(Clone)]
pub struct PrometheusMetrics {
    probes_started: IntCounter,
    probes_completed: IntCounterVec,
    probe_duration: Histogram,
    connections: IntGauge,
    last_run_failed: IntGauge,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Create a new backend registering its metrics in `registry`.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let probes_started = IntCounter::with_opts(
            Opts::new("probes_started_total", "Total number of probes started").namespace(NAMESPACE),
        )?;
        registry.register(Box::new(probes_started.clone()))?;

        let probes_completed = IntCounterVec::new(
            Opts::new("probes_completed_total", "Total number of probes completed")
                .namespace(NAMESPACE),
            &["outcome"],
        )?;
        registry.register(Box::new(probes_completed.clone()))?;

        let probe_duration = Histogram::with_opts(
            HistogramOpts::new("probe_duration_seconds", "Probe execution duration in seconds")
                .namespace(NAMESPACE)
                .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        )?;
        registry.register(Box::new(probe_duration.clone()))?;

        let connections = IntGauge::with_opts(
            Opts::new(
                "connections_total",
                "Established connections summed over all probed targets",
            )
            .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(connections.clone()))?;

        let last_run_failed = IntGauge::with_opts(
            Opts::new("last_run_failed_probes", "Probes that failed in the last run")
                .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(last_run_failed.clone()))?;

        Ok(Self {
            probes_started,
            probes_completed,
            probe_duration,
            connections,
            last_run_failed,
            registry,
        })
    }

    /// Create a new backend with a private registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    /// Gather all metrics for exposition.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Render all metrics in the Prometheus text format.
    pub fn encode_text(&self) -> Result<String, prometheus::Error> {
        prometheus::TextEncoder::new().encode_to_string(&self.gather())
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_probe_started(&self) {
        self.probes_started.inc();
    }

    fn record_probe_completed(&self, outcome: ProbeOutcome, duration_ms: u64) {
        self.probes_completed
            .with_label_values(&[outcome.as_label()])
            .inc();
        self.probe_duration.observe(duration_ms as f64 / 1000.0);
    }

    fn record_run_completed(&self, aggregate: &AggregateCount) {
        self.connections
            .set(i64::try_from(aggregate.total).unwrap_or(i64::MAX));
        self.last_run_failed
            .set(i64::try_from(aggregate.failed).unwrap_or(i64::MAX));
    }
}
