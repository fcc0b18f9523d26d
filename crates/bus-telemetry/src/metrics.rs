//! Prometheus metrics for the bus topology services.
//!
//! All metrics follow the naming convention: `bus_<component>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry,
    TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // STORE CLIENT METRICS
    // =========================================================================

    /// Store operations by operation and outcome
    pub static ref STORE_OPERATIONS: CounterVec = CounterVec::new(
        Opts::new("bus_store_operations_total", "Store operations by kind and outcome"),
        &["op", "outcome"]  // op: get/put/watch, outcome: ok/absent/error
    ).expect("metric creation failed");

    /// Watch events delivered to the registered callback
    pub static ref WATCH_EVENTS: Counter = Counter::new(
        "bus_store_watch_events_total",
        "Watch events delivered to the registered callback"
    ).expect("metric creation failed");

    /// Time from process start to a verified, bootstrapped store client
    pub static ref STORE_CONNECT_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "bus_store_connect_duration_seconds",
            "Time spent probing, opening and bootstrapping the store"
        ).buckets(exponential_buckets(0.01, 2.0, 12).expect("bucket layout"))
    ).expect("metric creation failed");

    // =========================================================================
    // TOPOLOGY METRICS
    // =========================================================================

    /// Topic resolutions by role and outcome
    pub static ref TOPIC_RESOLUTIONS: CounterVec = CounterVec::new(
        Opts::new("bus_topology_resolutions_total", "Topic resolutions by role and outcome"),
        &["role", "outcome"]  // outcome: resolved/partial/missing
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Store
        Box::new(STORE_OPERATIONS.clone()),
        Box::new(WATCH_EVENTS.clone()),
        Box::new(STORE_CONNECT_DURATION.clone()),
        // Topology
        Box::new(TOPIC_RESOLUTIONS.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
