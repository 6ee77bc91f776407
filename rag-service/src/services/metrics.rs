//! Prometheus metrics for rag-service.
//!
//! Provides HTTP, retrieval and provider metrics for observability.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::OnceLock;

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

// HTTP metrics
pub static HTTP_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static HTTP_REQUEST_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();

// Retrieval metrics
pub static RAG_CORPUS_RECORDS: OnceLock<IntGauge> = OnceLock::new();
pub static RAG_CORPUS_LOAD_ERRORS_TOTAL: OnceLock<IntCounter> = OnceLock::new();
pub static RAG_MATCHES_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

// Provider metrics
pub static GENAI_PROVIDER_LATENCY_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static GENAI_PROVIDER_ERRORS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static GENAI_RESPONSE_SHAPES_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize all metrics. Safe to call more than once; later calls are no-ops.
pub fn init_metrics() {
    if REGISTRY.get().is_some() {
        return;
    }

    if let Err(e) = try_init_metrics() {
        tracing::error!(error = %e, "Failed to initialize Prometheus metrics");
        return;
    }

    tracing::info!("Prometheus metrics initialized");
}

fn try_init_metrics() -> prometheus::Result<()> {
    let registry = Registry::new();

    let http_requests = IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests"),
        &["endpoint", "status"],
    )?;

    let http_duration = HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["endpoint"],
    )?;

    let corpus_records = IntGauge::new("rag_corpus_records", "Records in the loaded corpus")?;

    let corpus_errors = IntCounter::new(
        "rag_corpus_load_errors_total",
        "Corpus loads that fell back to an empty corpus",
    )?;

    // matched: 0..=3, as a label to keep the distribution readable
    let matches = IntCounterVec::new(
        Opts::new("rag_matches_total", "Retrieval lookups by number of matched records"),
        &["matched"],
    )?;

    let provider_latency = HistogramVec::new(
        HistogramOpts::new(
            "genai_provider_latency_seconds",
            "AI provider API latency in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["provider", "model"],
    )?;

    let provider_errors = IntCounterVec::new(
        Opts::new("genai_provider_errors_total", "Total AI provider errors"),
        &["provider", "error_type"],
    )?;

    let response_shapes = IntCounterVec::new(
        Opts::new(
            "genai_response_shapes_total",
            "Backend replies by the extraction strategy that produced text",
        ),
        &["strategy"],
    )?;

    registry.register(Box::new(http_requests.clone()))?;
    registry.register(Box::new(http_duration.clone()))?;
    registry.register(Box::new(corpus_records.clone()))?;
    registry.register(Box::new(corpus_errors.clone()))?;
    registry.register(Box::new(matches.clone()))?;
    registry.register(Box::new(provider_latency.clone()))?;
    registry.register(Box::new(provider_errors.clone()))?;
    registry.register(Box::new(response_shapes.clone()))?;

    // Initialize globals
    let _ = REGISTRY.set(registry);
    let _ = HTTP_REQUESTS_TOTAL.set(http_requests);
    let _ = HTTP_REQUEST_DURATION_SECONDS.set(http_duration);
    let _ = RAG_CORPUS_RECORDS.set(corpus_records);
    let _ = RAG_CORPUS_LOAD_ERRORS_TOTAL.set(corpus_errors);
    let _ = RAG_MATCHES_TOTAL.set(matches);
    let _ = GENAI_PROVIDER_LATENCY_SECONDS.set(provider_latency);
    let _ = GENAI_PROVIDER_ERRORS_TOTAL.set(provider_errors);
    let _ = GENAI_RESPONSE_SHAPES_TOTAL.set(response_shapes);

    Ok(())
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    let registry = match REGISTRY.get() {
        Some(r) => r,
        None => {
            tracing::error!("Metrics registry not initialized");
            return "# Metrics registry not initialized\n".to_string();
        }
    };

    let metric_families = registry.gather();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return format!("# Failed to encode metrics: {}\n", e);
    }

    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
            format!("# Failed to convert metrics to UTF-8: {}\n", e)
        }
    }
}

// Helper functions for recording metrics

/// Record a completed HTTP request.
pub fn record_http_request(endpoint: &str, status: u16, duration_secs: f64) {
    if let Some(counter) = HTTP_REQUESTS_TOTAL.get() {
        let status = status.to_string();
        counter
            .with_label_values(&[endpoint, status.as_str()])
            .inc();
    }
    if let Some(histogram) = HTTP_REQUEST_DURATION_SECONDS.get() {
        histogram
            .with_label_values(&[endpoint])
            .observe(duration_secs);
    }
}

/// Record the size of a freshly loaded corpus.
pub fn set_corpus_records(count: usize) {
    if let Some(gauge) = RAG_CORPUS_RECORDS.get() {
        gauge.set(count as i64);
    }
}

/// Record a corpus load that fell back to empty.
pub fn record_corpus_load_error() {
    if let Some(counter) = RAG_CORPUS_LOAD_ERRORS_TOTAL.get() {
        counter.inc();
    }
}

/// Record how many records a lookup matched.
pub fn record_matches(matched: usize) {
    if let Some(counter) = RAG_MATCHES_TOTAL.get() {
        let matched = matched.to_string();
        counter.with_label_values(&[matched.as_str()]).inc();
    }
}

/// Record provider latency.
pub fn record_provider_latency(provider: &str, model: &str, duration_secs: f64) {
    if let Some(histogram) = GENAI_PROVIDER_LATENCY_SECONDS.get() {
        histogram
            .with_label_values(&[provider, model])
            .observe(duration_secs);
    }
}

/// Record a provider error.
pub fn record_provider_error(provider: &str, error_type: &str) {
    if let Some(counter) = GENAI_PROVIDER_ERRORS_TOTAL.get() {
        counter.with_label_values(&[provider, error_type]).inc();
    }
}

/// Record which extraction strategy produced the reply text.
pub fn record_response_shape(strategy: &str) {
    if let Some(counter) = GENAI_RESPONSE_SHAPES_TOTAL.get() {
        counter.with_label_values(&[strategy]).inc();
    }
}
