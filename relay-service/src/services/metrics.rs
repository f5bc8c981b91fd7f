//! Prometheus metrics for relay-service.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

// Relay metrics
pub static RELAY_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static RELAY_TOKENS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

// Provider metrics
pub static PROVIDER_LATENCY_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static PROVIDER_ERRORS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize all metrics. Must be called once at startup.
pub fn init_metrics() {
    let registry = Registry::new();

    let relay_requests_total = IntCounterVec::new(
        Opts::new("relay_requests_total", "Total number of relay requests"),
        &["route", "outcome"],
    )
    .expect("Failed to create relay_requests_total metric");

    let relay_tokens_total = IntCounterVec::new(
        Opts::new("relay_tokens_total", "Total tokens processed"),
        &["model", "type"], // type: input, output
    )
    .expect("Failed to create relay_tokens_total metric");

    let provider_latency = HistogramVec::new(
        HistogramOpts::new(
            "provider_latency_seconds",
            "AI provider API latency in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["provider", "model"],
    )
    .expect("Failed to create provider_latency_seconds metric");

    let provider_errors = IntCounterVec::new(
        Opts::new("provider_errors_total", "Total AI provider errors"),
        &["provider", "error_type"],
    )
    .expect("Failed to create provider_errors_total metric");

    registry
        .register(Box::new(relay_requests_total.clone()))
        .expect("Failed to register relay_requests_total");
    registry
        .register(Box::new(relay_tokens_total.clone()))
        .expect("Failed to register relay_tokens_total");
    registry
        .register(Box::new(provider_latency.clone()))
        .expect("Failed to register provider_latency_seconds");
    registry
        .register(Box::new(provider_errors.clone()))
        .expect("Failed to register provider_errors_total");

    let _ = REGISTRY.set(registry);
    let _ = RELAY_REQUESTS_TOTAL.set(relay_requests_total);
    let _ = RELAY_TOKENS_TOTAL.set(relay_tokens_total);
    let _ = PROVIDER_LATENCY_SECONDS.set(provider_latency);
    let _ = PROVIDER_ERRORS_TOTAL.set(provider_errors);

    tracing::info!("Prometheus metrics initialized");
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

/// Record a completed relay request.
pub fn record_relay_request(route: &str, outcome: &str) {
    if let Some(counter) = RELAY_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[route, outcome]).inc();
    }
}

/// Record token usage.
pub fn record_tokens(model: &str, input_tokens: i32, output_tokens: i32) {
    if let Some(counter) = RELAY_TOKENS_TOTAL.get() {
        counter
            .with_label_values(&[model, "input"])
            .inc_by(input_tokens as u64);
        counter
            .with_label_values(&[model, "output"])
            .inc_by(output_tokens as u64);
    }
}

/// Record provider latency.
pub fn record_provider_latency(provider: &str, model: &str, duration_secs: f64) {
    if let Some(histogram) = PROVIDER_LATENCY_SECONDS.get() {
        histogram
            .with_label_values(&[provider, model])
            .observe(duration_secs);
    }
}

/// Record a provider error.
pub fn record_provider_error(provider: &str, error_type: &str) {
    if let Some(counter) = PROVIDER_ERRORS_TOTAL.get() {
        counter.with_label_values(&[provider, error_type]).inc();
    }
}
