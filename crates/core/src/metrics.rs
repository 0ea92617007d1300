//! Prometheus metrics for the conversion pipeline.

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

/// Batches processed by result.
pub static BATCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pixshift_batches_total", "Total conversion batches"),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

/// File conversions by target format and result.
pub static CONVERSIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pixshift_conversions_total", "Total file conversions"),
        &["format", "result"],
    )
    .unwrap()
});

/// Per-file conversion duration in seconds.
pub static CONVERSION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "pixshift_conversion_duration_seconds",
            "Duration of single file conversions",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["format"],
    )
    .unwrap()
});

/// Bytes of encoded output produced, by target format.
pub static CONVERTED_BYTES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "pixshift_converted_bytes_total",
            "Total bytes of converted output",
        ),
        &["format"],
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(BATCHES_TOTAL.clone()),
        Box::new(CONVERSIONS_TOTAL.clone()),
        Box::new(CONVERSION_DURATION.clone()),
        Box::new(CONVERTED_BYTES_TOTAL.clone()),
    ]
}
