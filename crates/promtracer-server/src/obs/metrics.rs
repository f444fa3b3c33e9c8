//! Server metric families and the update path.
//!
//! Storage, bucketing and exposition live in the `prometheus` crate; this
//! module builds the throughput counter and the latency histogram and applies
//! labelled updates to them. Latency is recorded in microseconds, the unit of
//! the bucket boundaries.

use std::time::Duration;

use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};
use promtracer_core::Result;

use super::labels::{Labels, LABEL_NAMES};
use crate::options::TracerConfig;

pub const THROUGHPUT_METRIC: &str = "http_server_throughput";
pub const LATENCY_METRIC: &str = "http_server_latency_us";

// Default buckets in microseconds
// 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s
pub const DEFAULT_BUCKETS: [f64; 8] = [
    5_000.0, 10_000.0, 25_000.0, 50_000.0, 100_000.0, 250_000.0, 500_000.0, 1_000_000.0,
];

/// Unregistered throughput counter with the configured constant labels.
pub fn throughput_counter(cfg: &TracerConfig) -> Result<IntCounterVec> {
    let opts = Opts::new(
        THROUGHPUT_METRIC,
        "Total number of HTTPs completed by the server, regardless of success or failure.",
    )
    .const_labels(cfg.const_labels().clone());

    Ok(IntCounterVec::new(opts, &LABEL_NAMES)?)
}

/// Unregistered latency histogram with the configured buckets and constant labels.
///
/// `HistogramVec` only checks bucket order when the first child is created,
/// so the bounds are checked here to fail at registration instead.
pub fn latency_histogram(cfg: &TracerConfig) -> Result<HistogramVec> {
    if cfg.buckets().windows(2).any(|w| w[0] >= w[1]) {
        return Err(prometheus::Error::Msg(format!(
            "histogram buckets must be in increasing order: {:?}",
            cfg.buckets()
        ))
        .into());
    }

    let opts = HistogramOpts::new(
        LATENCY_METRIC,
        "Latency (microseconds) of HTTP that had been application-level handled by the server.",
    )
    .const_labels(cfg.const_labels().clone())
    .buckets(cfg.buckets().to_vec());

    Ok(HistogramVec::new(opts, &LABEL_NAMES)?)
}

/// Increase the counter for `labels` by `value`.
///
/// Fails when `labels` does not name exactly the counter's variable labels.
pub fn counter_add(counter: &IntCounterVec, value: u64, labels: &Labels) -> Result<()> {
    counter.get_metric_with(&labels.as_map())?.inc_by(value);
    Ok(())
}

/// Record `value` as whole microseconds into the histogram for `labels`.
///
/// Fails when `labels` does not name exactly the histogram's variable labels.
pub fn histogram_observe(histogram: &HistogramVec, value: Duration, labels: &Labels) -> Result<()> {
    histogram
        .get_metric_with(&labels.as_map())?
        .observe(value.as_micros() as f64);
    Ok(())
}
