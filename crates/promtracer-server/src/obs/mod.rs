//! Observability plumbing backed by the `prometheus` crate.
//!
//! `labels` derives the label set for a finished request, `metrics` owns the
//! throughput/latency families and their update path, and `runtime` exposes
//! process metrics of the running server.

pub mod labels;
pub mod metrics;
pub mod runtime;

pub use labels::{gen_labels, Labels};
pub use metrics::{counter_add, histogram_observe, DEFAULT_BUCKETS};
pub use runtime::{MetricRule, RuntimeCollector};
