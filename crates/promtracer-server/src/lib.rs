//! promtracer server library entry.
//!
//! This crate wires the Prometheus server tracer: label derivation, the
//! throughput/latency update path, the exposition endpoint and its
//! supervised listener, and the axum middleware that drives tracers. It is
//! consumed by the demo binary (`main.rs`) and by integration tests.

pub mod config;
pub mod host;
pub mod listener;
pub mod mux;
pub mod obs;
pub mod ops;
pub mod options;
pub mod router;
pub mod tracer;

pub use listener::ListenerFailurePolicy;
pub use options::{
    with_const_labels, with_default_mux, with_disable_server, with_histogram_buckets,
    with_listener_failure, with_registry, with_runtime_collector, with_runtime_metric_rules,
    TracerConfig, TracerOption,
};
pub use tracer::{new_server_tracer, ServerTracer};
