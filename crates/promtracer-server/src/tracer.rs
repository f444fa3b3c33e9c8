//! Prometheus server tracer.
//!
//! [`ServerTracer`] turns each finished, traced request into one throughput
//! increment and one latency observation, both labelled by method, status
//! code and route.

use prometheus::{HistogramVec, IntCounterVec};
use promtracer_core::{Context, Event, RequestContext, Result, StatsLevel, Tracer};

use crate::listener;
use crate::mux::{default_mux, ServeMux};
use crate::obs::labels::gen_labels;
use crate::obs::metrics::{self, counter_add, histogram_observe};
use crate::obs::runtime::RuntimeCollector;
use crate::ops;
use crate::options::{TracerConfig, TracerOption};

#[derive(Clone)]
pub struct ServerTracer {
    server_handled_counter: IntCounterVec,
    server_handled_histogram: HistogramVec,
}

impl ServerTracer {
    /// Resolve options, start serving `path` on `addr` unless disabled, and
    /// register the server metrics.
    ///
    /// The listener is started before registration, so a registration error
    /// can leave it running. Listener failures go to the configured
    /// [`crate::listener::ListenerFailurePolicy`], never to this result.
    pub fn try_new(
        addr: &str,
        path: &str,
        opts: impl IntoIterator<Item = TracerOption>,
    ) -> Result<Self> {
        let cfg = TracerConfig::resolve(opts);

        if !cfg.disable_server() {
            let mux = if cfg.use_default_mux() {
                default_mux()
            } else {
                ServeMux::new()
            };
            mux.handle(path, ops::exposition_route(cfg.registry().clone()))?;
            listener::spawn_listener(addr, mux.router(), cfg.listener_failure().clone());
            tracing::info!(%addr, %path, "serving server metrics");
        }

        let server_handled_counter = metrics::throughput_counter(&cfg)?;
        cfg.registry()
            .register(Box::new(server_handled_counter.clone()))?;

        let server_handled_histogram = metrics::latency_histogram(&cfg)?;
        cfg.registry()
            .register(Box::new(server_handled_histogram.clone()))?;

        if cfg.enable_runtime_collector() {
            let collector = RuntimeCollector::new(cfg.runtime_metric_rules().to_vec());
            cfg.registry().register(Box::new(collector))?;
        }

        Ok(Self {
            server_handled_counter,
            server_handled_histogram,
        })
    }

    pub fn throughput(&self) -> &IntCounterVec {
        &self.server_handled_counter
    }

    pub fn latency(&self) -> &HistogramVec {
        &self.server_handled_histogram
    }
}

impl Tracer for ServerTracer {
    fn start(&self, ctx: Context, _c: &RequestContext) -> Context {
        ctx
    }

    fn finish(&self, _ctx: &Context, c: &RequestContext) {
        let stats = c.trace_info().stats();
        if stats.level() == StatsLevel::Disabled {
            return;
        }
        let Some(cost) = stats.between(Event::HttpStart, Event::HttpFinish) else {
            return;
        };

        let labels = gen_labels(c);
        if let Err(e) = counter_add(&self.server_handled_counter, 1, &labels) {
            tracing::debug!(error = %e, "dropped throughput update");
        }
        if let Err(e) = histogram_observe(&self.server_handled_histogram, cost, &labels) {
            tracing::debug!(error = %e, "dropped latency update");
        }
    }
}

/// Build a [`ServerTracer`]; `addr` and `path` are where Prometheus scrapes.
///
/// # Panics
/// Panics when the metrics cannot be registered (duplicate names, invalid
/// buckets, or a path already mounted on the mux). These are configuration
/// bugs, not runtime conditions.
pub fn new_server_tracer(
    addr: &str,
    path: &str,
    opts: impl IntoIterator<Item = TracerOption>,
) -> ServerTracer {
    match ServerTracer::try_new(addr, path, opts) {
        Ok(tracer) => tracer,
        Err(e) => panic!("unable to register server metrics: {e}"),
    }
}
