//! Tracer configuration and the options that build it.
//!
//! Options are applied in order over [`TracerConfig::default`]; a later
//! option overrides an earlier one touching the same setting.

use std::collections::HashMap;

use prometheus::Registry;

use crate::listener::ListenerFailurePolicy;
use crate::obs::metrics::DEFAULT_BUCKETS;
use crate::obs::runtime::MetricRule;

/// Resolved, immutable tracer configuration.
#[derive(Clone)]
pub struct TracerConfig {
    registry: Registry,
    buckets: Vec<f64>,
    const_labels: HashMap<String, String>,
    disable_server: bool,
    use_default_mux: bool,
    enable_runtime_collector: bool,
    runtime_metric_rules: Vec<MetricRule>,
    listener_failure: ListenerFailurePolicy,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            registry: prometheus::default_registry().clone(),
            buckets: DEFAULT_BUCKETS.to_vec(),
            const_labels: HashMap::new(),
            disable_server: false,
            use_default_mux: false,
            enable_runtime_collector: false,
            runtime_metric_rules: Vec::new(),
            listener_failure: ListenerFailurePolicy::default(),
        }
    }
}

impl TracerConfig {
    pub fn resolve(opts: impl IntoIterator<Item = TracerOption>) -> Self {
        let mut cfg = Self::default();
        for opt in opts {
            opt.apply(&mut cfg);
        }
        cfg
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
    pub fn buckets(&self) -> &[f64] {
        &self.buckets
    }
    pub fn const_labels(&self) -> &HashMap<String, String> {
        &self.const_labels
    }
    pub fn disable_server(&self) -> bool {
        self.disable_server
    }
    pub fn use_default_mux(&self) -> bool {
        self.use_default_mux
    }
    pub fn enable_runtime_collector(&self) -> bool {
        self.enable_runtime_collector
    }
    pub fn runtime_metric_rules(&self) -> &[MetricRule] {
        &self.runtime_metric_rules
    }
    pub fn listener_failure(&self) -> &ListenerFailurePolicy {
        &self.listener_failure
    }
}

/// One configuration step for [`crate::ServerTracer`].
#[derive(Clone)]
pub enum TracerOption {
    Registry(Registry),
    HistogramBuckets(Vec<f64>),
    ConstLabels(HashMap<String, String>),
    DisableServer,
    DefaultMux,
    RuntimeCollector,
    RuntimeMetricRules(Vec<MetricRule>),
    ListenerFailure(ListenerFailurePolicy),
}

impl TracerOption {
    fn apply(self, cfg: &mut TracerConfig) {
        match self {
            TracerOption::Registry(r) => cfg.registry = r,
            TracerOption::HistogramBuckets(b) => cfg.buckets = b,
            TracerOption::ConstLabels(l) => cfg.const_labels = l,
            TracerOption::DisableServer => cfg.disable_server = true,
            TracerOption::DefaultMux => cfg.use_default_mux = true,
            TracerOption::RuntimeCollector => cfg.enable_runtime_collector = true,
            TracerOption::RuntimeMetricRules(r) => cfg.runtime_metric_rules = r,
            TracerOption::ListenerFailure(p) => cfg.listener_failure = p,
        }
    }
}

/// Register metrics with `registry` instead of the process-wide default registry.
pub fn with_registry(registry: Registry) -> TracerOption {
    TracerOption::Registry(registry)
}

/// Latency bucket upper bounds, in microseconds.
pub fn with_histogram_buckets(buckets: Vec<f64>) -> TracerOption {
    TracerOption::HistogramBuckets(buckets)
}

/// Constant labels attached to both server metric families.
pub fn with_const_labels<K, V>(labels: impl IntoIterator<Item = (K, V)>) -> TracerOption
where
    K: Into<String>,
    V: Into<String>,
{
    TracerOption::ConstLabels(
        labels
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect(),
    )
}

/// Do not start the metrics listener; the caller exposes the registry itself.
pub fn with_disable_server() -> TracerOption {
    TracerOption::DisableServer
}

/// Mount the exposition handler on the process-wide shared mux.
pub fn with_default_mux() -> TracerOption {
    TracerOption::DefaultMux
}

/// Register the process/runtime collector with the same registry.
pub fn with_runtime_collector() -> TracerOption {
    TracerOption::RuntimeCollector
}

/// Restrict the runtime collector to matching families.
pub fn with_runtime_metric_rules(rules: Vec<MetricRule>) -> TracerOption {
    TracerOption::RuntimeMetricRules(rules)
}

/// What happens when the metrics listener cannot bind or stops serving.
pub fn with_listener_failure(policy: ListenerFailurePolicy) -> TracerOption {
    TracerOption::ListenerFailure(policy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = TracerConfig::resolve(Vec::new());
        assert_eq!(cfg.buckets(), &DEFAULT_BUCKETS[..]);
        assert!(!cfg.disable_server());
        assert!(!cfg.use_default_mux());
        assert!(!cfg.enable_runtime_collector());
        assert!(cfg.const_labels().is_empty());
        assert!(matches!(cfg.listener_failure(), ListenerFailurePolicy::Exit));
    }

    #[test]
    fn later_options_override_earlier() {
        let cfg = TracerConfig::resolve([
            with_histogram_buckets(vec![1.0, 2.0]),
            with_disable_server(),
            with_histogram_buckets(vec![10.0]),
            with_listener_failure(ListenerFailurePolicy::Log),
        ]);
        assert_eq!(cfg.buckets(), &[10.0]);
        assert!(cfg.disable_server());
        assert!(matches!(cfg.listener_failure(), ListenerFailurePolicy::Log));
    }

    #[test]
    fn const_labels_and_rules() {
        let cfg = TracerConfig::resolve([
            with_const_labels([("service", "api")]),
            with_runtime_collector(),
            with_runtime_metric_rules(vec![MetricRule::Prefix("process_".into())]),
        ]);
        assert_eq!(cfg.const_labels().get("service").map(String::as_str), Some("api"));
        assert!(cfg.enable_runtime_collector());
        assert_eq!(cfg.runtime_metric_rules().len(), 1);
    }
}
