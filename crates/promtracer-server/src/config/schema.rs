use std::collections::HashMap;
use std::net::SocketAddr;

use serde::Deserialize;
use promtracer_core::error::{PromTracerError, Result};
use promtracer_core::StatsLevel;

use crate::listener::{normalize_addr, ListenerFailurePolicy};
use crate::obs::runtime::MetricRule;
use crate::options::{self, TracerOption};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub metrics: MetricsSection,
}

impl FileConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(PromTracerError::UnsupportedVersion);
        }
        self.server.validate()?;
        self.metrics.validate()?;
        Ok(())
    }

    /// Tracer options equivalent to the `metrics` section.
    pub fn tracer_options(&self) -> Vec<TracerOption> {
        let m = &self.metrics;
        let mut opts = Vec::new();
        if let Some(buckets) = &m.buckets {
            opts.push(options::with_histogram_buckets(buckets.clone()));
        }
        if !m.const_labels.is_empty() {
            opts.push(options::with_const_labels(m.const_labels.clone()));
        }
        if !m.serve {
            opts.push(options::with_disable_server());
        }
        if m.default_mux {
            opts.push(options::with_default_mux());
        }
        if m.runtime_collector {
            opts.push(options::with_runtime_collector());
            opts.push(options::with_runtime_metric_rules(m.runtime_metric_rules.clone()));
        }
        opts.push(options::with_listener_failure(m.on_listener_failure.into()));
        opts
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_server_listen")]
    pub listen: String,

    #[serde(default)]
    pub stats_level: StatsLevelSetting,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_server_listen(),
            stats_level: StatsLevelSetting::default(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        parse_listen("server.listen", &self.listen)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatsLevelSetting {
    Disabled,
    #[default]
    Base,
    Detailed,
}

impl From<StatsLevelSetting> for StatsLevel {
    fn from(s: StatsLevelSetting) -> Self {
        match s {
            StatsLevelSetting::Disabled => StatsLevel::Disabled,
            StatsLevelSetting::Base => StatsLevel::Base,
            StatsLevelSetting::Detailed => StatsLevel::Detailed,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    #[serde(default = "default_metrics_listen")]
    pub listen: String,

    #[serde(default = "default_metrics_path")]
    pub path: String,

    #[serde(default = "default_true")]
    pub serve: bool,

    #[serde(default)]
    pub default_mux: bool,

    /// Latency bucket upper bounds in microseconds.
    #[serde(default)]
    pub buckets: Option<Vec<f64>>,

    #[serde(default)]
    pub const_labels: HashMap<String, String>,

    #[serde(default)]
    pub runtime_collector: bool,

    /// Written as `- exact: name` or `- prefix: name`.
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub runtime_metric_rules: Vec<MetricRule>,

    #[serde(default)]
    pub on_listener_failure: ListenerFailureSetting,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            listen: default_metrics_listen(),
            path: default_metrics_path(),
            serve: true,
            default_mux: false,
            buckets: None,
            const_labels: HashMap::new(),
            runtime_collector: false,
            runtime_metric_rules: Vec::new(),
            on_listener_failure: ListenerFailureSetting::default(),
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        parse_listen("metrics.listen", &self.listen)?;
        if !self.path.starts_with('/') {
            return Err(PromTracerError::BadConfig(
                "metrics.path must start with '/'".into(),
            ));
        }
        if let Some(buckets) = &self.buckets {
            if buckets.is_empty() {
                return Err(PromTracerError::BadConfig(
                    "metrics.buckets must not be empty".into(),
                ));
            }
            if buckets.iter().any(|b| !b.is_finite() || *b <= 0.0) {
                return Err(PromTracerError::BadConfig(
                    "metrics.buckets must be positive and finite".into(),
                ));
            }
            if !buckets.windows(2).all(|w| w[0] < w[1]) {
                return Err(PromTracerError::BadConfig(
                    "metrics.buckets must be strictly increasing".into(),
                ));
            }
        }
        if !self.runtime_collector && !self.runtime_metric_rules.is_empty() {
            return Err(PromTracerError::BadConfig(
                "metrics.runtime_metric_rules requires runtime_collector".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ListenerFailureSetting {
    #[default]
    Exit,
    Log,
}

impl From<ListenerFailureSetting> for ListenerFailurePolicy {
    fn from(s: ListenerFailureSetting) -> Self {
        match s {
            ListenerFailureSetting::Exit => ListenerFailurePolicy::Exit,
            ListenerFailureSetting::Log => ListenerFailurePolicy::Log,
        }
    }
}

fn parse_listen(field: &str, addr: &str) -> Result<SocketAddr> {
    normalize_addr(addr)
        .parse()
        .map_err(|e| PromTracerError::BadConfig(format!("{field} must be a valid SocketAddr: {e}")))
}

fn default_server_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_metrics_listen() -> String {
    ":9091".into()
}
fn default_metrics_path() -> String {
    "/metrics".into()
}
fn default_true() -> bool {
    true
}
