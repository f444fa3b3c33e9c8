//! Process/runtime metrics collector.
//!
//! Wraps the `prometheus` process collector and filters the families it
//! exposes through [`MetricRule`]s. With no rules every family is exposed.

use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use serde::Deserialize;

/// Selects runtime metric families by name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricRule {
    Exact(String),
    Prefix(String),
}

impl MetricRule {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            MetricRule::Exact(n) => n == name,
            MetricRule::Prefix(p) => name.starts_with(p.as_str()),
        }
    }
}

pub struct RuntimeCollector {
    inner: Option<Box<dyn Collector>>,
    rules: Vec<MetricRule>,
}

impl RuntimeCollector {
    /// Collector over the current process.
    pub fn new(rules: Vec<MetricRule>) -> Self {
        Self::wrap(process_collector(), rules)
    }

    /// Filter an arbitrary collector through `rules`.
    pub fn wrap(inner: Option<Box<dyn Collector>>, rules: Vec<MetricRule>) -> Self {
        Self { inner, rules }
    }

    fn allows(&self, name: &str) -> bool {
        self.rules.is_empty() || self.rules.iter().any(|r| r.matches(name))
    }
}

impl Collector for RuntimeCollector {
    fn desc(&self) -> Vec<&Desc> {
        match &self.inner {
            Some(c) => c
                .desc()
                .into_iter()
                .filter(|d| self.allows(&d.fq_name))
                .collect(),
            None => Vec::new(),
        }
    }

    fn collect(&self) -> Vec<MetricFamily> {
        match &self.inner {
            Some(c) => c
                .collect()
                .into_iter()
                .filter(|mf| self.allows(mf.get_name()))
                .collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(target_os = "linux")]
fn process_collector() -> Option<Box<dyn Collector>> {
    Some(Box::new(
        prometheus::process_collector::ProcessCollector::for_self(),
    ))
}

#[cfg(not(target_os = "linux"))]
fn process_collector() -> Option<Box<dyn Collector>> {
    tracing::warn!("process metrics are only available on linux; runtime collector is empty");
    None
}
