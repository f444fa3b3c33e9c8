//! Registry inspection helpers shared by integration tests.

#![allow(dead_code)]

use std::time::{Duration, Instant};

use prometheus::proto::{Metric, MetricFamily};
use prometheus::Registry;
use promtracer_core::{Event, RequestContext, StatsLevel};

fn find<'a>(families: &'a [MetricFamily], name: &str, labels: &[(&str, &str)]) -> Option<&'a Metric> {
    families
        .iter()
        .find(|f| f.get_name() == name)?
        .get_metric()
        .iter()
        .find(|m| {
            labels.iter().all(|(k, v)| {
                m.get_label()
                    .iter()
                    .any(|l| l.get_name() == *k && l.get_value() == *v)
            })
        })
}

/// Counter value for a label combination, 0 when it was never observed.
pub fn counter_value(registry: &Registry, name: &str, labels: &[(&str, &str)]) -> f64 {
    let families = registry.gather();
    find(&families, name, labels)
        .map(|m| m.get_counter().get_value())
        .unwrap_or(0.0)
}

/// `(upper_bound, cumulative_count)` pairs, finite bounds only.
pub fn buckets(registry: &Registry, name: &str, labels: &[(&str, &str)]) -> Vec<(f64, u64)> {
    let families = registry.gather();
    find(&families, name, labels)
        .map(|m| {
            m.get_histogram()
                .get_bucket()
                .iter()
                .map(|b| (b.get_upper_bound(), b.get_cumulative_count()))
                .collect()
        })
        .unwrap_or_default()
}

pub fn bucket_count(registry: &Registry, name: &str, labels: &[(&str, &str)], le: f64) -> Option<u64> {
    buckets(registry, name, labels)
        .into_iter()
        .find(|(ub, _)| *ub == le)
        .map(|(_, c)| c)
}

pub fn sample_count(registry: &Registry, name: &str, labels: &[(&str, &str)]) -> u64 {
    let families = registry.gather();
    find(&families, name, labels)
        .map(|m| m.get_histogram().get_sample_count())
        .unwrap_or(0)
}

/// A finished request that took `cost`.
pub fn finished_request(method: &str, path: &str, status: u16, cost: Duration) -> RequestContext {
    let mut c = RequestContext::new(method, path, StatsLevel::Base);
    let start = Instant::now();
    let stats = c.trace_info_mut().stats_mut();
    stats.record_at(Event::HttpStart, start);
    stats.record_at(Event::HttpFinish, start + cost);
    c.set_status_code(status);
    c
}

/// An address nothing listens on right now.
pub fn free_addr() -> String {
    let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    l.local_addr().unwrap().to_string()
}
