//! Metric update path and text exposition.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::collections::HashMap;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};
use tower::ServiceExt;

use promtracer_server::mux::ServeMux;
use promtracer_server::obs::{counter_add, histogram_observe, Labels, DEFAULT_BUCKETS};
use promtracer_server::ops;

fn test_families(registry: &Registry) -> (IntCounterVec, HistogramVec) {
    let const_labels: HashMap<String, String> =
        [("service".to_string(), "prometheus-test".to_string())].into();

    let counter = IntCounterVec::new(
        Opts::new("test_counter", "test counter").const_labels(const_labels.clone()),
        &["test1", "test2"],
    )
    .unwrap();
    registry.register(Box::new(counter.clone())).unwrap();

    let histogram = HistogramVec::new(
        HistogramOpts::new("test_histogram", "test histogram")
            .const_labels(const_labels)
            .buckets(DEFAULT_BUCKETS.to_vec()),
        &["test1", "test2"],
    )
    .unwrap();
    registry.register(Box::new(histogram.clone())).unwrap();

    (counter, histogram)
}

async fn scrape(mux: &ServeMux, path: &str) -> (StatusCode, String, String) {
    let resp = mux
        .router()
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn hundred_millis_lands_in_hundred_thousand_bucket() {
    let registry = Registry::new();
    let mux = ServeMux::new();
    mux.handle("/metrics-demo", ops::exposition_route(registry.clone()))
        .unwrap();

    let (counter, histogram) = test_families(&registry);
    let labels = Labels::from_iter([("test1", "abc"), ("test2", "def")]);

    counter_add(&counter, 6, &labels).unwrap();
    histogram_observe(&histogram, Duration::from_millis(100), &labels).unwrap();

    let (status, content_type, body) = scrape(&mux, "/metrics-demo").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/plain"));
    assert!(body.contains(r#"test_counter{service="prometheus-test",test1="abc",test2="def"} 6"#));
    assert!(body.contains(
        r#"test_histogram_bucket{service="prometheus-test",test1="abc",test2="def",le="50000"} 0"#
    ));
    assert!(body.contains(
        r#"test_histogram_bucket{service="prometheus-test",test1="abc",test2="def",le="100000"} 1"#
    ));
}

#[test]
fn observation_below_smallest_bound_is_counted_by_every_bucket() {
    let registry = Registry::new();
    let (_, histogram) = test_families(&registry);
    let labels = Labels::from_iter([("test1", "a"), ("test2", "b")]);

    histogram_observe(&histogram, Duration::from_micros(4_999), &labels).unwrap();
    histogram_observe(&histogram, Duration::from_millis(30), &labels).unwrap();
    histogram_observe(&histogram, Duration::from_secs(2), &labels).unwrap();

    let label_pairs = [("test1", "a"), ("test2", "b")];
    let buckets = common::buckets(&registry, "test_histogram", &label_pairs);
    assert_eq!(buckets.len(), DEFAULT_BUCKETS.len());
    assert!(buckets.windows(2).all(|w| w[0].1 <= w[1].1));

    assert_eq!(common::bucket_count(&registry, "test_histogram", &label_pairs, 5_000.0), Some(1));
    assert_eq!(common::bucket_count(&registry, "test_histogram", &label_pairs, 25_000.0), Some(1));
    assert_eq!(common::bucket_count(&registry, "test_histogram", &label_pairs, 50_000.0), Some(2));
    assert_eq!(
        common::bucket_count(&registry, "test_histogram", &label_pairs, 1_000_000.0),
        Some(2)
    );
    assert_eq!(common::sample_count(&registry, "test_histogram", &label_pairs), 3);
}

#[test]
fn observation_above_smallest_bound_leaves_it_empty() {
    let registry = Registry::new();
    let (_, histogram) = test_families(&registry);
    let labels = Labels::from_iter([("test1", "a"), ("test2", "b")]);

    histogram_observe(&histogram, Duration::from_millis(7), &labels).unwrap();

    let label_pairs = [("test1", "a"), ("test2", "b")];
    assert_eq!(common::bucket_count(&registry, "test_histogram", &label_pairs, 5_000.0), Some(0));
    assert_eq!(common::bucket_count(&registry, "test_histogram", &label_pairs, 10_000.0), Some(1));
}

#[test]
fn mismatched_labels_do_not_touch_the_registry() {
    let registry = Registry::new();
    let (counter, _) = test_families(&registry);
    let wrong = Labels::from_iter([("test1", "a"), ("other", "b")]);

    assert!(counter_add(&counter, 1, &wrong).is_err());
    assert_eq!(common::counter_value(&registry, "test_counter", &[("test1", "a")]), 0.0);
}

#[tokio::test]
async fn scraping_is_read_only() {
    let registry = Registry::new();
    let mux = ServeMux::new();
    mux.handle("/metrics", ops::exposition_route(registry.clone())).unwrap();

    let (counter, histogram) = test_families(&registry);
    let labels = Labels::from_iter([("test1", "x"), ("test2", "y")]);
    counter_add(&counter, 3, &labels).unwrap();
    histogram_observe(&histogram, Duration::from_millis(12), &labels).unwrap();

    let (_, _, first) = scrape(&mux, "/metrics").await;
    let (_, _, second) = scrape(&mux, "/metrics").await;
    assert_eq!(first, second);
    assert_eq!(first, ops::render(&registry).unwrap());
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let mux = ServeMux::new();
    mux.handle("/metrics", ops::exposition_route(Registry::new())).unwrap();

    let (status, _, _) = scrape(&mux, "/other").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn exposition_answers_any_method() {
    let registry = Registry::new();
    let mux = ServeMux::new();
    mux.handle("/metrics", ops::exposition_route(registry.clone())).unwrap();
    let (counter, _) = test_families(&registry);
    counter_add(&counter, 1, &Labels::from_iter([("test1", "p"), ("test2", "q")])).unwrap();

    let resp = mux
        .router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(String::from_utf8(body.to_vec()).unwrap(), ops::render(&registry).unwrap());
}
