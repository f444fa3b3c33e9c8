//! Prometheus text exposition of one registry.

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, MethodRouter},
};
use prometheus::{Encoder, Registry, TextEncoder};
use promtracer_core::{PromTracerError, Result};

/// Encode the registry as text. Encoding errors are logged and whatever was
/// encoded is still served.
pub async fn metrics(State(registry): State<Registry>) -> Response {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buf = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buf) {
        tracing::error!(error = %e, "failed to encode prometheus metrics");
    }

    (
        StatusCode::OK,
        [(CONTENT_TYPE, encoder.format_type().to_string())],
        buf,
    )
        .into_response()
}

/// The exposition handler bound to `registry`, ready to mount on a mux.
/// Scrapers are not limited to GET.
pub fn exposition_route(registry: Registry) -> MethodRouter {
    any(metrics).with_state(registry)
}

/// Text exposition of `registry`, for in-process consumers.
pub fn render(registry: &Registry) -> Result<String> {
    let mut buf = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buf)?;
    String::from_utf8(buf)
        .map_err(|e| PromTracerError::Metric(prometheus::Error::Msg(e.to_string())))
}
