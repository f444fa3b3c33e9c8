//! Axum router wiring for the demo server.
//!
//! Exposes `GET /ping` and `POST /echo`, traced through [`HostTracing`].

use axum::{body::Bytes, routing::{get, post}, Router};

use crate::host::{instrument, HostTracing};

async fn ping() -> &'static str {
    "pong"
}

async fn echo(body: Bytes) -> Bytes {
    body
}

pub fn build_router(host: HostTracing) -> Router {
    let router = Router::new()
        .route("/ping", get(ping))
        .route("/echo", post(echo));
    instrument(router, host)
}
