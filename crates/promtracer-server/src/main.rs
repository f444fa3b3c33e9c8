//! promtracer demo server
//!
//! - Demo routes: GET /ping, POST /echo
//! - Every request traced into http_server_throughput / http_server_latency_us
//! - Metrics served on a separate listener (default :9091/metrics)

use std::net::SocketAddr;

use prometheus::Registry;
use tracing_subscriber::{fmt, EnvFilter};

use promtracer_server::{config, host::HostTracing, listener, options, router, tracer};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "promtracer.yaml".into());
    let cfg = config::load_from_file(&path).expect("config load failed");
    let listen: SocketAddr = listener::normalize_addr(&cfg.server.listen)
        .parse()
        .expect("server.listen must be a valid SocketAddr");

    let mut opts = vec![options::with_registry(Registry::new())];
    opts.extend(cfg.tracer_options());
    let server_tracer = tracer::new_server_tracer(&cfg.metrics.listen, &cfg.metrics.path, opts);

    let host = HostTracing::new(cfg.server.stats_level.into()).with_tracer(server_tracer);
    let app = router::build_router(host);

    tracing::info!(%listen, "promtracer demo server starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(listener, app).await.expect("server failed");
}
