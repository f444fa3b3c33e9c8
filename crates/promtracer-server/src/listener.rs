//! Supervised metrics listener.
//!
//! The listener runs for the life of the process and is never joined. Bind
//! and serve failures are routed to a [`ListenerFailurePolicy`] instead of
//! being dropped on the floor.

use std::fmt;
use std::sync::Arc;
use std::thread;

use axum::Router;
use promtracer_core::PromTracerError;
use tokio::runtime::{Builder, Handle};
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;

type FailureCallback = Arc<dyn Fn(PromTracerError) + Send + Sync>;

/// Reaction to a listener that cannot bind or stops serving.
#[derive(Clone, Default)]
pub enum ListenerFailurePolicy {
    /// Log and terminate the process.
    #[default]
    Exit,
    /// Log and keep running without a metrics endpoint.
    Log,
    /// Hand the error to the embedder.
    Notify(FailureCallback),
}

impl ListenerFailurePolicy {
    pub fn notify(f: impl Fn(PromTracerError) + Send + Sync + 'static) -> Self {
        ListenerFailurePolicy::Notify(Arc::new(f))
    }

    /// A `Notify` policy feeding an unbounded channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PromTracerError>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let policy = Self::notify(move |err| {
            let _ = tx.send(err);
        });
        (policy, rx)
    }

    pub(crate) fn handle(&self, err: PromTracerError) {
        match self {
            ListenerFailurePolicy::Exit => {
                tracing::error!(kind = err.kind().as_str(), error = %err, "metrics listener failed, exiting");
                std::process::exit(1);
            }
            ListenerFailurePolicy::Log => {
                tracing::error!(kind = err.kind().as_str(), error = %err, "metrics listener failed");
            }
            ListenerFailurePolicy::Notify(f) => f(err),
        }
    }
}

impl fmt::Debug for ListenerFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenerFailurePolicy::Exit => f.write_str("Exit"),
            ListenerFailurePolicy::Log => f.write_str("Log"),
            ListenerFailurePolicy::Notify(_) => f.write_str("Notify(..)"),
        }
    }
}

/// Accept Go-style `":port"` as "all interfaces".
pub fn normalize_addr(addr: &str) -> String {
    if addr.starts_with(':') {
        format!("0.0.0.0{addr}")
    } else {
        addr.to_string()
    }
}

/// Serve `router` on `addr` without blocking the caller.
///
/// Runs on the current tokio runtime when there is one, otherwise on a
/// dedicated thread with its own single-threaded runtime.
pub fn spawn_listener(addr: &str, router: Router, policy: ListenerFailurePolicy) {
    let addr = normalize_addr(addr);
    let app = router.layer(TraceLayer::new_for_http());
    let task = serve(addr, app, policy.clone());

    if let Ok(handle) = Handle::try_current() {
        handle.spawn(task);
        return;
    }

    let thread_policy = policy.clone();
    let spawned = thread::Builder::new()
        .name("promtracer-listener".into())
        .spawn(move || match Builder::new_current_thread().enable_all().build() {
            Ok(rt) => rt.block_on(task),
            Err(e) => thread_policy.handle(PromTracerError::Runtime(e.to_string())),
        });
    if let Err(e) = spawned {
        policy.handle(PromTracerError::Runtime(e.to_string()));
    }
}

async fn serve(addr: String, app: Router, policy: ListenerFailurePolicy) {
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(source) => {
            policy.handle(PromTracerError::Bind { addr, source });
            return;
        }
    };
    if let Ok(local) = listener.local_addr() {
        tracing::info!(%local, "metrics listener started");
    }

    if let Err(e) = axum::serve(listener, app).await {
        policy.handle(PromTracerError::Serve(e));
    }
}
