//! Path-keyed HTTP mux for metrics listeners.
//!
//! Routes live in a shared table and are resolved per request through one
//! axum fallback, so a route mounted after its listener started is still
//! served.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::MethodRouter,
    Router,
};
use dashmap::{mapref::entry::Entry, DashMap};
use once_cell::sync::Lazy;
use promtracer_core::{PromTracerError, Result};
use tower::ServiceExt;

static DEFAULT_MUX: Lazy<ServeMux> = Lazy::new(ServeMux::new);

/// The process-wide shared mux, selected with [`crate::options::with_default_mux`].
pub fn default_mux() -> ServeMux {
    DEFAULT_MUX.clone()
}

#[derive(Clone, Default)]
pub struct ServeMux {
    routes: Arc<DashMap<String, MethodRouter>>,
}

impl ServeMux {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount `route` at `path`. A path can be mounted once.
    pub fn handle(&self, path: impl Into<String>, route: MethodRouter) -> Result<()> {
        match self.routes.entry(path.into()) {
            Entry::Occupied(e) => Err(PromTracerError::DuplicateRoute(e.key().clone())),
            Entry::Vacant(e) => {
                e.insert(route);
                Ok(())
            }
        }
    }

    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.routes.iter().map(|e| e.key().clone()).collect();
        paths.sort();
        paths
    }

    pub fn router(&self) -> Router {
        Router::new().fallback(dispatch).with_state(self.clone())
    }
}

async fn dispatch(State(mux): State<ServeMux>, req: Request) -> Response {
    let route = mux.routes.get(req.uri().path()).map(|r| r.value().clone());
    match route {
        Some(route) => match route.oneshot(req).await {
            Ok(resp) => resp,
            Err(never) => match never {},
        },
        None => (StatusCode::NOT_FOUND, "404 page not found").into_response(),
    }
}
