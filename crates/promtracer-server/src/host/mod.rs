//! Axum host integration.
//!
//! Drives [`Tracer`]s from an axum router: every request gets a
//! [`RequestContext`] with its own trace info, `start` runs before the
//! handler, `finish` after the response is produced. A request dropped
//! before completion cancels its [`Context`] and never reaches `finish`.

use std::sync::Arc;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::{self, Next},
    response::Response,
    Router,
};
use promtracer_core::{Context, Event, RequestContext, StatsLevel, Tracer};

/// Tracers plus the stats level every request is traced at.
#[derive(Clone)]
pub struct HostTracing {
    tracers: Arc<Vec<Arc<dyn Tracer>>>,
    level: StatsLevel,
}

impl HostTracing {
    pub fn new(level: StatsLevel) -> Self {
        Self {
            tracers: Arc::new(Vec::new()),
            level,
        }
    }

    pub fn with_tracer(mut self, tracer: impl Tracer + 'static) -> Self {
        Arc::make_mut(&mut self.tracers).push(Arc::new(tracer));
        self
    }

    pub fn level(&self) -> StatsLevel {
        self.level
    }
}

/// Wrap every route of `router` with the tracing middleware.
pub fn instrument(router: Router, host: HostTracing) -> Router {
    router.layer(middleware::from_fn_with_state(host, trace_request))
}

pub async fn trace_request(State(host): State<HostTracing>, req: Request, next: Next) -> Response {
    let full_path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_default();

    let mut c = RequestContext::new(req.method().as_str(), full_path, host.level);
    c.trace_info_mut().stats_mut().record(Event::HttpStart);

    let mut ctx = Context::new();
    for tracer in host.tracers.iter() {
        ctx = tracer.start(ctx, &c);
    }
    let guard = ctx.cancel_on_drop();

    c.trace_info_mut().stats_mut().record(Event::ServerHandleStart);
    let response = next.run(req).await;
    c.trace_info_mut().stats_mut().record(Event::ServerHandleFinish);

    c.set_status_code(response.status().as_u16());
    c.trace_info_mut().stats_mut().record(Event::HttpFinish);

    for tracer in host.tracers.iter() {
        tracer.finish(&ctx, &c);
    }
    let _ = guard.disarm();

    response
}
