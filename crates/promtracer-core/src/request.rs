//! Per-request view handed to tracers.

use crate::tracer::stats::{StatsLevel, TraceInfo};

/// What a tracer can see about one request/response pair.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    method: String,
    full_path: String,
    status_code: Option<u16>,
    trace_info: TraceInfo,
}

impl RequestContext {
    /// `full_path` is the matched route template, empty when no route matched.
    pub fn new(method: impl Into<String>, full_path: impl Into<String>, level: StatsLevel) -> Self {
        Self {
            method: method.into(),
            full_path: full_path.into(),
            status_code: None,
            trace_info: TraceInfo::new(level),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    /// Response status, `None` until the response is known.
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn set_status_code(&mut self, status: u16) {
        self.status_code = Some(status);
    }

    pub fn trace_info(&self) -> &TraceInfo {
        &self.trace_info
    }

    pub fn trace_info_mut(&mut self) -> &mut TraceInfo {
        &mut self.trace_info
    }
}
