//! promtracer core: the host tracer capability, per-request trace records, and
//! the shared error surface.
//!
//! A host web framework drives a [`Tracer`] through two lifecycle hooks,
//! `start` at request entry and `finish` at request exit, handing it a
//! [`RequestContext`] whose [`TraceInfo`] carries timing events. This crate
//! carries no HTTP server or runtime dependencies so any host can implement
//! the driving side.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! All fallible paths surface as `PromTracerError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod request;
pub mod tracer;

/// Shared result type.
pub use error::{Result, PromTracerError};
pub use request::RequestContext;
pub use tracer::stats::{Event, Stats, StatsLevel, TraceInfo};
pub use tracer::{Context, Tracer};
