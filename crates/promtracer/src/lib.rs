//! Top-level facade crate for promtracer.
//!
//! Re-exports the tracer capability and the Prometheus server tracer so users can depend on a single crate.

pub mod core {
    pub use promtracer_core::*;
}

pub mod server {
    pub use promtracer_server::*;
}

pub use promtracer_server::{new_server_tracer, ServerTracer};
