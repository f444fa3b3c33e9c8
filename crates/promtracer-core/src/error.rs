//! Shared error type across promtracer crates.

use thiserror::Error;

/// Stable error kinds, used as structured log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Metric registration or update rejected by the registry.
    Metric,
    /// A route was mounted twice on the same mux.
    DuplicateRoute,
    /// The metrics listener could not bind its address.
    Bind,
    /// The metrics listener stopped serving.
    Serve,
    /// No async runtime could be obtained for the listener.
    Runtime,
    /// Invalid configuration.
    BadConfig,
    /// Unsupported configuration version.
    UnsupportedVersion,
}

impl ErrorKind {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Metric => "METRIC",
            ErrorKind::DuplicateRoute => "DUPLICATE_ROUTE",
            ErrorKind::Bind => "BIND",
            ErrorKind::Serve => "SERVE",
            ErrorKind::Runtime => "RUNTIME",
            ErrorKind::BadConfig => "BAD_CONFIG",
            ErrorKind::UnsupportedVersion => "UNSUPPORTED_VERSION",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, PromTracerError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum PromTracerError {
    #[error("metric: {0}")]
    Metric(#[from] prometheus::Error),
    #[error("route already registered: {0}")]
    DuplicateRoute(String),
    #[error("unable to bind metrics listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("metrics listener failed: {0}")]
    Serve(#[source] std::io::Error),
    #[error("runtime: {0}")]
    Runtime(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
}

impl PromTracerError {
    /// Map the error to its stable kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PromTracerError::Metric(_) => ErrorKind::Metric,
            PromTracerError::DuplicateRoute(_) => ErrorKind::DuplicateRoute,
            PromTracerError::Bind { .. } => ErrorKind::Bind,
            PromTracerError::Serve(_) => ErrorKind::Serve,
            PromTracerError::Runtime(_) => ErrorKind::Runtime,
            PromTracerError::BadConfig(_) => ErrorKind::BadConfig,
            PromTracerError::UnsupportedVersion => ErrorKind::UnsupportedVersion,
        }
    }
}
