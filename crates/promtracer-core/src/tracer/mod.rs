//! Host tracer capability.
//!
//! A host framework holds one or more [`Tracer`]s and calls `start` when a
//! request enters and `finish` once its response is known. Both hooks are
//! infallible from the host's point of view: instrumentation never fails or
//! blocks the request path.

pub mod stats;

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use tokio_util::sync::{CancellationToken, DropGuard};

use crate::request::RequestContext;

/// Request lifecycle hooks consumed by the host framework.
pub trait Tracer: Send + Sync {
    /// Called at request entry. Returns the context the rest of the request runs with.
    fn start(&self, ctx: Context, c: &RequestContext) -> Context;

    /// Called at request exit with the context returned by `start`.
    fn finish(&self, ctx: &Context, c: &RequestContext);
}

impl<T: Tracer + ?Sized> Tracer for Arc<T> {
    fn start(&self, ctx: Context, c: &RequestContext) -> Context {
        (**self).start(ctx, c)
    }

    fn finish(&self, ctx: &Context, c: &RequestContext) {
        (**self).finish(ctx, c)
    }
}

/// Cancellation-aware per-request context with typed values.
///
/// Cloning is cheap; clones share the cancellation state.
#[derive(Clone, Default)]
pub struct Context {
    cancel: CancellationToken,
    values: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a context that is cancelled together with `self`, but can also be cancelled on its own.
    pub fn child(&self) -> Self {
        Self {
            cancel: self.cancel.child_token(),
            values: self.values.clone(),
        }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves once the context is cancelled.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }

    /// Cancel the context when the returned guard drops, unless it is disarmed first.
    pub fn cancel_on_drop(&self) -> DropGuard {
        self.cancel.clone().drop_guard()
    }

    /// Attach a value, replacing any previous value of the same type.
    pub fn with_value<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.values.insert(TypeId::of::<T>(), Arc::new(value));
        self
    }

    pub fn value<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("cancelled", &self.is_cancelled())
            .field("values", &self.values.len())
            .finish()
    }
}
