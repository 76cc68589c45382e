// ssrpipe/src/core/context.rs

//! Read-only, per-invocation request data shared by every step of a pipeline run.

use std::ops::Deref;
use std::sync::Arc;

/// A shared handle to the request context of one pipeline invocation.
///
/// Unlike the accumulated `Props`, the context is never written by steps:
/// every step (including concurrently running branches of a parallel group)
/// gets its own clone of the same `Arc`, so no locking is involved.
#[derive(Debug)]
pub struct RequestContext<C: Send + Sync + 'static>(Arc<C>);

impl<C: Send + Sync + 'static> RequestContext<C> {
  pub fn new(data: C) -> Self {
    RequestContext(Arc::new(data))
  }

  /// Borrows the underlying request data.
  pub fn get(&self) -> &C {
    &self.0
  }

  /// Number of live handles to this context. Mostly useful in tests.
  pub fn handle_count(&self) -> usize {
    Arc::strong_count(&self.0)
  }
}

impl<C: Send + Sync + 'static> Deref for RequestContext<C> {
  type Target = C;

  fn deref(&self) -> &C {
    &self.0
  }
}

impl<C: Send + Sync + 'static> Clone for RequestContext<C> {
  fn clone(&self) -> Self {
    RequestContext(Arc::clone(&self.0))
  }
}

impl<C: Send + Sync + 'static + Default> Default for RequestContext<C> {
  fn default() -> Self {
    Self::new(Default::default())
  }
}

impl<C: Send + Sync + 'static> From<Arc<C>> for RequestContext<C> {
  fn from(shared: Arc<C>) -> Self {
    RequestContext(shared)
  }
}
