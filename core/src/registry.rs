// ssrpipe/src/registry.rs

//! Defines `Loaders<C, E>`, a route-keyed registry binding each page to its
//! loader pipeline.

use crate::core::context::RequestContext;
use crate::core::outcome::StepOutcome;
use crate::error::SsrPipeError;
use crate::pipeline::definition::Pipe;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Registry of loader pipelines, one per route.
///
/// Registration may happen while other tasks are loading; lookups only hold
/// the read lock long enough to clone the pipeline's `Arc`, never across an
/// `.await`.
pub struct Loaders<C, E>
where
  C: Send + Sync + 'static,
  E: std::error::Error + From<SsrPipeError> + Send + Sync + 'static,
{
  routes: RwLock<HashMap<String, Arc<Pipe<C, E>>>>,
}

impl<C, E> Loaders<C, E>
where
  C: Send + Sync + 'static,
  E: std::error::Error + From<SsrPipeError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      routes: RwLock::new(HashMap::new()),
    }
  }

  /// Binds `pipe` to `route`, replacing any earlier binding.
  pub fn register(&self, route: impl Into<String>, pipe: Pipe<C, E>) {
    let route = route.into();
    event!(Level::DEBUG, %route, num_steps = pipe.len(), "Registering loader pipeline.");
    let previous = self.routes.write().insert(route.clone(), Arc::new(pipe));
    if previous.is_some() {
      event!(Level::WARN, %route, "Replaced an existing loader pipeline.");
    }
  }

  pub fn contains(&self, route: &str) -> bool {
    self.routes.read().contains_key(route)
  }

  /// Registered routes, sorted.
  pub fn routes(&self) -> Vec<String> {
    let mut routes: Vec<String> = self.routes.read().keys().cloned().collect();
    routes.sort();
    routes
  }

  pub fn get(&self, route: &str) -> Option<Arc<Pipe<C, E>>> {
    self.routes.read().get(route).cloned()
  }

  /// Runs the pipeline bound to `route` for one request.
  #[instrument(name = "Loaders::load", skip(self, ctx), err(Display))]
  pub async fn load(&self, route: &str, ctx: RequestContext<C>) -> Result<StepOutcome, E> {
    let pipe = self.get(route).ok_or_else(|| {
      event!(Level::ERROR, "No loader pipeline registered for route.");
      E::from(SsrPipeError::RouteNotFound {
        route: route.to_string(),
      })
    })?;
    pipe.run(ctx).await
  }
}

impl<C, E> Default for Loaders<C, E>
where
  C: Send + Sync + 'static,
  E: std::error::Error + From<SsrPipeError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}
