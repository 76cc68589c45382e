// ssrpipe/src/core/step.rs

//! Defines the `Step<C, E>` capability contract and adapters that turn plain
//! closures into steps.

use crate::core::context::RequestContext;
use crate::core::outcome::StepOutcome;
use crate::core::props::Props;
use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// A unit of pipeline work.
///
/// A step receives the shared request context and the accumulated `Props`
/// so far, and produces a [`StepOutcome`]. It may suspend while awaiting
/// external work. Errors are the caller's own type `E` and are propagated
/// verbatim by the sequencer and the parallel combinator.
#[async_trait]
pub trait Step<C, E>: Send + Sync
where
  C: Send + Sync + 'static,
  E: Send + 'static,
{
  async fn invoke(&self, ctx: RequestContext<C>, input: Props) -> Result<StepOutcome, E>;
}

/// Type-erased step as stored by pipes and parallel groups.
pub type SharedStep<C, E> = Arc<dyn Step<C, E>>;

#[async_trait]
impl<C, E, S> Step<C, E> for Arc<S>
where
  C: Send + Sync + 'static,
  E: Send + 'static,
  S: Step<C, E> + ?Sized,
{
  async fn invoke(&self, ctx: RequestContext<C>, input: Props) -> Result<StepOutcome, E> {
    (**self).invoke(ctx, input).await
  }
}

/// A step backed by an async closure. Built with [`step_fn`].
pub struct FnStep<C, E, F> {
  f: F,
  _marker: PhantomData<fn(C) -> E>,
}

/// Wraps `Fn(RequestContext<C>, Props) -> Future<Output = Result<StepOutcome, E>>` as a step.
pub fn step_fn<C, E, F, Fut>(f: F) -> FnStep<C, E, F>
where
  C: Send + Sync + 'static,
  F: Fn(RequestContext<C>, Props) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<StepOutcome, E>> + Send + 'static,
{
  FnStep { f, _marker: PhantomData }
}

#[async_trait]
impl<C, E, F, Fut> Step<C, E> for FnStep<C, E, F>
where
  C: Send + Sync + 'static,
  E: Send + 'static,
  F: Fn(RequestContext<C>, Props) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<StepOutcome, E>> + Send + 'static,
{
  async fn invoke(&self, ctx: RequestContext<C>, input: Props) -> Result<StepOutcome, E> {
    (self.f)(ctx, input).await
  }
}

/// A step that never suspends. Built with [`sync_step`].
pub struct SyncStep<C, E, F> {
  f: F,
  _marker: PhantomData<fn(C) -> E>,
}

/// Wraps `Fn(&C, &Props) -> Result<StepOutcome, E>` as a step.
pub fn sync_step<C, E, F>(f: F) -> SyncStep<C, E, F>
where
  F: Fn(&C, &Props) -> Result<StepOutcome, E> + Send + Sync + 'static,
{
  SyncStep { f, _marker: PhantomData }
}

#[async_trait]
impl<C, E, F> Step<C, E> for SyncStep<C, E, F>
where
  C: Send + Sync + 'static,
  E: Send + 'static,
  F: Fn(&C, &Props) -> Result<StepOutcome, E> + Send + Sync + 'static,
{
  async fn invoke(&self, ctx: RequestContext<C>, input: Props) -> Result<StepOutcome, E> {
    (self.f)(ctx.get(), &input)
  }
}
