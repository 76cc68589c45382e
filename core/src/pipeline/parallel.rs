// ssrpipe/src/pipeline/parallel.rs

//! The `Parallel<C, E>` combinator: a step that fans out to a fixed set of
//! branches and folds their outcomes back into one.

use crate::core::context::RequestContext;
use crate::core::outcome::{Redirect, StepOutcome};
use crate::core::props::Props;
use crate::core::step::{SharedStep, Step};
use crate::error::SsrPipeError;
use crate::pipeline::definition::NamedStep;
use async_trait::async_trait;
use futures_util::future::try_join_all;
use std::sync::Arc;
use tracing::{event, instrument, span, Instrument, Level};

/// Runs every branch concurrently against the same input and merges the results.
///
/// All branches are dispatched before the group suspends, then the group
/// waits for every one of them to settle. There is no first-to-finish
/// short-circuit: a branch returning `NotFound` early does not cancel its
/// slower siblings. Branches are polled on the calling task, so "parallel"
/// means interleaved suspension, not separate threads.
///
/// Resolution looks at all settled outcomes in declaration order:
///  - any `NotFound` wins, wherever it appears;
///  - otherwise the first `Redirect` wins;
///  - otherwise all `Props` are merged left to right, later branches
///    overriding earlier ones on key collisions.
///
/// If a branch fails, the group fails with that error.
pub struct Parallel<C, E>
where
  C: Send + Sync + 'static,
  E: std::error::Error + From<SsrPipeError> + Send + Sync + 'static,
{
  branches: Vec<NamedStep<C, E>>,
}

impl<C, E> Parallel<C, E>
where
  C: Send + Sync + 'static,
  E: std::error::Error + From<SsrPipeError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self { branches: Vec::new() }
  }

  pub fn branch(mut self, name: impl Into<String>, step: impl Step<C, E> + 'static) -> Self {
    self.branches.push(NamedStep {
      name: name.into(),
      step: Arc::new(step),
    });
    self
  }

  pub fn shared_branch(mut self, name: impl Into<String>, step: SharedStep<C, E>) -> Self {
    self.branches.push(NamedStep { name: name.into(), step });
    self
  }

  pub fn len(&self) -> usize {
    self.branches.len()
  }

  pub fn is_empty(&self) -> bool {
    self.branches.is_empty()
  }

  pub fn branch_names(&self) -> Vec<&str> {
    self.branches.iter().map(|b| b.name.as_str()).collect()
  }
}

impl<C, E> Default for Parallel<C, E>
where
  C: Send + Sync + 'static,
  E: std::error::Error + From<SsrPipeError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<C, E> Clone for Parallel<C, E>
where
  C: Send + Sync + 'static,
  E: std::error::Error + From<SsrPipeError> + Send + Sync + 'static,
{
  fn clone(&self) -> Self {
    Self {
      branches: self.branches.clone(),
    }
  }
}

#[async_trait]
impl<C, E> Step<C, E> for Parallel<C, E>
where
  C: Send + Sync + 'static,
  E: std::error::Error + From<SsrPipeError> + Send + Sync + 'static,
{
  #[instrument(
        name = "Parallel::invoke",
        skip_all,
        fields(num_branches = self.branches.len()),
        err(Display)
    )]
  async fn invoke(&self, ctx: RequestContext<C>, input: Props) -> Result<StepOutcome, E> {
    let pending = self.branches.iter().enumerate().map(|(branch_idx, named)| {
      let branch_span = span!(
        Level::INFO,
        "parallel_branch",
        branch_name = named.name.as_str(),
        branch_index = branch_idx
      );
      let ctx = ctx.clone();
      let input = input.clone();
      async move {
        named.step.invoke(ctx, input).await.map_err(|e| {
          event!(Level::ERROR, error = %e, "Parallel branch failed.");
          e
        })
      }
      .instrument(branch_span)
    });

    // Outcomes come back in declaration order, whatever order they settled in.
    let outcomes = try_join_all(pending).await?;
    let resolved = resolve_outcomes(outcomes);
    event!(Level::DEBUG, outcome = resolved.kind(), "Parallel group resolved.");
    Ok(resolved)
  }
}

/// Folds settled branch outcomes, given in declaration order, into one.
pub(crate) fn resolve_outcomes(outcomes: Vec<StepOutcome>) -> StepOutcome {
  let mut merged = Props::new();
  let mut not_found = false;
  let mut first_redirect: Option<Redirect> = None;

  for outcome in outcomes {
    match outcome {
      StepOutcome::Props(props) => merged.merge(props),
      StepOutcome::NotFound => not_found = true,
      StepOutcome::Redirect(redirect) => {
        if first_redirect.is_none() {
          first_redirect = Some(redirect);
        }
      }
    }
  }

  if not_found {
    return StepOutcome::NotFound;
  }
  match first_redirect {
    Some(redirect) => StepOutcome::Redirect(redirect),
    None => StepOutcome::Props(merged),
  }
}
