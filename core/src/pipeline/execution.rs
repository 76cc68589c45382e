// ssrpipe/src/pipeline/execution.rs

//! Contains `Pipe::run()`, the sequential execution of a pipe's steps.

use crate::core::context::RequestContext;
use crate::core::outcome::StepOutcome;
use crate::core::props::Props;
use crate::core::step::Step;
use crate::error::SsrPipeError;
use crate::pipeline::definition::Pipe;
use async_trait::async_trait;
use tracing::{event, instrument, span, Instrument, Level};

impl<C, E> Pipe<C, E>
where
  C: Send + Sync + 'static,
  E: std::error::Error + From<SsrPipeError> + Send + Sync + 'static,
{
  /// Runs the pipe for one request, starting from empty `Props`.
  ///
  /// Returns the first terminal outcome (`NotFound` / `Redirect`) any step
  /// produces, or the accumulated `Props` once every step has run. A step
  /// error is returned as-is and no later step runs.
  pub async fn run(&self, ctx: RequestContext<C>) -> Result<StepOutcome, E> {
    self.run_with(ctx, Props::new()).await
  }

  /// Like [`Pipe::run`] but starts from `seed` instead of empty `Props`.
  #[instrument(
        name = "Pipe::run",
        skip_all,
        fields(
            context_type = %std::any::type_name::<C>(),
            num_steps = self.steps.len(),
        ),
        err(Display)
    )]
  pub async fn run_with(&self, ctx: RequestContext<C>, seed: Props) -> Result<StepOutcome, E> {
    event!(Level::DEBUG, "Pipe execution starting.");
    let mut acc = seed;

    for (step_idx, named) in self.steps.iter().enumerate() {
      let step_span = span!(
        Level::INFO,
        "pipe_step",
        step_name = named.name.as_str(),
        step_index = step_idx
      );

      // Each step sees exactly the merge of all earlier non-terminal results.
      let outcome = named
        .step
        .invoke(ctx.clone(), acc.clone())
        .instrument(step_span.clone())
        .await;

      match outcome {
        Ok(StepOutcome::Props(props)) => {
          event!(parent: &step_span, Level::TRACE, produced_keys = props.len(), "Step produced props.");
          acc.merge(props);
        }
        Ok(terminal) => {
          event!(
            parent: &step_span,
            Level::INFO,
            outcome = terminal.kind(),
            skipped_steps = self.steps.len() - step_idx - 1,
            "Pipe short-circuited by a terminal outcome."
          );
          return Ok(terminal);
        }
        Err(e) => {
          event!(parent: &step_span, Level::ERROR, error = %e, "Step failed.");
          return Err(e);
        }
      }
    }

    event!(Level::DEBUG, final_keys = acc.len(), "Pipe execution completed.");
    Ok(StepOutcome::Props(acc))
  }
}

// A pipe nested as a step continues from the outer accumulator.
#[async_trait]
impl<C, E> Step<C, E> for Pipe<C, E>
where
  C: Send + Sync + 'static,
  E: std::error::Error + From<SsrPipeError> + Send + Sync + 'static,
{
  async fn invoke(&self, ctx: RequestContext<C>, input: Props) -> Result<StepOutcome, E> {
    self.run_with(ctx, input).await
  }
}
