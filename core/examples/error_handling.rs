// ssrpipe/examples/error_handling.rs

use ssrpipe::{step_fn, Loaders, Parallel, Pipe, Props, RequestContext, SsrPipeError, StepOutcome};
use tracing::{error, info};

// 1. Define a custom application error type
#[derive(Debug, thiserror::Error)]
enum ExampleAppError {
  #[error("Upstream service unavailable: {0}")]
  Upstream(String),

  #[error("Loader framework error: {0}")]
  Framework(#[from] SsrPipeError), // Allows SsrPipeError to be converted into ExampleAppError
}

#[derive(Clone, Debug, Default)]
struct ErrorContext;

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Error Handling Example ---");

  let loaders = Loaders::<ErrorContext, ExampleAppError>::new();
  loaders.register(
    "/dashboard",
    Pipe::<ErrorContext, ExampleAppError>::new()
      .step(
        "auth",
        step_fn(|_ctx: RequestContext<ErrorContext>, _input: Props| async move {
          let mut out = Props::new();
          out.insert("user", 1)?;
          Ok::<_, ExampleAppError>(StepOutcome::Props(out))
        }),
      )
      .step(
        "widgets",
        Parallel::new()
          .branch(
            "weather",
            step_fn(|_ctx: RequestContext<ErrorContext>, _input: Props| async move {
              Err::<StepOutcome, _>(ExampleAppError::Upstream("weather API timed out".to_string()))
            }),
          )
          .branch(
            "news",
            step_fn(|_ctx: RequestContext<ErrorContext>, _input: Props| async move {
              Ok::<_, ExampleAppError>(StepOutcome::Props(Props::new()))
            }),
          ),
      ),
  );

  // Scenario 1: a step fails inside a parallel group
  info!("Scenario 1: step error propagates to the caller");
  match loaders.load("/dashboard", RequestContext::new(ErrorContext)).await {
    Err(ExampleAppError::Upstream(msg)) => info!("Load failed as expected: {}", msg),
    other => error!("Unexpected result: {:?}", other),
  }

  // Scenario 2: a framework error (unknown route)
  info!("Scenario 2: unknown route");
  match loaders.load("/nowhere", RequestContext::new(ErrorContext)).await {
    Err(ExampleAppError::Framework(SsrPipeError::RouteNotFound { route })) => {
      info!("Load failed as expected, no loaders for {}", route)
    }
    other => error!("Unexpected result: {:?}", other),
  }
}
