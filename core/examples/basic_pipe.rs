// ssrpipe/examples/basic_pipe.rs

use serde_json::json;
use ssrpipe::{step_fn, sync_step, Parallel, Pipe, Props, RequestContext, SsrPipeError, StepOutcome};
use tracing::info;

// 1. Define the request context the steps can read
#[derive(Clone, Debug, Default)]
struct PageRequest {
  path: String,
  locale: String,
}

#[tokio::main]
async fn main() -> Result<(), SsrPipeError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Basic Pipe Example ---");

  // 2. Compose: one sequential step, then two independent ones side by side
  let pipe = Pipe::<PageRequest, SsrPipeError>::new()
    .step(
      "locale",
      sync_step(|req: &PageRequest, _input: &Props| {
        let mut out = Props::new();
        out.insert("locale", &req.locale)?;
        Ok::<_, SsrPipeError>(StepOutcome::Props(out))
      }),
    )
    .step(
      "content",
      Parallel::new()
        .branch(
          "title",
          step_fn(|req: RequestContext<PageRequest>, input: Props| async move {
            let locale: String = input.get("locale")?.unwrap_or_default();
            let mut out = Props::new();
            out.insert("title", format!("{} ({})", req.path, locale))?;
            Ok::<_, SsrPipeError>(StepOutcome::Props(out))
          }),
        )
        .branch(
          "menu",
          sync_step(|_req: &PageRequest, _input: &Props| {
            Ok::<_, SsrPipeError>(StepOutcome::Props(Props::try_from(json!({ "menu": ["home", "albums"] }))?))
          }),
        ),
    );

  // 3. Run it for one request
  let ctx = RequestContext::new(PageRequest {
    path: "/albums".to_string(),
    locale: "en".to_string(),
  });
  let outcome = pipe.run(ctx).await?;

  // 4. Inspect the outcome
  match outcome {
    StepOutcome::Props(props) => info!("Render with props: {}", props.into_value()),
    StepOutcome::NotFound => info!("Respond 404"),
    StepOutcome::Redirect(r) => info!("Respond {} -> {}", r.status(), r.destination()),
  }
  Ok(())
}
