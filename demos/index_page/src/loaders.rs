// index_page/src/loaders.rs

//! The index page's loader steps and the routes that chain them.

use crate::errors::{DemoError, Result as DemoResult};
use crate::models::{PageRequest, User};
use ssrpipe::{step_fn, Loaders, Parallel, Pipe, Props, RequestContext, Step, StepOutcome};
use tracing::info;

/// Resolves the visitor. Anonymous visitors get `NotFound`, which stops the page.
pub fn with_auth() -> impl Step<PageRequest, DemoError> {
  step_fn(|req: RequestContext<PageRequest>, input: Props| async move {
    let user = req.services.fetch_user(req.session.as_deref()).await?;
    let Some(user) = user else {
      info!(path = %req.path, "No authenticated user, answering not found.");
      return Ok(StepOutcome::NotFound);
    };

    let mut props = input;
    props.insert("user", user)?;
    Ok::<_, DemoError>(StepOutcome::Props(props))
  })
}

pub fn with_subscription() -> impl Step<PageRequest, DemoError> {
  step_fn(|req: RequestContext<PageRequest>, input: Props| async move {
    let user = required_user(&input)?;
    let subscription = req.services.fetch_subscription(user.id).await?;

    let mut props = input;
    props.insert("subscription", subscription)?;
    Ok::<_, DemoError>(StepOutcome::Props(props))
  })
}

pub fn with_albums() -> impl Step<PageRequest, DemoError> {
  step_fn(|req: RequestContext<PageRequest>, input: Props| async move {
    let user = required_user(&input)?;
    let albums = req.services.fetch_albums(user.id).await?;

    let mut props = input;
    props.insert("albums", albums)?;
    Ok::<_, DemoError>(StepOutcome::Props(props))
  })
}

fn required_user(input: &Props) -> DemoResult<User> {
  input.get::<User>("user")?.ok_or(DemoError::MissingProp("user"))
}

/// Auth first, then subscription and albums side by side (two fetch delays).
pub fn index_pipe() -> Pipe<PageRequest, DemoError> {
  Pipe::new().step("with_auth", with_auth()).step(
    "page_data",
    Parallel::new()
      .branch("with_subscription", with_subscription())
      .branch("with_albums", with_albums()),
  )
}

/// Same data, one fetch after another (three fetch delays).
pub fn sequential_pipe() -> Pipe<PageRequest, DemoError> {
  Pipe::new()
    .step("with_auth", with_auth())
    .step("with_subscription", with_subscription())
    .step("with_albums", with_albums())
}

pub fn register_all_loaders(loaders: &Loaders<PageRequest, DemoError>) {
  loaders.register("/", index_pipe());
  loaders.register("/sequential", sequential_pipe());
}
