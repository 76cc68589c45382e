// ssrpipe/src/lib.rs

//! ssrpipe: composable request-time data loaders.
//!
//! A page's data is loaded by a chain of small, independent steps. Each step
//! receives the read-only request context and the `Props` accumulated so far,
//! and answers with one of three outcomes:
//!  - `Props`: data to merge into the accumulator, carry on;
//!  - `NotFound`: the resource is absent, stop;
//!  - `Redirect`: send the client elsewhere, stop.
//!
//! Steps are composed with two operators:
//!  - [`Pipe`] runs steps one after another and stops at the first terminal outcome.
//!  - [`Parallel`] is itself a step: it runs a fixed group of steps concurrently
//!    against the same input and folds their outcomes into one.
//!
//! Because `Parallel` (and `Pipe`) implement [`Step`], sequential and parallel
//! phases nest freely.

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

// --- Re-exports for the Public API ---

pub use crate::core::context::RequestContext;
pub use crate::core::outcome::{Redirect, StepOutcome};
pub use crate::core::props::Props;
pub use crate::core::step::{step_fn, sync_step, SharedStep, Step};

pub use crate::pipeline::{Parallel, Pipe};

pub use crate::error::{SsrPipeError, SsrPipeResult};

// Route-keyed registry of loader pipelines
pub use crate::registry::Loaders;

/*
    Typical usage:
    1. Define a request context type `Req` (headers, cookies, params...).
    2. Write steps with `step_fn(|ctx, input| async move { ... })`, or implement `Step`.
    3. Compose: `Pipe::new().step("auth", auth).step("data", Parallel::new().branch(..).branch(..))`.
    4. Optionally register the pipe per route in `Loaders` and call `loaders.load(route, ctx)`.
    5. Render on `Props`, answer 404 on `NotFound`, redirect on `Redirect`.
*/
