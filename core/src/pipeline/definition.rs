// ssrpipe/src/pipeline/definition.rs

//! Contains the `Pipe<C, E>` sequencer definition and its builder methods.

use crate::core::step::{SharedStep, Step};
use crate::error::SsrPipeError;
use std::sync::Arc;

/// A named step inside a pipe or a parallel group. Names only serve tracing.
pub(crate) struct NamedStep<C, E>
where
  C: Send + Sync + 'static,
  E: Send + 'static,
{
  pub(crate) name: String,
  pub(crate) step: SharedStep<C, E>,
}

impl<C, E> Clone for NamedStep<C, E>
where
  C: Send + Sync + 'static,
  E: Send + 'static,
{
  fn clone(&self) -> Self {
    Self {
      name: self.name.clone(),
      step: Arc::clone(&self.step),
    }
  }
}

/// The sequencer: runs its steps one after another, threading the
/// accumulated `Props` into each, and stops on the first terminal outcome.
///
/// `C` is the request context type, `E` the error type steps return.
/// `E` must be `From<SsrPipeError>` so framework errors (e.g. an unknown
/// route in the registry) can be reported through the same channel.
pub struct Pipe<C, E>
where
  C: Send + Sync + 'static,
  E: std::error::Error + From<SsrPipeError> + Send + Sync + 'static,
{
  pub(crate) steps: Vec<NamedStep<C, E>>,
}

impl<C, E> Pipe<C, E>
where
  C: Send + Sync + 'static,
  E: std::error::Error + From<SsrPipeError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self { steps: Vec::new() }
  }

  /// Appends a step. Steps run in the order they were added.
  pub fn step(mut self, name: impl Into<String>, step: impl Step<C, E> + 'static) -> Self {
    self.push_step(name, step);
    self
  }

  /// Appends an already shared step.
  pub fn shared_step(mut self, name: impl Into<String>, step: SharedStep<C, E>) -> Self {
    self.steps.push(NamedStep { name: name.into(), step });
    self
  }

  pub fn push_step(&mut self, name: impl Into<String>, step: impl Step<C, E> + 'static) {
    self.steps.push(NamedStep {
      name: name.into(),
      step: Arc::new(step),
    });
  }

  pub fn len(&self) -> usize {
    self.steps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }

  /// Step names in execution order.
  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }
}

impl<C, E> Default for Pipe<C, E>
where
  C: Send + Sync + 'static,
  E: std::error::Error + From<SsrPipeError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<C, E> Clone for Pipe<C, E>
where
  C: Send + Sync + 'static,
  E: std::error::Error + From<SsrPipeError> + Send + Sync + 'static,
{
  fn clone(&self) -> Self {
    Self {
      steps: self.steps.clone(),
    }
  }
}
