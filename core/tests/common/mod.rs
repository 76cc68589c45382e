// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use parking_lot::Mutex;
use serde_json::Value;
use ssrpipe::{step_fn, Props, RequestContext, SsrPipeError, Step, StepOutcome};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use std::time::Duration;
use tracing::Level;

// --- Common Context ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub request_id: u64,
  pub session: Option<String>,
}

// --- Common Error Type for Tests ---
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("ssrpipe framework error: {0}")]
  Framework(String), // Stored as String for Eq comparison

  #[error("Test step failed: {0}")]
  Step(String),
}

impl From<SsrPipeError> for TestError {
  fn from(err: SsrPipeError) -> Self {
    TestError::Framework(format!("{:?}", err))
  }
}

pub fn props(value: Value) -> Props {
  Props::try_from(value).expect("test props must be a JSON object")
}

pub fn ctx() -> RequestContext<TestContext> {
  RequestContext::new(TestContext {
    request_id: 7,
    session: Some("session-7".to_string()),
  })
}

// --- Call recording ---

/// Remembers which steps ran, in what order, and what input each one saw.
#[derive(Clone, Default)]
pub struct Recorder {
  calls: Arc<Mutex<Vec<(String, Props)>>>,
}

impl Recorder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn record(&self, name: &str, input: &Props) {
    self.calls.lock().push((name.to_string(), input.clone()));
  }

  pub fn names(&self) -> Vec<String> {
    self.calls.lock().iter().map(|(name, _)| name.clone()).collect()
  }

  pub fn input_of(&self, name: &str) -> Option<Props> {
    self
      .calls
      .lock()
      .iter()
      .find(|(n, _)| n == name)
      .map(|(_, input)| input.clone())
  }

  pub fn count(&self) -> usize {
    self.calls.lock().len()
  }
}

// --- Common Step Creators ---

/// A step that records its call, optionally sleeps, and returns `outcome`.
pub fn outcome_step(
  name: &'static str,
  recorder: &Recorder,
  delay_ms: u64,
  outcome: StepOutcome,
) -> impl Step<TestContext, TestError> {
  let recorder = recorder.clone();
  step_fn(move |_ctx: RequestContext<TestContext>, input: Props| {
    let recorder = recorder.clone();
    let outcome = outcome.clone();
    async move {
      recorder.record(name, &input);
      if delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
      }
      tracing::debug!(target: "test_steps", step = name, outcome = outcome.kind(), "step settled");
      Ok(outcome)
    }
  })
}

/// A step returning only its own props.
pub fn props_step(name: &'static str, recorder: &Recorder, value: Value) -> impl Step<TestContext, TestError> {
  outcome_step(name, recorder, 0, StepOutcome::Props(props(value)))
}

pub fn failing_step(
  name: &'static str,
  recorder: &Recorder,
  delay_ms: u64,
  message: &'static str,
) -> impl Step<TestContext, TestError> {
  let recorder = recorder.clone();
  step_fn(move |_ctx: RequestContext<TestContext>, input: Props| {
    let recorder = recorder.clone();
    async move {
      recorder.record(name, &input);
      if delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
      }
      tracing::warn!(target: "test_steps", step = name, "failing with: '{}'", message);
      Err(TestError::Step(message.to_string()))
    }
  })
}

/// Counts how many invocations are in flight at once and the peak reached.
#[derive(Clone, Default)]
pub struct InFlight {
  current: Arc<AtomicUsize>,
  peak: Arc<AtomicUsize>,
}

impl InFlight {
  pub fn peak(&self) -> usize {
    self.peak.load(Ordering::SeqCst)
  }

  pub fn step(&self, delay_ms: u64) -> impl Step<TestContext, TestError> {
    let tracker = self.clone();
    step_fn(move |_ctx: RequestContext<TestContext>, _input: Props| {
      let tracker = tracker.clone();
      async move {
        let now = tracker.current.fetch_add(1, Ordering::SeqCst) + 1;
        tracker.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        tracker.current.fetch_sub(1, Ordering::SeqCst);
        Ok(StepOutcome::Props(Props::new()))
      }
    })
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
