// tests/parallel_tests.rs
mod common;

use common::*;
use serde_json::json;
use serial_test::serial;
use ssrpipe::{step_fn, Parallel, Pipe, Props, RequestContext, Step, StepOutcome};
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_parallel_merges_props_by_declaration_order_not_completion_order() {
  setup_tracing();
  let rec = Recorder::new();
  // The last declared branch settles first; it must still win the `a` collision.
  let group = Parallel::<TestContext, TestError>::new()
    .branch("a1", outcome_step("a1", &rec, 60, StepOutcome::Props(props(json!({ "a": 1 })))))
    .branch("b2", outcome_step("b2", &rec, 30, StepOutcome::Props(props(json!({ "b": 2 })))))
    .branch("a3", outcome_step("a3", &rec, 0, StepOutcome::Props(props(json!({ "a": 3 })))));

  let result = group.invoke(ctx(), Props::new()).await.unwrap();

  assert_eq!(result, StepOutcome::Props(props(json!({ "a": 3, "b": 2 }))));
  assert_eq!(rec.count(), 3);
}

#[tokio::test]
async fn test_not_found_beats_redirect_declared_before_it() {
  setup_tracing();
  let rec = Recorder::new();
  let group = Parallel::<TestContext, TestError>::new()
    .branch("props", props_step("props", &rec, json!({ "a": 1 })))
    .branch("redirect", outcome_step("redirect", &rec, 0, StepOutcome::redirect("/x", false)))
    .branch("missing", outcome_step("missing", &rec, 0, StepOutcome::NotFound));

  let result = group.invoke(ctx(), Props::new()).await.unwrap();

  assert_eq!(result, StepOutcome::NotFound);
}

#[tokio::test]
async fn test_redirect_wins_without_not_found() {
  setup_tracing();
  let rec = Recorder::new();
  let group = Parallel::<TestContext, TestError>::new()
    .branch("a", props_step("a", &rec, json!({ "a": 1 })))
    .branch("redirect", outcome_step("redirect", &rec, 0, StepOutcome::redirect("/x", false)))
    .branch("b", props_step("b", &rec, json!({ "b": 2 })));

  let result = group.invoke(ctx(), Props::new()).await.unwrap();

  assert_eq!(result, StepOutcome::redirect("/x", false));
}

#[tokio::test]
async fn test_empty_group_returns_empty_props_whatever_the_input() {
  setup_tracing();
  let group = Parallel::<TestContext, TestError>::new();
  assert!(group.is_empty());

  let result = group.invoke(ctx(), props(json!({ "user": 1 }))).await.unwrap();

  assert_eq!(result, StepOutcome::Props(Props::new()));
}

#[tokio::test]
async fn test_every_branch_sees_the_same_input() {
  setup_tracing();
  let rec = Recorder::new();
  let input = props(json!({ "user": { "id": 1 } }));
  let group = Parallel::<TestContext, TestError>::new()
    .branch("subscription", props_step("subscription", &rec, json!({ "subscription": 1 })))
    .branch("albums", props_step("albums", &rec, json!({ "albums": [] })));

  group.invoke(ctx(), input.clone()).await.unwrap();

  assert_eq!(rec.input_of("subscription").unwrap(), input);
  assert_eq!(rec.input_of("albums").unwrap(), input);
}

#[tokio::test]
async fn test_branch_failure_fails_the_group() {
  setup_tracing();
  let rec = Recorder::new();
  let group = Parallel::<TestContext, TestError>::new()
    .branch("ok", props_step("ok", &rec, json!({ "a": 1 })))
    .branch("boom", failing_step("boom", &rec, 10, "branch exploded"))
    .branch("redirect", outcome_step("redirect", &rec, 0, StepOutcome::redirect("/x", true)));

  let result = group.invoke(ctx(), Props::new()).await;

  assert_eq!(result, Err(TestError::Step("branch exploded".to_string())));
}

#[tokio::test]
async fn test_failure_inside_parallel_phase_fails_the_pipe() {
  setup_tracing();
  let rec = Recorder::new();
  let pipe = Pipe::<TestContext, TestError>::new()
    .step("auth", props_step("auth", &rec, json!({ "user": 1 })))
    .step(
      "data",
      Parallel::new()
        .branch("albums", props_step("albums", &rec, json!({ "albums": [] })))
        .branch("subscription", failing_step("subscription", &rec, 0, "billing down")),
    )
    .step("after", props_step("after", &rec, json!({ "after": true })));

  let result = pipe.run(ctx()).await;

  assert_eq!(result, Err(TestError::Step("billing down".to_string())));
  assert!(!rec.names().contains(&"after".to_string()));
}

#[tokio::test]
async fn test_single_branch_group_is_transparent() {
  setup_tracing();
  let rec = Recorder::new();
  let input = props(json!({ "seed": true }));
  let outcomes = vec![
    StepOutcome::Props(props(json!({ "a": 1 }))),
    StepOutcome::NotFound,
    StepOutcome::redirect("/elsewhere", true),
  ];

  for outcome in outcomes {
    let direct = outcome_step("direct", &rec, 0, outcome.clone());
    let wrapped = Parallel::<TestContext, TestError>::new().branch("wrapped", outcome_step("wrapped", &rec, 0, outcome));

    let direct_result = direct.invoke(ctx(), input.clone()).await.unwrap();
    let wrapped_result = wrapped.invoke(ctx(), input.clone()).await.unwrap();
    assert_eq!(direct_result, wrapped_result);
  }
}

#[tokio::test]
async fn test_terminal_branch_does_not_cancel_slower_siblings() {
  setup_tracing();
  let rec = Recorder::new();
  let slow_finished = Recorder::new();
  let slow_done = slow_finished.clone();
  let group = Parallel::<TestContext, TestError>::new()
    .branch("fast_missing", outcome_step("fast_missing", &rec, 0, StepOutcome::NotFound))
    .branch(
      "slow",
      step_fn(move |_ctx: RequestContext<TestContext>, input: Props| {
        let slow_done = slow_done.clone();
        async move {
          tokio::time::sleep(Duration::from_millis(50)).await;
          slow_done.record("slow", &input);
          Ok::<_, TestError>(StepOutcome::Props(Props::new()))
        }
      }),
    );

  let result = group.invoke(ctx(), Props::new()).await.unwrap();

  assert_eq!(result, StepOutcome::NotFound);
  assert_eq!(slow_finished.names(), vec!["slow"]);
}

#[tokio::test]
#[serial]
async fn test_branches_overlap_in_time() {
  setup_tracing();
  let tracker = InFlight::default();
  let group = Parallel::<TestContext, TestError>::new()
    .branch("one", tracker.step(150))
    .branch("two", tracker.step(150))
    .branch("three", tracker.step(150));

  let started = Instant::now();
  group.invoke(ctx(), Props::new()).await.unwrap();
  let elapsed = started.elapsed();

  assert_eq!(tracker.peak(), 3);
  assert!(elapsed >= Duration::from_millis(150));
  assert!(elapsed < Duration::from_millis(400), "parallel phase took {:?}", elapsed);
}

#[tokio::test]
#[serial]
async fn test_parallel_phase_is_faster_than_sequential() {
  setup_tracing();
  let rec = Recorder::new();
  let sequential = Pipe::<TestContext, TestError>::new()
    .step("auth", outcome_step("auth", &rec, 100, StepOutcome::Props(props(json!({ "user": 1 })))))
    .step("sub", outcome_step("sub", &rec, 100, StepOutcome::Props(props(json!({ "sub": 1 })))))
    .step("albums", outcome_step("albums", &rec, 100, StepOutcome::Props(props(json!({ "albums": 1 })))));
  let mixed = Pipe::<TestContext, TestError>::new()
    .step("auth", outcome_step("auth", &rec, 100, StepOutcome::Props(props(json!({ "user": 1 })))))
    .step(
      "data",
      Parallel::new()
        .branch("sub", outcome_step("sub", &rec, 100, StepOutcome::Props(props(json!({ "sub": 1 })))))
        .branch("albums", outcome_step("albums", &rec, 100, StepOutcome::Props(props(json!({ "albums": 1 }))))),
    );

  let started = Instant::now();
  let seq_result = sequential.run(ctx()).await.unwrap();
  let seq_elapsed = started.elapsed();

  let started = Instant::now();
  let mixed_result = mixed.run(ctx()).await.unwrap();
  let mixed_elapsed = started.elapsed();

  assert_eq!(seq_result, mixed_result);
  assert!(seq_elapsed >= Duration::from_millis(300));
  assert!(mixed_elapsed >= Duration::from_millis(200));
  assert!(mixed_elapsed < seq_elapsed, "mixed {:?} vs sequential {:?}", mixed_elapsed, seq_elapsed);
}

#[tokio::test]
async fn test_groups_nest_recursively() {
  setup_tracing();
  let rec = Recorder::new();
  let inner = Parallel::<TestContext, TestError>::new()
    .branch("x", props_step("x", &rec, json!({ "x": 1, "k": "inner" })))
    .branch("y", props_step("y", &rec, json!({ "y": 2 })));
  let outer = Parallel::<TestContext, TestError>::new()
    .branch("w", props_step("w", &rec, json!({ "w": 0, "k": "outer-first" })))
    .branch("inner", inner)
    .branch(
      "seq",
      Pipe::new()
        .step("s1", props_step("s1", &rec, json!({ "s1": true })))
        .step("s2", props_step("s2", &rec, json!({ "s2": true }))),
    );

  let result = outer.invoke(ctx(), Props::new()).await.unwrap();

  assert_eq!(
    result,
    StepOutcome::Props(props(json!({ "w": 0, "x": 1, "y": 2, "k": "inner", "s1": true, "s2": true })))
  );
  assert_eq!(rec.count(), 5);
}

#[tokio::test]
async fn test_not_found_inside_nested_group_propagates_to_pipe() {
  setup_tracing();
  let rec = Recorder::new();
  let pipe = Pipe::<TestContext, TestError>::new()
    .step("auth", props_step("auth", &rec, json!({ "user": 1 })))
    .step(
      "data",
      Parallel::new()
        .branch("albums", props_step("albums", &rec, json!({ "albums": [] })))
        .branch(
          "nested",
          Parallel::new()
            .branch("redirect", outcome_step("redirect", &rec, 0, StepOutcome::redirect("/r", false)))
            .branch("missing", outcome_step("missing", &rec, 0, StepOutcome::NotFound)),
        ),
    )
    .step("render_hint", props_step("render_hint", &rec, json!({ "hint": true })));

  let result = pipe.run(ctx()).await.unwrap();

  assert_eq!(result, StepOutcome::NotFound);
  assert!(!rec.names().contains(&"render_hint".to_string()));
}
