pub mod context;
pub mod outcome;
pub mod props;
pub mod step;

// Re-export key types for easier access from other modules (and lib.rs)
pub use context::RequestContext;
pub use outcome::{Redirect, StepOutcome};
pub use props::Props;
pub use step::{step_fn, sync_step, FnStep, SharedStep, Step, SyncStep};
