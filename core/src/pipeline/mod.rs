// ssrpipe/src/pipeline/mod.rs

//! The two composition operators: the `Pipe<C, E>` sequencer and the
//! `Parallel<C, E>` combinator.

pub mod definition;
pub mod execution;
pub mod parallel;

pub use definition::Pipe;
pub use parallel::Parallel;
