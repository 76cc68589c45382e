// index_page/src/errors.rs

use ssrpipe::SsrPipeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemoError {
  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Upstream fetch failed: {0}")]
  Fetch(String),

  // A loader ran before the loader that provides the prop it needs.
  #[error("Missing prop '{0}' in loader input")]
  MissingProp(&'static str),

  #[error("Loader pipeline error: {source}")]
  Pipeline {
    #[from]
    source: SsrPipeError,
  },
}

pub type Result<T, E = DemoError> = std::result::Result<T, E>;
