// ssrpipe/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SsrPipeError {
  /// A step result did not match any of the three recognised shapes.
  #[error("Malformed step outcome: {reason}")]
  MalformedOutcome { reason: String },

  #[error("Failed to encode prop '{key}'. Source: {source}")]
  PropsEncode {
    key: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("Failed to decode prop '{key}'. Source: {source}")]
  PropsDecode {
    key: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("No loader pipeline registered for route '{route}'")]
  RouteNotFound { route: String },

  #[error("Error in user-provided step or external operation. Source: {source}")]
  HandlerError {
    #[source]
    source: AnyhowError,
  },
}

impl SsrPipeError {
  pub(crate) fn malformed(reason: impl Into<String>) -> Self {
    SsrPipeError::MalformedOutcome { reason: reason.into() }
  }
}

// Steps written against anyhow can bubble their errors up with `?`.
impl From<AnyhowError> for SsrPipeError {
  fn from(err: AnyhowError) -> Self {
    SsrPipeError::HandlerError { source: err }
  }
}

pub type SsrPipeResult<T, E = SsrPipeError> = std::result::Result<T, E>;
