// ssrpipe/src/core/outcome.rs

//! Defines the three possible outcomes of a step and their JSON form as
//! understood by page-rendering hosts.

use crate::core::props::{json_kind, Props};
use crate::error::{SsrPipeError, SsrPipeResult};
use serde_json::{json, Map, Value};

/// Status codes a redirect may carry.
pub const REDIRECT_STATUSES: [u16; 5] = [301, 302, 303, 307, 308];

/// A terminal "send elsewhere" signal.
///
/// Either carries a permanence flag (answered with 308 / 307) or an explicit
/// redirect status, in which case permanence follows from the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
  destination: String,
  permanent: bool,
  status_code: Option<u16>,
}

impl Redirect {
  pub fn new(destination: impl Into<String>, permanent: bool) -> Self {
    Self {
      destination: destination.into(),
      permanent,
      status_code: None,
    }
  }

  /// Redirect with an explicit status. Only 301, 302, 303, 307 and 308 are accepted.
  pub fn with_status(destination: impl Into<String>, status_code: u16) -> SsrPipeResult<Self> {
    if !REDIRECT_STATUSES.contains(&status_code) {
      return Err(SsrPipeError::malformed(format!(
        "`redirect.statusCode` must be one of {:?}, got {}",
        REDIRECT_STATUSES, status_code
      )));
    }
    Ok(Self {
      destination: destination.into(),
      permanent: matches!(status_code, 301 | 308),
      status_code: Some(status_code),
    })
  }

  pub fn destination(&self) -> &str {
    &self.destination
  }

  pub fn into_destination(self) -> String {
    self.destination
  }

  pub fn is_permanent(&self) -> bool {
    self.permanent
  }

  /// The explicit status, if one was given.
  pub fn status_code(&self) -> Option<u16> {
    self.status_code
  }

  /// HTTP status a host should answer with.
  pub fn status(&self) -> u16 {
    match (self.status_code, self.permanent) {
      (Some(code), _) => code,
      (None, true) => 308,
      (None, false) => 307,
    }
  }
}

/// Outcome of a single step, and of a whole pipeline run.
///
/// `Props` is the only non-terminal shape: it carries data forward.
/// `NotFound` and `Redirect` stop a sequential pipeline immediately.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
  Props(Props),
  NotFound,
  Redirect(Redirect),
}

impl StepOutcome {
  pub fn not_found() -> Self {
    StepOutcome::NotFound
  }

  pub fn redirect(destination: impl Into<String>, permanent: bool) -> Self {
    StepOutcome::Redirect(Redirect::new(destination, permanent))
  }

  pub fn is_terminal(&self) -> bool {
    !matches!(self, StepOutcome::Props(_))
  }

  pub fn props(&self) -> Option<&Props> {
    match self {
      StepOutcome::Props(props) => Some(props),
      StepOutcome::NotFound | StepOutcome::Redirect(_) => None,
    }
  }

  pub fn into_props(self) -> Option<Props> {
    match self {
      StepOutcome::Props(props) => Some(props),
      StepOutcome::NotFound | StepOutcome::Redirect(_) => None,
    }
  }

  /// Short label used in logs.
  pub fn kind(&self) -> &'static str {
    match self {
      StepOutcome::Props(_) => "props",
      StepOutcome::NotFound => "not_found",
      StepOutcome::Redirect(_) => "redirect",
    }
  }

  /// Encodes the outcome as `{"props": {..}}`, `{"notFound": true}` or
  /// `{"redirect": {"destination": .., "permanent" | "statusCode": ..}}`.
  pub fn to_value(&self) -> Value {
    match self {
      StepOutcome::Props(props) => json!({ "props": props.clone().into_value() }),
      StepOutcome::NotFound => json!({ "notFound": true }),
      StepOutcome::Redirect(redirect) => {
        let mut body = Map::new();
        body.insert("destination".into(), Value::String(redirect.destination.clone()));
        match redirect.status_code {
          Some(code) => body.insert("statusCode".into(), Value::from(code)),
          None => body.insert("permanent".into(), Value::Bool(redirect.permanent)),
        };
        json!({ "redirect": Value::Object(body) })
      }
    }
  }

  /// Decodes an outcome from its JSON form.
  ///
  /// Anything that is not exactly one of the three shapes is rejected with
  /// `SsrPipeError::MalformedOutcome`.
  pub fn from_value(value: Value) -> SsrPipeResult<Self> {
    let mut object = match value {
      Value::Object(object) => object,
      other => {
        return Err(SsrPipeError::malformed(format!(
          "expected an object, got {}",
          json_kind(&other)
        )))
      }
    };

    if object.len() != 1 {
      let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
      keys.sort_unstable();
      return Err(SsrPipeError::malformed(format!(
        "expected exactly one of `props`, `notFound`, `redirect`; found keys {:?}",
        keys
      )));
    }

    if let Some(props) = object.remove("props") {
      return Props::try_from(props).map(StepOutcome::Props);
    }
    if let Some(flag) = object.remove("notFound") {
      return match flag {
        Value::Bool(true) => Ok(StepOutcome::NotFound),
        other => Err(SsrPipeError::malformed(format!("`notFound` must be true, got {}", other))),
      };
    }
    if let Some(redirect) = object.remove("redirect") {
      return decode_redirect(redirect).map(StepOutcome::Redirect);
    }

    let unknown = object.keys().next().cloned().unwrap_or_default();
    Err(SsrPipeError::malformed(format!("unknown outcome key `{}`", unknown)))
  }
}

impl From<Props> for StepOutcome {
  fn from(props: Props) -> Self {
    StepOutcome::Props(props)
  }
}

impl From<Redirect> for StepOutcome {
  fn from(redirect: Redirect) -> Self {
    StepOutcome::Redirect(redirect)
  }
}

fn decode_redirect(value: Value) -> SsrPipeResult<Redirect> {
  let body = match value {
    Value::Object(body) => body,
    other => {
      return Err(SsrPipeError::malformed(format!(
        "`redirect` must be an object, got {}",
        json_kind(&other)
      )))
    }
  };

  let destination = match body.get("destination") {
    Some(Value::String(dest)) => dest.clone(),
    _ => return Err(SsrPipeError::malformed("`redirect.destination` must be a string")),
  };

  match (body.get("permanent"), body.get("statusCode")) {
    (Some(Value::Bool(permanent)), None) => Ok(Redirect::new(destination, *permanent)),
    (None, Some(code)) => match code.as_u64().and_then(|code| u16::try_from(code).ok()) {
      Some(code) => Redirect::with_status(destination, code),
      None => Err(SsrPipeError::malformed(format!(
        "`redirect.statusCode` is not a valid status: {}",
        code
      ))),
    },
    (Some(_), Some(_)) => Err(SsrPipeError::malformed(
      "`redirect` cannot carry both `permanent` and `statusCode`",
    )),
    (Some(other), None) => Err(SsrPipeError::malformed(format!(
      "`redirect.permanent` must be a boolean, got {}",
      other
    ))),
    (None, None) => Err(SsrPipeError::malformed(
      "`redirect` needs either `permanent` or `statusCode`",
    )),
  }
}
