// index_page/src/render.rs

//! Turns a loader outcome into what the page layer would answer with.

use serde_json::{json, Value};
use ssrpipe::StepOutcome;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum PageResponse {
  Page { status: u16, body: Value },
  NotFound { status: u16 },
  Redirect { status: u16, location: String },
}

impl PageResponse {
  pub fn status(&self) -> u16 {
    match self {
      PageResponse::Page { status, .. }
      | PageResponse::NotFound { status }
      | PageResponse::Redirect { status, .. } => *status,
    }
  }
}

pub fn render(title: &str, outcome: StepOutcome) -> PageResponse {
  match outcome {
    StepOutcome::Props(props) => PageResponse::Page {
      status: 200,
      body: json!({ "title": title, "props": props.into_value() }),
    },
    StepOutcome::NotFound => PageResponse::NotFound { status: 404 },
    StepOutcome::Redirect(redirect) => PageResponse::Redirect {
      status: redirect.status(),
      location: redirect.into_destination(),
    },
  }
}

impl fmt::Display for PageResponse {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PageResponse::Page { status, body } => {
        let pretty = serde_json::to_string_pretty(body).map_err(|_| fmt::Error)?;
        write!(f, "HTTP {}\n{}", status, pretty)
      }
      PageResponse::NotFound { status } => write!(f, "HTTP {} Not Found", status),
      PageResponse::Redirect { status, location } => write!(f, "HTTP {}\nLocation: {}", status, location),
    }
  }
}
