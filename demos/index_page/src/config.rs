// index_page/src/config.rs

use crate::errors::{DemoError, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DemoConfig {
  /// Route to load, e.g. `/` (parallel) or `/sequential`.
  pub route: String,
  /// Simulated latency of every upstream fetch.
  pub fetch_delay: Duration,
  /// Session token sent with the request. `None` means an anonymous visitor.
  pub session: Option<String>,
}

impl DemoConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let route = env::var("DEMO_ROUTE").unwrap_or_else(|_| "/".to_string());
    let fetch_delay_ms = match env::var("DEMO_FETCH_DELAY_MS") {
      Ok(raw) => raw
        .parse::<u64>()
        .map_err(|e| DemoError::Config(format!("Invalid DEMO_FETCH_DELAY_MS '{}': {}", raw, e)))?,
      Err(_) => 500,
    };
    let session = env::var("DEMO_SESSION").ok().filter(|s| !s.trim().is_empty());

    tracing::info!(%route, fetch_delay_ms, authenticated = session.is_some(), "Demo configuration loaded.");

    Ok(Self {
      route,
      fetch_delay: Duration::from_millis(fetch_delay_ms),
      session,
    })
  }
}
