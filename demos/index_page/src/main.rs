// index_page/src/main.rs

mod config;
mod errors;
mod loaders;
mod models;
mod render;
mod services;

use crate::config::DemoConfig;
use crate::errors::{DemoError, Result as DemoResult};
use crate::models::PageRequest;
use crate::services::MockServices;
use ssrpipe::{Loaders, RequestContext};
use std::time::Instant;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing

#[tokio::main]
async fn main() -> DemoResult<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting index page demo...");

  let config = DemoConfig::from_env().map_err(|e| {
    tracing::error!(error = %e, "Failed to load demo configuration.");
    e
  })?;

  let loaders = Loaders::<PageRequest, DemoError>::new();
  loaders::register_all_loaders(&loaders);
  tracing::info!(routes = ?loaders.routes(), "Loader pipelines registered.");

  let ctx = RequestContext::new(PageRequest {
    path: config.route.clone(),
    session: config.session.clone(),
    services: MockServices::new(config.fetch_delay),
  });

  let started = Instant::now();
  let outcome = loaders.load(&config.route, ctx).await?;
  let elapsed = started.elapsed();

  tracing::info!(route = %config.route, outcome = outcome.kind(), ?elapsed, "Page data loaded.");

  let response = render::render("Index Page", outcome);
  tracing::info!(status = response.status(), "Page rendered.");
  println!("{}", response);
  Ok(())
}
