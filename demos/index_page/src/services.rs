// index_page/src/services.rs

//! Stand-ins for the upstream services the page loaders talk to.

use crate::errors::{DemoError, Result};
use crate::models::{Album, Subscription, User};
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct MockServices {
  pub fetch_delay: Duration,
}

impl MockServices {
  pub fn new(fetch_delay: Duration) -> Self {
    Self { fetch_delay }
  }

  async fn simulate_latency(&self) {
    if !self.fetch_delay.is_zero() {
      tokio::time::sleep(self.fetch_delay).await;
    }
  }

  /// Resolves the user behind a session. Anonymous requests have no user;
  /// tokens the auth service cannot parse are a fetch error.
  #[instrument(skip(self, session), fields(has_session = session.is_some()))]
  pub async fn fetch_user(&self, session: Option<&str>) -> Result<Option<User>> {
    self.simulate_latency().await;
    if let Some(token) = session {
      if token.chars().any(char::is_whitespace) {
        return Err(DemoError::Fetch(format!("auth service rejected session token '{}'", token)));
      }
    }
    let user = session.map(|_| User {
      id: 1,
      username: "myUser".to_string(),
      age: 18,
    });
    debug!(found = user.is_some(), "User lookup finished.");
    Ok(user)
  }

  #[instrument(skip(self))]
  pub async fn fetch_subscription(&self, user_id: u64) -> Result<Subscription> {
    self.simulate_latency().await;
    Ok(Subscription { id: 1, user_id })
  }

  #[instrument(skip(self))]
  pub async fn fetch_albums(&self, user_id: u64) -> Result<Vec<Album>> {
    self.simulate_latency().await;
    Ok(vec![
      Album {
        id: 1,
        name: "Album 1".to_string(),
        user_id,
      },
      Album {
        id: 2,
        name: "Album 2".to_string(),
        user_id,
      },
    ])
  }
}
