// index_page/src/models.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id: u64,
  pub username: String,
  pub age: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
  pub id: u64,
  pub user_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
  pub id: u64,
  pub user_id: u64,
  pub name: String,
}

/// What a page request carries into its loaders.
#[derive(Debug, Clone)]
pub struct PageRequest {
  pub path: String,
  pub session: Option<String>,
  pub services: crate::services::MockServices,
}
