//! FindIt server: configuration, store preparation and the HTTP router.
//!
//! The binary in `main.rs` reads [`ServerConfig`], opens either the in-memory
//! or the SQLite store, runs [`prepare`] and serves [`router`].

pub mod error;
pub mod seed;

pub use error::{Error, Result};

use std::{future::Future, path::PathBuf, time::Duration};

use axum::Router;
use chrono::Utc;
use findit_api::{ApiState, api_router};
use findit_core::{
  item::Item, lookup::Captioner, memory::MemoryStore, report::DEFAULT_LOOKUP_TIMEOUT,
  store::ItemStore, user::User,
};
use findit_gemini::GeminiConfig;
use findit_store_sqlite::SqliteStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `FINDIT_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  /// SQLite file. When absent, state lives in memory for the process lifetime.
  #[serde(default)]
  pub store_path:          Option<PathBuf>,
  #[serde(default = "default_lookup_timeout_secs")]
  pub lookup_timeout_secs: u64,
  #[serde(default)]
  pub seed_demo_data:      bool,
  /// The identity every report is attributed to.
  #[serde(default = "default_current_user")]
  pub current_user:        User,
  #[serde(default)]
  pub gemini:              GeminiConfig,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8080 }

fn default_lookup_timeout_secs() -> u64 { DEFAULT_LOOKUP_TIMEOUT.as_secs() }

fn default_current_user() -> User {
  seed::demo_users().swap_remove(0)
}

impl ServerConfig {
  pub fn lookup_timeout(&self) -> Duration { Duration::from_secs(self.lookup_timeout_secs) }
}

// ─── Store preparation ────────────────────────────────────────────────────────

/// A store that can take fully-formed fixture items.
pub trait FixtureStore: ItemStore {
  fn import_fixture(&self, item: Item) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

impl FixtureStore for MemoryStore {
  async fn import_fixture(&self, item: Item) -> findit_core::Result<()> { self.import_item(item) }
}

impl FixtureStore for SqliteStore {
  async fn import_fixture(&self, item: Item) -> findit_store_sqlite::Result<()> {
    self.import_item(item).await
  }
}

async fn ensure_user<S: ItemStore>(store: &S, user: &User) -> Result<bool> {
  if store.get_user(&user.id).await.map_err(Error::store)?.is_some() {
    return Ok(false);
  }
  store.add_user(user.clone()).await.map_err(Error::store)?;
  Ok(true)
}

/// Make the store ready to serve: load demo data if configured and make sure
/// the current user exists. Safe to run against an already-prepared store.
pub async fn prepare<S: FixtureStore>(store: &S, config: &ServerConfig) -> Result<()> {
  if config.seed_demo_data {
    let users = seed::demo_users();
    for user in &users {
      ensure_user(store, user).await?;
    }
    if store.count_items().await.map_err(Error::store)? == 0 {
      let items = seed::demo_items(&users, Utc::now())?;
      let count = items.len();
      for item in items {
        store.import_fixture(item).await.map_err(Error::store)?;
      }
      tracing::info!(count, "loaded demo reports");
    } else {
      tracing::info!("store already holds reports; skipping demo data");
    }
  }

  if ensure_user(store, &config.current_user).await? {
    tracing::info!(user_id = %config.current_user.id, "registered current user");
  }
  Ok(())
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: the JSON API under `/api`, with request tracing.
pub fn router<S, C>(state: ApiState<S, C>) -> Router
where
  S: ItemStore + 'static,
  C: Captioner + 'static,
{
  Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}
