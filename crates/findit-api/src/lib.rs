//! JSON REST API for FindIt.
//!
//! Exposes an axum [`Router`] backed by any [`findit_core::store::ItemStore`]
//! and [`findit_core::lookup::Captioner`]. Transport, tracing and TLS are the
//! caller's responsibility.
//!
//! Searching and region filtering are deliberately absent: clients fetch the
//! collection and run [`findit_core::feed::query`] themselves.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", findit_api::api_router(state))
//! ```

pub mod captions;
pub mod error;
pub mod items;
pub mod reports;
pub mod users;

use std::{sync::Arc, time::Duration};

use axum::{
  Router,
  routing::{get, post},
};
use findit_core::{
  lookup::Captioner, report::DEFAULT_LOOKUP_TIMEOUT, store::ItemStore, user::User,
};

pub use error::ApiError;

// ─── State ────────────────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S, C> {
  pub store:          Arc<S>,
  pub captioner:      Arc<C>,
  /// The identity every report is attributed to.
  pub current_user:   Arc<User>,
  pub lookup_timeout: Duration,
}

impl<S, C> ApiState<S, C> {
  pub fn new(store: Arc<S>, captioner: Arc<C>, current_user: User) -> Self {
    Self {
      store,
      captioner,
      current_user: Arc::new(current_user),
      lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
    }
  }

  pub fn with_lookup_timeout(mut self, limit: Duration) -> Self {
    self.lookup_timeout = limit;
    self
  }
}

impl<S, C> Clone for ApiState<S, C> {
  fn clone(&self) -> Self {
    Self {
      store:          Arc::clone(&self.store),
      captioner:      Arc::clone(&self.captioner),
      current_user:   Arc::clone(&self.current_user),
      lookup_timeout: self.lookup_timeout,
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, C>(state: ApiState<S, C>) -> Router<()>
where
  S: ItemStore + 'static,
  C: Captioner + 'static,
{
  Router::new()
    // Items
    .route("/items", get(items::list::<S, C>))
    .route("/items/{id}", get(items::get_one::<S, C>))
    .route("/reports", post(reports::create::<S, C>))
    // Captions
    .route("/captions", post(captions::suggest::<S, C>))
    // Users
    .route("/me", get(users::me::<S, C>))
    .route("/users/{id}", get(users::get_one::<S, C>))
    .route("/users/{id}/profile", get(users::profile::<S, C>))
    .with_state(state)
}
