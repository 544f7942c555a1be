//! The `ItemStore` trait.
//!
//! The trait is implemented by storage backends ([`crate::memory::MemoryStore`],
//! `findit-store-sqlite`). Higher layers (`findit-api`, the report workflow)
//! depend on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  item::{Item, NewItem},
  user::User,
};

/// Abstraction over a FindIt item collection.
///
/// Items are append-only: [`ItemStore::append_item`] is the single write path,
/// and nothing is ever updated or deleted. Reads return snapshots that never
/// observe a half-finished append.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ItemStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. Returns an error if the id is already taken.
  fn add_user(
    &self,
    user: User,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  // ── Items (append-only) ────────────────────────────────────────────

  /// Append a new item and return the stored [`Item`].
  ///
  /// The store assigns a fresh `item_id` and sets `reported_at` to the current
  /// time, clamped so it is never earlier than the newest stored item. Fails
  /// if `input.author_id` is not a known user.
  fn append_item(
    &self,
    input: NewItem,
  ) -> impl Future<Output = Result<Item, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Retrieve a single item. Returns `None` if not found.
  fn get_item(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Item>, Self::Error>> + Send + '_;

  /// A snapshot of the whole collection, newest first. Items with equal
  /// `reported_at` are ordered by insertion, latest first.
  fn list_items(
    &self,
  ) -> impl Future<Output = Result<Vec<Item>, Self::Error>> + Send + '_;

  /// Number of items in the collection.
  fn count_items(
    &self,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
