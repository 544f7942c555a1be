//! [`MemoryStore`] — the in-memory reference implementation of [`ItemStore`].

use std::{
  collections::BTreeMap,
  sync::{Arc, PoisonError, RwLock},
};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  Error, Result,
  item::{Item, NewItem},
  store::ItemStore,
  user::User,
};

/// The collection plus the newest timestamp it holds, swapped as a unit.
#[derive(Default)]
struct Collection {
  /// Most recent append first.
  items:  Arc<Vec<Item>>,
  newest: Option<DateTime<Utc>>,
}

/// An item store held entirely in memory.
///
/// Readers clone an `Arc` to the current collection and release the lock
/// immediately; the single write path rebuilds the vector and swaps it in.
/// Cloning the store is cheap and shares state.
#[derive(Clone, Default)]
pub struct MemoryStore {
  users:      Arc<RwLock<BTreeMap<String, User>>>,
  collection: Arc<RwLock<Collection>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// The current collection without copying it.
  pub fn snapshot(&self) -> Arc<Vec<Item>> {
    let collection = self.collection.read().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(&collection.items)
  }

  /// Insert a fully-formed item, keeping its id and timestamp. Used to load
  /// fixtures; regular reports go through [`ItemStore::append_item`].
  pub fn import_item(&self, item: Item) -> Result<()> {
    let known = self
      .users
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .contains_key(&item.author.id);
    if !known {
      return Err(Error::UserNotFound(item.author.id));
    }
    let mut collection = self.collection.write().unwrap_or_else(PoisonError::into_inner);
    if collection.items.iter().any(|i| i.item_id == item.item_id) {
      return Err(Error::ItemExists(item.item_id));
    }
    let reported_at = item.reported_at;
    push_front(&mut collection, item);
    collection.newest = collection.newest.max(Some(reported_at));
    Ok(())
  }
}

fn push_front(collection: &mut Collection, item: Item) {
  let mut next = Vec::with_capacity(collection.items.len() + 1);
  next.push(item);
  next.extend(collection.items.iter().cloned());
  collection.items = Arc::new(next);
}

// ─── ItemStore impl ──────────────────────────────────────────────────────────

impl ItemStore for MemoryStore {
  type Error = Error;

  async fn add_user(&self, user: User) -> Result<User> {
    let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
    if users.contains_key(&user.id) {
      return Err(Error::UserExists(user.id));
    }
    users.insert(user.id.clone(), user.clone());
    Ok(user)
  }

  async fn get_user(&self, id: &str) -> Result<Option<User>> {
    let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
    Ok(users.get(id).cloned())
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
    Ok(users.values().cloned().collect())
  }

  async fn append_item(&self, input: NewItem) -> Result<Item> {
    let author = self
      .users
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .get(&input.author_id)
      .cloned()
      .ok_or_else(|| Error::UserNotFound(input.author_id.clone()))?;

    let mut collection = self.collection.write().unwrap_or_else(PoisonError::into_inner);
    let now = Utc::now();
    let reported_at = collection.newest.map_or(now, |newest| newest.max(now));
    let item = input.into_item(Uuid::new_v4(), reported_at, author);

    push_front(&mut collection, item.clone());
    collection.newest = Some(reported_at);
    Ok(item)
  }

  async fn get_item(&self, id: Uuid) -> Result<Option<Item>> {
    Ok(self.snapshot().iter().find(|item| item.item_id == id).cloned())
  }

  async fn list_items(&self) -> Result<Vec<Item>> {
    let mut items: Vec<Item> = self.snapshot().as_ref().clone();
    // Stable: equal timestamps keep most-recent-append-first order.
    items.sort_by(|a, b| b.reported_at.cmp(&a.reported_at));
    Ok(items)
  }

  async fn count_items(&self) -> Result<usize> { Ok(self.snapshot().len()) }
}

#[cfg(test)]
mod tests {
  use chrono::Duration;

  use super::*;
  use crate::item::{Location, Region, Status};

  fn new_item(name: &str, author_id: &str) -> NewItem {
    NewItem {
      name:        name.into(),
      description: String::new(),
      status:      Status::Lost,
      image_url:   "https://example.com/x.jpg".into(),
      location:    Location::new(40.7128, -74.006, "Central Park, NYC").unwrap(),
      region:      Region::America,
      author_id:   author_id.into(),
    }
  }

  async fn store_with_jane() -> MemoryStore {
    let store = MemoryStore::new();
    store
      .add_user(User::new("u1", "JaneDoe", "https://i.pravatar.cc/150?u=jane_doe"))
      .await
      .unwrap();
    store
  }

  #[tokio::test]
  async fn add_user_rejects_duplicates() {
    let store = store_with_jane().await;
    let again = store.add_user(User::new("u1", "Impostor", "x")).await;
    assert!(matches!(again, Err(Error::UserExists(id)) if id == "u1"));
    assert_eq!(store.get_user("u1").await.unwrap().unwrap().username, "JaneDoe");
    assert_eq!(store.list_users().await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn append_assigns_id_author_and_time() {
    let store = store_with_jane().await;
    let item = store.append_item(new_item("Wallet", "u1")).await.unwrap();
    assert_eq!(item.author.username, "JaneDoe");
    assert_eq!(store.get_item(item.item_id).await.unwrap(), Some(item.clone()));
    assert_eq!(store.count_items().await.unwrap(), 1);
  }

  #[tokio::test]
  async fn append_unknown_author_fails_without_mutation() {
    let store = store_with_jane().await;
    let result = store.append_item(new_item("Wallet", "ghost")).await;
    assert!(matches!(result, Err(Error::UserNotFound(_))));
    assert_eq!(store.count_items().await.unwrap(), 0);
  }

  #[tokio::test]
  async fn ids_are_unique_and_times_monotone() {
    let store = store_with_jane().await;
    let mut seen = std::collections::HashSet::new();
    let mut last = None;
    for i in 0..50 {
      let item = store.append_item(new_item(&format!("item {i}"), "u1")).await.unwrap();
      assert!(seen.insert(item.item_id));
      if let Some(prev) = last {
        assert!(item.reported_at >= prev);
      }
      last = Some(item.reported_at);
    }
  }

  #[tokio::test]
  async fn reported_at_never_precedes_imported_future_item() {
    let store = store_with_jane().await;
    let author = store.get_user("u1").await.unwrap().unwrap();
    let future = Utc::now() + Duration::hours(1);
    store
      .import_item(new_item("From the future", "u1").into_item(Uuid::new_v4(), future, author))
      .unwrap();
    let item = store.append_item(new_item("Now", "u1")).await.unwrap();
    assert!(item.reported_at >= future);
  }

  #[tokio::test]
  async fn list_is_newest_first_with_latest_append_winning_ties() {
    let store = store_with_jane().await;
    let author = store.get_user("u1").await.unwrap().unwrap();
    let t = Utc::now() - Duration::hours(5);
    for name in ["a", "b"] {
      store
        .import_item(new_item(name, "u1").into_item(Uuid::new_v4(), t, author.clone()))
        .unwrap();
    }
    let older = new_item("old", "u1").into_item(Uuid::new_v4(), t - Duration::hours(1), author);
    store.import_item(older).unwrap();
    let fresh = store.append_item(new_item("fresh", "u1")).await.unwrap();

    let names: Vec<String> =
      store.list_items().await.unwrap().into_iter().map(|i| i.name).collect();
    assert_eq!(names, [fresh.name.as_str(), "b", "a", "old"]);
  }

  #[tokio::test]
  async fn snapshot_is_unaffected_by_later_appends() {
    let store = store_with_jane().await;
    store.append_item(new_item("first", "u1")).await.unwrap();
    let before = store.snapshot();
    store.append_item(new_item("second", "u1")).await.unwrap();
    assert_eq!(before.len(), 1);
    assert_eq!(store.snapshot().len(), 2);
  }
}
