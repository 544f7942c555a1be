//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, TimeZone, Utc};
use findit_core::{
  feed::{RegionFilter, query},
  item::{Location, NewItem, Region, Status},
  profile::items_by,
  report::ReportForm,
  store::ItemStore,
  user::User,
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn jane() -> User {
  User {
    id:         "u1".into(),
    username:   "JaneDoe".into(),
    avatar_url: "https://i.pravatar.cc/150?u=jane_doe".into(),
    email:      Some("jane.d@example.com".into()),
    phone:      Some("555-123-4567".into()),
  }
}

fn john() -> User { User::new("u2", "JohnSmith", "https://i.pravatar.cc/150?u=john_smith") }

async fn store_with_users() -> SqliteStore {
  let s = store().await;
  s.add_user(jane()).await.unwrap();
  s.add_user(john()).await.unwrap();
  s
}

fn new_item(name: &str, region: Region, author_id: &str) -> NewItem {
  NewItem {
    name:        name.into(),
    description: "Covered in various stickers".into(),
    status:      Status::Found,
    image_url:   "https://picsum.photos/seed/bottle/400/300".into(),
    location:    Location::new(41.8781, -87.6298, "Millennium Park, Chicago").unwrap(),
    region,
    author_id:   author_id.into(),
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_user() {
  let s = store().await;
  s.add_user(jane()).await.unwrap();

  let fetched = s.get_user("u1").await.unwrap();
  assert_eq!(fetched, Some(jane()));
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_user_is_rejected() {
  let s = store_with_users().await;
  let result = s.add_user(User::new("u1", "Other", "x")).await;
  assert!(matches!(result, Err(Error::UserExists(id)) if id == "u1"));
  assert_eq!(s.list_users().await.unwrap().len(), 2);
}

// ─── Items ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn append_and_get_item() {
  let s = store_with_users().await;
  let item = s.append_item(new_item("Blue Hydroflask", Region::Local, "u2")).await.unwrap();
  assert_eq!(item.author, john());

  let fetched = s.get_item(item.item_id).await.unwrap().unwrap();
  assert_eq!(fetched.item_id, item.item_id);
  assert_eq!(fetched.name, "Blue Hydroflask");
  assert_eq!(fetched.location.text(), "Millennium Park, Chicago");
  assert_eq!(fetched.reported_at, item.reported_at);
  assert_eq!(fetched.status, Status::Found);
}

#[tokio::test]
async fn get_item_missing_returns_none() {
  let s = store().await;
  assert!(s.get_item(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn append_with_unknown_author_fails_without_insert() {
  let s = store_with_users().await;
  let result = s.append_item(new_item("Ring", Region::Asia, "ghost")).await;
  assert!(matches!(result, Err(Error::UserNotFound(_))));
  assert_eq!(s.count_items().await.unwrap(), 0);
}

#[tokio::test]
async fn appended_ids_unique_and_times_monotone() {
  let s = store_with_users().await;
  let mut prev: Option<findit_core::item::Item> = None;
  for i in 0..20 {
    let item = s.append_item(new_item(&format!("item {i}"), Region::Local, "u1")).await.unwrap();
    if let Some(p) = &prev {
      assert_ne!(p.item_id, item.item_id);
      assert!(item.reported_at >= p.reported_at);
    }
    prev = Some(item);
  }
  assert_eq!(s.count_items().await.unwrap(), 20);
}

#[tokio::test]
async fn append_is_clamped_after_future_import() {
  let s = store_with_users().await;
  let future = Utc::now() + Duration::minutes(30);
  let fixture = new_item("Camera", Region::Local, "u1").into_item(Uuid::new_v4(), future, jane());
  s.import_item(fixture).await.unwrap();

  let item = s.append_item(new_item("Keys", Region::America, "u1")).await.unwrap();
  assert!(item.reported_at >= future);
}

#[tokio::test]
async fn imported_timestamp_reads_back_exactly() {
  let s = store_with_users().await;
  let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap() + Duration::nanoseconds(123_456_789);
  let fixture = new_item("Scarf", Region::Europe, "u1").into_item(Uuid::new_v4(), at, jane());
  s.import_item(fixture.clone()).await.unwrap();

  let stored = s.get_item(fixture.item_id).await.unwrap().unwrap();
  assert_eq!(stored.reported_at, at);

  let next = s.append_item(new_item("Gloves", Region::Europe, "u1")).await.unwrap();
  assert!(next.reported_at >= at);
}

#[tokio::test]
async fn import_rejects_duplicate_ids() {
  let s = store_with_users().await;
  let fixture =
    new_item("Wallet", Region::America, "u1").into_item(Uuid::new_v4(), Utc::now(), jane());
  s.import_item(fixture.clone()).await.unwrap();
  assert!(matches!(s.import_item(fixture).await, Err(Error::ItemExists(_))));
}

#[tokio::test]
async fn list_items_newest_first_then_latest_insert() {
  let s = store_with_users().await;
  let t = Utc::now() - Duration::hours(3);
  for name in ["tie-a", "tie-b"] {
    let fixture = new_item(name, Region::Asia, "u2").into_item(Uuid::new_v4(), t, john());
    s.import_item(fixture).await.unwrap();
  }
  let old =
    new_item("old", Region::Asia, "u2").into_item(Uuid::new_v4(), t - Duration::days(1), john());
  s.import_item(old).await.unwrap();
  let fresh = s.append_item(new_item("fresh", Region::Asia, "u1")).await.unwrap();

  let names: Vec<String> = s.list_items().await.unwrap().into_iter().map(|i| i.name).collect();
  assert_eq!(names, [fresh.name.as_str(), "tie-b", "tie-a", "old"]);
}

// ─── Workflow over SQLite ────────────────────────────────────────────────────

#[tokio::test]
async fn report_form_submits_into_sqlite() {
  let s = store_with_users().await;
  let mut form = ReportForm::new();
  form.name = "Diamond Engagement Ring".into();
  form.region = Region::Asia;
  form.select_image("https://picsum.photos/seed/ring/400/300", None);
  form.set_location(Location::new(35.6895, 139.6917, "Shibuya, Tokyo").unwrap());

  let item = form.submit(&s, &jane()).await.unwrap();
  assert_eq!(item.author.id, "u1");

  let items = s.list_items().await.unwrap();
  assert_eq!(query(&items, "diamond", RegionFilter::Only(Region::Asia)).len(), 1);
  assert_eq!(items_by("u1", &items).len(), 1);
  assert!(items_by("u2", &items).is_empty());
}
