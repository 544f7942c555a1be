//! Profile view: the subset of the collection authored by one user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  feed::sort_newest_first,
  item::Item,
  user::User,
};

/// Items whose author is `user_id`, newest first. Stable on equal timestamps.
pub fn items_by<'a>(user_id: &str, items: &'a [Item]) -> Vec<&'a Item> {
  let mut own: Vec<&Item> = items.iter().filter(|item| item.author.id == user_id).collect();
  sort_newest_first(&mut own);
  own
}

/// The read model for a profile page. Derived on demand, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileView {
  pub user:    User,
  /// The point in time at which this view was materialised.
  pub as_of:   DateTime<Utc>,
  /// Reports authored by `user`, newest first.
  pub reports: Vec<Item>,
}

impl ProfileView {
  pub fn derive(user: User, items: &[Item]) -> Self {
    let reports = items_by(&user.id, items).into_iter().cloned().collect();
    Self { user, as_of: Utc::now(), reports }
  }

  pub fn is_empty(&self) -> bool { self.reports.is_empty() }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, Utc};
  use uuid::Uuid;

  use super::*;
  use crate::item::{Location, Region, Status};

  fn user(id: &str) -> User { User::new(id, id.to_uppercase(), "https://example.com/a.png") }

  fn item(author: &User, hours_ago: i64) -> Item {
    Item {
      item_id:     Uuid::new_v4(),
      name:        format!("item by {}", author.id),
      description: String::new(),
      status:      Status::Found,
      image_url:   "https://example.com/i.jpg".into(),
      location:    Location::new(1.35, 103.82, "Singapore").unwrap(),
      reported_at: Utc::now() - Duration::hours(hours_ago),
      author:      author.clone(),
      region:      Region::Asia,
    }
  }

  #[test]
  fn returns_only_the_users_items() {
    let (jane, john) = (user("u1"), user("u2"));
    let items = vec![item(&john, 1), item(&jane, 24), item(&john, 3), item(&jane, 48)];

    for who in [&jane, &john] {
      let own = items_by(&who.id, &items);
      assert!(own.iter().all(|i| i.author.id == who.id));
      let expected = items.iter().filter(|i| i.author.id == who.id).count();
      assert_eq!(own.len(), expected);
    }
  }

  #[test]
  fn orders_newest_first() {
    let jane = user("u1");
    let items = vec![item(&jane, 48), item(&jane, 2), item(&jane, 24)];
    let own = items_by("u1", &items);
    assert!(own.windows(2).all(|w| w[0].reported_at >= w[1].reported_at));
  }

  #[test]
  fn unknown_user_yields_empty_view() {
    let items = vec![item(&user("u2"), 1)];
    let view = ProfileView::derive(user("u3"), &items);
    assert!(view.is_empty());
    assert_eq!(view.user.id, "u3");
  }
}
