//! Demo users and reports loaded when `seed_demo_data` is enabled.
//!
//! Report times are relative to `now` so the feed always looks recent.

use chrono::{DateTime, Duration, Utc};
use findit_core::{
  item::{Item, Location, Region, Status},
  user::User,
};
use uuid::Uuid;

use crate::Result;

/// The three demo accounts. The first one is the default current user.
pub fn demo_users() -> Vec<User> {
  vec![
    User {
      id:         "u1".into(),
      username:   "JaneDoe".into(),
      avatar_url: "https://i.pravatar.cc/150?u=jane_doe".into(),
      email:      Some("jane.d@example.com".into()),
      phone:      Some("555-123-4567".into()),
    },
    User::new("u2", "JohnSmith", "https://i.pravatar.cc/150?u=john_smith"),
    User::new("u3", "AlexRay", "https://i.pravatar.cc/150?u=alex_ray"),
  ]
}

struct Fixture {
  name:        &'static str,
  description: &'static str,
  status:      Status,
  seed:        &'static str,
  place:       (f64, f64, &'static str),
  hours_ago:   i64,
  author:      usize,
  region:      Region,
}

const FIXTURES: &[Fixture] = &[
  Fixture {
    name:        "Set of keys on a red lanyard",
    description: "Looks like a set of house keys and a car key. The lanyard has a university logo on it.",
    status:      Status::Found,
    seed:        "keys",
    place:       (34.0522, -118.2437, "Downtown Los Angeles"),
    hours_ago:   2,
    author:      1,
    region:      Region::America,
  },
  Fixture {
    name:        "Black leather wallet",
    description: "A simple black wallet, feels like it has cards inside but I have not opened it.",
    status:      Status::Lost,
    seed:        "wallet",
    place:       (40.7128, -74.0060, "Central Park, NYC"),
    hours_ago:   24,
    author:      0,
    region:      Region::America,
  },
  Fixture {
    name:        "Blue Hydroflask water bottle",
    description: "Covered in various stickers, including a national park sticker and a cartoon cat.",
    status:      Status::Found,
    seed:        "bottle",
    place:       (41.8781, -87.6298, "Millennium Park, Chicago"),
    hours_ago:   5,
    author:      2,
    region:      Region::Local,
  },
  Fixture {
    name:        "Missing Person: John Appleseed",
    description: "Last seen near the city library on 5th Ave. Wearing a blue jacket and jeans. If you have any information, please contact local authorities.",
    status:      Status::Lost,
    seed:        "person",
    place:       (51.5072, -0.1276, "London, UK"),
    hours_ago:   72,
    author:      1,
    region:      Region::Europe,
  },
  Fixture {
    name:        "Diamond Engagement Ring",
    description: "Gold band with a single diamond. Lost somewhere in the shopping district.",
    status:      Status::Lost,
    seed:        "ring",
    place:       (35.6895, 139.6917, "Shibuya, Tokyo"),
    hours_ago:   8,
    author:      2,
    region:      Region::Asia,
  },
  Fixture {
    name:        "Sony A7IV Camera with lens",
    description: "Black camera body with a 24-70mm GM lens attached. Was in a black camera bag.",
    status:      Status::Lost,
    seed:        "camera",
    place:       (-33.8688, 151.2093, "Sydney, Australia"),
    hours_ago:   48,
    author:      0,
    region:      Region::Local,
  },
  Fixture {
    name:        "Found: iPhone 14 Pro",
    description: "Found an iPhone with a cracked screen protector. It is locked. Handing it to the main office.",
    status:      Status::Found,
    seed:        "iphone",
    place:       (1.3521, 103.8198, "Singapore"),
    hours_ago:   1,
    author:      1,
    region:      Region::Asia,
  },
];

/// The demo reports, authored by `users` (as returned by [`demo_users`]).
pub fn demo_items(users: &[User], now: DateTime<Utc>) -> Result<Vec<Item>> {
  FIXTURES
    .iter()
    .map(|f| {
      let (latitude, longitude, text) = f.place;
      let author = users
        .get(f.author)
        .cloned()
        .ok_or_else(|| crate::Error::MissingDemoUser(f.author))?;
      Ok(Item {
        item_id: Uuid::new_v4(),
        name: f.name.into(),
        description: f.description.into(),
        status: f.status,
        image_url: format!("https://picsum.photos/seed/{}/400/300", f.seed),
        location: Location::new(latitude, longitude, text)?,
        reported_at: now - Duration::hours(f.hours_ago),
        author,
        region: f.region,
      })
    })
    .collect()
}
