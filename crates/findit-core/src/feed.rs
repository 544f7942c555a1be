//! The feed query — search and region filtering over a collection snapshot.
//!
//! Everything here is a pure function of its inputs, cheap enough to re-run on
//! every keystroke.

use std::{cmp::Reverse, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  item::{Item, Region},
};

// ─── Region filter ───────────────────────────────────────────────────────────

/// Either every region, or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RegionFilter {
  #[default]
  All,
  Only(Region),
}

impl RegionFilter {
  pub fn admits(self, region: Region) -> bool {
    match self {
      Self::All => true,
      Self::Only(wanted) => wanted == region,
    }
  }
}

impl From<Region> for RegionFilter {
  fn from(region: Region) -> Self { Self::Only(region) }
}

impl FromStr for RegionFilter {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    if s.trim().eq_ignore_ascii_case("all") {
      Ok(Self::All)
    } else {
      s.parse().map(Self::Only)
    }
  }
}

impl TryFrom<String> for RegionFilter {
  type Error = Error;

  fn try_from(s: String) -> Result<Self> { s.parse() }
}

impl From<RegionFilter> for String {
  fn from(filter: RegionFilter) -> Self { filter.to_string() }
}

impl fmt::Display for RegionFilter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::All => f.write_str("All"),
      Self::Only(region) => fmt::Display::fmt(region, f),
    }
  }
}

// ─── Query ───────────────────────────────────────────────────────────────────

/// Parameters for [`FeedQuery::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedQuery {
  /// Case-insensitive substring matched against name and description.
  /// Empty matches everything.
  #[serde(default)]
  pub search: String,
  #[serde(default)]
  pub region: RegionFilter,
}

impl FeedQuery {
  pub fn new(search: impl Into<String>, region: RegionFilter) -> Self {
    Self { search: search.into(), region }
  }

  /// Whether `item` passes both filters.
  pub fn matches(&self, item: &Item) -> bool {
    self.region.admits(item.region) && matches_text(item, &self.search.to_lowercase())
  }

  /// Filter `items` and order the survivors newest first.
  ///
  /// The sort is stable: items with equal `reported_at` keep their input
  /// order.
  pub fn run<'a>(&self, items: &'a [Item]) -> Vec<&'a Item> {
    let needle = self.search.to_lowercase();
    let mut hits: Vec<&Item> = items
      .iter()
      .filter(|item| self.region.admits(item.region) && matches_text(item, &needle))
      .collect();
    sort_newest_first(&mut hits);
    hits
  }
}

/// Shorthand for `FeedQuery::new(search, region).run(items)`.
pub fn query<'a>(items: &'a [Item], search: &str, region: RegionFilter) -> Vec<&'a Item> {
  FeedQuery::new(search, region).run(items)
}

/// Stable sort by `reported_at`, descending.
pub fn sort_newest_first(items: &mut [&Item]) {
  items.sort_by_key(|item| Reverse(item.reported_at));
}

/// `needle` must already be lowercased.
fn matches_text(item: &Item, needle: &str) -> bool {
  needle.is_empty()
    || item.name.to_lowercase().contains(needle)
    || item.description.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone, Utc};
  use uuid::Uuid;

  use super::*;
  use crate::{
    item::{Location, Status},
    user::User,
  };

  fn item(name: &str, description: &str, region: Region, hours_ago: i64) -> Item {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    Item {
      item_id:     Uuid::new_v4(),
      name:        name.into(),
      description: description.into(),
      status:      Status::Lost,
      image_url:   "https://example.com/a.jpg".into(),
      location:    Location::new(0.0, 0.0, "Somewhere").unwrap(),
      reported_at: now - Duration::hours(hours_ago),
      author:      User::new("u1", "JaneDoe", "https://example.com/jane.png"),
      region,
    }
  }

  fn names(items: &[&Item]) -> Vec<String> {
    items.iter().map(|i| i.name.clone()).collect()
  }

  #[test]
  fn worked_examples() {
    let a = item("Diamond Ring", "", Region::Asia, 1);
    let b = item("Blue Hydroflask", "", Region::Local, 2);
    let items = vec![a, b];

    assert_eq!(names(&query(&items, "blue", RegionFilter::All)), ["Blue Hydroflask"]);
    assert_eq!(
      names(&query(&items, "", RegionFilter::Only(Region::Asia))),
      ["Diamond Ring"]
    );
    assert!(query(&items, "zzz", RegionFilter::All).is_empty());
  }

  #[test]
  fn search_matches_description_case_insensitively() {
    let items = vec![
      item("Water bottle", "Covered in STICKERS", Region::Local, 1),
      item("Wallet", "black leather", Region::Local, 2),
    ];
    assert_eq!(names(&query(&items, "sticker", RegionFilter::All)), ["Water bottle"]);
    assert_eq!(names(&query(&items, "LEATHER", RegionFilter::All)), ["Wallet"]);
  }

  #[test]
  fn filters_are_conjunctive() {
    let items = vec![
      item("Blue jacket", "", Region::Europe, 1),
      item("Blue scarf", "", Region::Asia, 2),
    ];
    let hits = query(&items, "blue", Region::Europe.into());
    assert_eq!(names(&hits), ["Blue jacket"]);
  }

  #[test]
  fn results_are_newest_first() {
    let items = vec![
      item("old", "", Region::Local, 72),
      item("newest", "", Region::Local, 1),
      item("middle", "", Region::Local, 5),
    ];
    let hits = query(&items, "", RegionFilter::All);
    assert_eq!(names(&hits), ["newest", "middle", "old"]);
    assert!(hits.windows(2).all(|w| w[0].reported_at >= w[1].reported_at));
  }

  #[test]
  fn equal_timestamps_keep_input_order() {
    let items = vec![
      item("first", "", Region::Local, 3),
      item("second", "", Region::Local, 3),
      item("third", "", Region::Local, 3),
    ];
    assert_eq!(
      names(&query(&items, "", RegionFilter::All)),
      ["first", "second", "third"]
    );
  }

  #[test]
  fn never_leaks_other_regions_or_non_matches() {
    let items: Vec<Item> = Region::all()
      .enumerate()
      .flat_map(|(i, region)| {
        [
          item("Red keys", "lanyard", region, i as i64),
          item("Camera", "black body", region, i as i64 + 10),
        ]
      })
      .collect();

    for region in Region::all() {
      for term in ["", "red", "BLACK", "lan", "nothing"] {
        let hits = query(&items, term, region.into());
        for hit in &hits {
          assert_eq!(hit.region, region);
          let needle = term.to_lowercase();
          assert!(
            hit.name.to_lowercase().contains(&needle)
              || hit.description.to_lowercase().contains(&needle)
          );
        }
      }
    }
  }

  #[test]
  fn matches_agrees_with_run() {
    let items = vec![item("Sony camera", "", Region::Asia, 1)];
    let q = FeedQuery::new("SONY", Region::Asia.into());
    assert!(q.matches(&items[0]));
    assert_eq!(q.run(&items).len(), 1);
    assert!(!FeedQuery::new("sony", Region::Africa.into()).matches(&items[0]));
  }

  #[test]
  fn region_filter_parses_all_and_regions() {
    assert_eq!("all".parse::<RegionFilter>().unwrap(), RegionFilter::All);
    assert_eq!("ALL".parse::<RegionFilter>().unwrap(), RegionFilter::All);
    assert_eq!(
      "africa".parse::<RegionFilter>().unwrap(),
      RegionFilter::Only(Region::Africa)
    );
    assert!("mars".parse::<RegionFilter>().is_err());
    assert_eq!(RegionFilter::Only(Region::Asia).to_string(), "Asia");
  }

  #[test]
  fn region_filter_serialises_as_plain_string() {
    let q = FeedQuery::new("keys", RegionFilter::Only(Region::Europe));
    let json = serde_json::to_value(&q).unwrap();
    assert_eq!(json["region"], "Europe");
    let back: FeedQuery = serde_json::from_value(json).unwrap();
    assert_eq!(back, q);
  }
}
