//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (nanoseconds, `Z`
//! suffix) so that lexical order equals chronological order. UUIDs are stored
//! as hyphenated lowercase strings. Enums are stored by variant name.

use chrono::{DateTime, SecondsFormat, Utc};
use findit_core::{
  item::{Item, Location, Region, Status},
  user::User,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Status / Region ──────────────────────────────────────────────────────────

pub fn encode_status(s: Status) -> &'static str {
  match s {
    Status::Lost => "Lost",
    Status::Found => "Found",
  }
}

pub fn decode_status(s: &str) -> Result<Status> { Ok(s.parse()?) }

pub fn encode_region(r: Region) -> &'static str {
  match r {
    Region::Local => "Local",
    Region::America => "America",
    Region::Asia => "Asia",
    Region::Africa => "Africa",
    Region::Europe => "Europe",
  }
}

pub fn decode_region(s: &str) -> Result<Region> { Ok(s.parse()?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Columns selected for every item read, in order. Joined with `users`.
pub const ITEM_COLUMNS: &str = "
  i.item_id, i.name, i.description, i.status, i.image_url,
  i.latitude, i.longitude, i.location_text, i.reported_at, i.region,
  u.user_id, u.username, u.avatar_url, u.email, u.phone";

/// Raw values read directly from an `items` row joined with its author.
pub struct RawItem {
  // items columns
  pub item_id:       String,
  pub name:          String,
  pub description:   String,
  pub status:        String,
  pub image_url:     String,
  pub latitude:      f64,
  pub longitude:     f64,
  pub location_text: String,
  pub reported_at:   String,
  pub region:        String,
  // users join
  pub author:        RawUser,
}

impl RawItem {
  /// Read a row selected with [`ITEM_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      item_id:       row.get(0)?,
      name:          row.get(1)?,
      description:   row.get(2)?,
      status:        row.get(3)?,
      image_url:     row.get(4)?,
      latitude:      row.get(5)?,
      longitude:     row.get(6)?,
      location_text: row.get(7)?,
      reported_at:   row.get(8)?,
      region:        row.get(9)?,
      author:        RawUser {
        user_id:    row.get(10)?,
        username:   row.get(11)?,
        avatar_url: row.get(12)?,
        email:      row.get(13)?,
        phone:      row.get(14)?,
      },
    })
  }

  pub fn into_item(self) -> Result<Item> {
    Ok(Item {
      item_id:     decode_uuid(&self.item_id)?,
      name:        self.name,
      description: self.description,
      status:      decode_status(&self.status)?,
      image_url:   self.image_url,
      location:    Location::new(self.latitude, self.longitude, self.location_text)?,
      reported_at: decode_dt(&self.reported_at)?,
      author:      self.author.into_user(),
      region:      decode_region(&self.region)?,
    })
  }
}

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:    String,
  pub username:   String,
  pub avatar_url: String,
  pub email:      Option<String>,
  pub phone:      Option<String>,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:    row.get(0)?,
      username:   row.get(1)?,
      avatar_url: row.get(2)?,
      email:      row.get(3)?,
      phone:      row.get(4)?,
    })
  }

  pub fn into_user(self) -> User {
    User {
      id:         self.user_id,
      username:   self.username,
      avatar_url: self.avatar_url,
      email:      self.email,
      phone:      self.phone,
    }
  }
}
