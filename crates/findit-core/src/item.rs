//! Item types: the lost/found report record and its value types.
//!
//! An item is created once through the report workflow and never changes
//! afterwards. Every field that the store assigns (`item_id`, `reported_at`,
//! `author`) is absent from [`NewItem`].

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator as _};
use uuid::Uuid;

use crate::{Error, Result, user::User};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Whether the reporter lost the item or found it.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  AsRefStr,
  EnumIter,
)]
#[serde(try_from = "String")]
pub enum Status {
  #[default]
  Lost,
  Found,
}

impl FromStr for Status {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Self::iter()
      .find(|status| status.as_ref().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| Error::UnknownStatus(s.to_owned()))
  }
}

impl TryFrom<String> for Status {
  type Error = Error;

  fn try_from(s: String) -> Result<Self> { s.parse() }
}

// ─── Region ──────────────────────────────────────────────────────────────────

/// Coarse geographic bucket used by the feed filter. Closed set.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  AsRefStr,
  EnumIter,
)]
#[serde(try_from = "String")]
pub enum Region {
  #[default]
  Local,
  America,
  Asia,
  Africa,
  Europe,
}

impl Region {
  /// All regions in display order.
  pub fn all() -> impl Iterator<Item = Self> { Self::iter() }
}

impl FromStr for Region {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Self::iter()
      .find(|region| region.as_ref().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| Error::UnknownRegion(s.to_owned()))
  }
}

impl TryFrom<String> for Region {
  type Error = Error;

  fn try_from(s: String) -> Result<Self> { s.parse() }
}

// ─── Location ────────────────────────────────────────────────────────────────

/// A fully-populated location. Coordinates are validated on construction and
/// on deserialisation, so a `Location` value is always in range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLocation")]
pub struct Location {
  latitude:  f64,
  longitude: f64,
  text:      String,
}

/// Unchecked wire form of [`Location`].
#[derive(Deserialize)]
struct RawLocation {
  latitude:  f64,
  longitude: f64,
  text:      String,
}

impl TryFrom<RawLocation> for Location {
  type Error = Error;

  fn try_from(raw: RawLocation) -> Result<Self> {
    Self::new(raw.latitude, raw.longitude, raw.text)
  }
}

impl Location {
  pub fn new(latitude: f64, longitude: f64, text: impl Into<String>) -> Result<Self> {
    let in_range = latitude.is_finite()
      && longitude.is_finite()
      && (-90.0..=90.0).contains(&latitude)
      && (-180.0..=180.0).contains(&longitude);
    if !in_range {
      return Err(Error::InvalidLocation { latitude, longitude });
    }
    let text = text.into();
    if text.trim().is_empty() {
      return Err(Error::EmptyLocationLabel);
    }
    Ok(Self { latitude, longitude, text })
  }

  /// A location labelled with its own rounded coordinates, as produced by the
  /// geolocation lookup (no reverse geocoding).
  pub fn near(latitude: f64, longitude: f64) -> Result<Self> {
    Self::new(latitude, longitude, format!("Near you ({latitude:.2}, {longitude:.2})"))
  }

  pub fn latitude(&self) -> f64 { self.latitude }

  pub fn longitude(&self) -> f64 { self.longitude }

  pub fn text(&self) -> &str { &self.text }
}

impl fmt::Display for Location {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.text)
  }
}

// ─── Item ────────────────────────────────────────────────────────────────────

/// A single lost/found report. Once stored, no field is ever updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
  pub item_id:     Uuid,
  pub name:        String,
  pub description: String,
  pub status:      Status,
  pub image_url:   String,
  pub location:    Location,
  /// Store-assigned; never earlier than any item already in the store.
  pub reported_at: DateTime<Utc>,
  pub author:      User,
  pub region:      Region,
}

// ─── NewItem ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::ItemStore::append_item`].
///
/// `item_id` and `reported_at` are always set by the store; the author is
/// resolved from `author_id` at insertion time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
  pub name:        String,
  pub description: String,
  pub status:      Status,
  pub image_url:   String,
  pub location:    Location,
  pub region:      Region,
  pub author_id:   String,
}

impl NewItem {
  /// Attach the store-assigned fields.
  pub fn into_item(self, item_id: Uuid, reported_at: DateTime<Utc>, author: User) -> Item {
    Item {
      item_id,
      name: self.name,
      description: self.description,
      status: self.status,
      image_url: self.image_url,
      location: self.location,
      reported_at,
      author,
      region: self.region,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn region_parses_case_insensitively() {
    assert_eq!("asia".parse::<Region>().unwrap(), Region::Asia);
    assert_eq!(" Europe ".parse::<Region>().unwrap(), Region::Europe);
    assert!(matches!("Atlantis".parse::<Region>(), Err(Error::UnknownRegion(_))));
  }

  #[test]
  fn enums_deserialise_like_they_parse() {
    assert_eq!(serde_json::from_str::<Region>(r#""asia""#).unwrap(), Region::Asia);
    assert_eq!(serde_json::from_str::<Status>(r#""found""#).unwrap(), Status::Found);
    assert_eq!(serde_json::to_string(&Region::Asia).unwrap(), r#""Asia""#);
    assert!(serde_json::from_str::<Region>(r#""Oceania""#).is_err());
  }

  #[test]
  fn region_lists_in_display_order() {
    let names: Vec<String> = Region::all().map(|r| r.to_string()).collect();
    assert_eq!(names, ["Local", "America", "Asia", "Africa", "Europe"]);
  }

  #[test]
  fn status_defaults_to_lost() {
    assert_eq!(Status::default(), Status::Lost);
    assert_eq!("FOUND".parse::<Status>().unwrap(), Status::Found);
  }

  #[test]
  fn location_rejects_out_of_range_coordinates() {
    assert!(Location::new(90.0, 180.0, "edge").is_ok());
    assert!(matches!(
      Location::new(90.5, 0.0, "north of north"),
      Err(Error::InvalidLocation { .. })
    ));
    assert!(Location::new(0.0, -180.1, "x").is_err());
    assert!(Location::new(f64::NAN, 0.0, "x").is_err());
    assert!(matches!(Location::new(0.0, 0.0, "  "), Err(Error::EmptyLocationLabel)));
  }

  #[test]
  fn location_deserialisation_is_validated() {
    let ok: Location = serde_json::from_str(
      r#"{"latitude":51.5072,"longitude":-0.1276,"text":"London, UK"}"#,
    )
    .unwrap();
    assert_eq!(ok.text(), "London, UK");

    let bad = serde_json::from_str::<Location>(
      r#"{"latitude":123.0,"longitude":0.0,"text":"nowhere"}"#,
    );
    assert!(bad.is_err());
  }

  #[test]
  fn near_labels_with_rounded_coordinates() {
    let loc = Location::near(34.05223, -118.24368).unwrap();
    assert_eq!(loc.text(), "Near you (34.05, -118.24)");
  }
}
