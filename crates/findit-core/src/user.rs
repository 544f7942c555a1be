//! The identity that authors reports.
//!
//! Authentication lives outside this system; a user record only carries what
//! the feed and profile views display.

use serde::{Deserialize, Serialize};

/// A registered user. Immutable once stored; identity is by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:         String,
  pub username:   String,
  pub avatar_url: String,
  /// Contact details shown on the profile page only.
  pub email:      Option<String>,
  pub phone:      Option<String>,
}

impl User {
  /// A user with no contact details.
  pub fn new(
    id: impl Into<String>,
    username: impl Into<String>,
    avatar_url: impl Into<String>,
  ) -> Self {
    Self {
      id:         id.into(),
      username:   username.into(),
      avatar_url: avatar_url.into(),
      email:      None,
      phone:      None,
    }
  }
}
