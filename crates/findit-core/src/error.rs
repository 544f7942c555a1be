//! Error types for `findit-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  UserNotFound(String),

  #[error("user {0} already exists")]
  UserExists(String),

  #[error("item {0} already exists")]
  ItemExists(Uuid),

  #[error("invalid location ({latitude}, {longitude})")]
  InvalidLocation { latitude: f64, longitude: f64 },

  #[error("location label must not be empty")]
  EmptyLocationLabel,

  #[error("unknown region: {0:?}")]
  UnknownRegion(String),

  #[error("unknown status: {0:?}")]
  UnknownStatus(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
