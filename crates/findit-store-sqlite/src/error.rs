//! Error type for `findit-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] findit_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("user not found: {0}")]
  UserNotFound(String),

  #[error("user {0} already exists")]
  UserExists(String),

  #[error("item {0} already exists")]
  ItemExists(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
