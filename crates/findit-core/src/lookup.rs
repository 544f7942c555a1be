//! External lookups used by the report workflow: caption suggestion and
//! geolocation.
//!
//! Both collaborators are fallible and slow. The workflow never lets their
//! failures escape; it records the outcome in a [`LookupState`] instead.

use std::{future::Future, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── State machine ───────────────────────────────────────────────────────────

/// Progress of a single external lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum LookupState<T> {
  Idle,
  /// A request is in flight; a second one must not be issued.
  Pending,
  Resolved(T),
  /// The lookup failed; carries the user-facing reason.
  Failed(String),
}

impl<T> Default for LookupState<T> {
  fn default() -> Self { Self::Idle }
}

impl<T> LookupState<T> {
  pub fn is_pending(&self) -> bool { matches!(self, Self::Pending) }

  pub fn resolved(&self) -> Option<&T> {
    match self {
      Self::Resolved(value) => Some(value),
      _ => None,
    }
  }

  pub fn failure(&self) -> Option<&str> {
    match self {
      Self::Failed(reason) => Some(reason),
      _ => None,
    }
  }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Why a lookup did not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
  #[error("timed out after {0:?}")]
  Timeout(Duration),

  #[error("{0}")]
  Service(String),

  #[error("returned an empty result")]
  Empty,
}

/// Failure modes of a platform geolocation service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
  #[error("location permission denied")]
  PermissionDenied,

  #[error("location unavailable: {0}")]
  Unavailable(String),
}

// ─── Collaborators ───────────────────────────────────────────────────────────

/// A raw latitude/longitude fix from a [`Locator`]. Not yet range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
  pub latitude:  f64,
  pub longitude: f64,
}

/// Image captioning service: a short (five words or fewer) guess at what an
/// image shows.
pub trait Captioner: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn analyze_image<'a>(
    &'a self,
    image: &'a [u8],
    media_type: &'a str,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}

/// Geolocation service returning the device's current position.
pub trait Locator: Send + Sync {
  fn current_position(
    &self,
  ) -> impl Future<Output = Result<Coordinates, LocateError>> + Send + '_;
}

/// A locator that always answers with the same fix, or always fails when none
/// is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocator(pub Option<Coordinates>);

impl Locator for FixedLocator {
  async fn current_position(&self) -> Result<Coordinates, LocateError> {
    self
      .0
      .ok_or_else(|| LocateError::Unavailable("no position configured".into()))
  }
}

/// Run `fut`, turning an elapsed `limit` into [`LookupError::Timeout`] and a
/// collaborator error into [`LookupError::Service`].
pub async fn bounded<T, E, F>(limit: Duration, fut: F) -> Result<T, LookupError>
where
  F: Future<Output = Result<T, E>>,
  E: std::fmt::Display,
{
  match tokio::time::timeout(limit, fut).await {
    Ok(Ok(value)) => Ok(value),
    Ok(Err(e)) => Err(LookupError::Service(e.to_string())),
    Err(_) => Err(LookupError::Timeout(limit)),
  }
}

/// Clean up a caption label: trim, strip wrapping quotes and a trailing
/// period, keep at most five words. Returns `None` if nothing is left.
pub fn normalize_caption(raw: &str) -> Option<String> {
  let is_quote = |c: char| c == '"' || c == '\'';
  let trimmed = raw
    .trim()
    .trim_end_matches('.')
    .trim_matches(is_quote)
    .trim_end_matches('.')
    .trim();
  let words: Vec<&str> = trimmed.split_whitespace().take(5).collect();
  (!words.is_empty()).then(|| words.join(" "))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalize_caption_strips_noise() {
    assert_eq!(
      normalize_caption("  'Silver keys on a blue lanyard'.\n").as_deref(),
      Some("Silver keys on a blue")
    );
    assert_eq!(
      normalize_caption("\"Black leather men's wallet\"").as_deref(),
      Some("Black leather men's wallet")
    );
    assert_eq!(normalize_caption("'Red umbrella'.").as_deref(), Some("Red umbrella"));
    assert_eq!(normalize_caption("  \" \"  "), None);
    assert_eq!(normalize_caption(""), None);
  }

  #[tokio::test]
  async fn bounded_maps_timeout() {
    let never = std::future::pending::<Result<(), LocateError>>();
    let err = bounded(Duration::from_millis(10), never).await.unwrap_err();
    assert_eq!(err, LookupError::Timeout(Duration::from_millis(10)));
  }

  #[tokio::test]
  async fn bounded_maps_service_error() {
    let fut = async { Err::<(), _>(LocateError::PermissionDenied) };
    let err = bounded(Duration::from_secs(1), fut).await.unwrap_err();
    assert_eq!(err, LookupError::Service("location permission denied".into()));
  }

  #[tokio::test]
  async fn fixed_locator_without_fix_is_unavailable() {
    assert!(matches!(
      FixedLocator(None).current_position().await,
      Err(LocateError::Unavailable(_))
    ));
    let here = Coordinates { latitude: 1.0, longitude: 2.0 };
    assert_eq!(FixedLocator(Some(here)).current_position().await.unwrap(), here);
  }

  #[test]
  fn lookup_state_accessors() {
    let s: LookupState<u8> = LookupState::Resolved(3);
    assert_eq!(s.resolved(), Some(&3));
    assert!(!s.is_pending());
    let f: LookupState<u8> = LookupState::Failed("nope".into());
    assert_eq!(f.failure(), Some("nope"));
  }
}
