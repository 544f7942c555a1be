//! The report workflow: form state, the two enrichment lookups, validation
//! and submission.
//!
//! A [`ReportForm`] is driven by UI events. Each lookup is split into a
//! `begin_*` step, which guards against re-entry and hands out a ticket, and a
//! `finish_*` step, which applies the outcome. The async helpers
//! [`ReportForm::suggest_caption`] and [`ReportForm::locate`] run both steps
//! around a bounded call to the collaborator.

use std::{collections::BTreeSet, fmt, time::Duration};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};
use thiserror::Error;
use uuid::Uuid;

use crate::{
  item::{Item, Location, NewItem, Region, Status},
  lookup::{Captioner, Locator, LookupError, LookupState, bounded, normalize_caption},
  store::ItemStore,
  user::User,
};

/// Default upper bound on a single external lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(15);

pub const LOCATION_NOTICE: &str = "Could not get location. Please enable location services.";

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A field that must be filled before a report can be submitted.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RequiredField {
  Name,
  Image,
  Location,
}

/// Submission refused because required fields are missing. Nothing was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
  pub missing_fields: BTreeSet<RequiredField>,
}

impl ValidationError {
  /// The form-level message shown to the reporter.
  pub const MESSAGE: &'static str = "Please fill name, upload an image, and set a location.";
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let names: Vec<&str> = self.missing_fields.iter().map(AsRef::as_ref).collect();
    write!(f, "missing required fields: {}", names.join(", "))
  }
}

impl std::error::Error for ValidationError {}

/// A lookup could not be started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WorkflowError {
  #[error("a lookup of this kind is already pending")]
  AlreadyPending,

  #[error("no image selected")]
  NoImage,

  #[error("the selected image has no content to analyse")]
  NoImageData,
}

/// Failure of [`ReportForm::submit`].
#[derive(Debug, Error)]
pub enum SubmitError<E: std::error::Error + 'static> {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("store error: {0}")]
  Store(#[source] E),
}

// ─── Image reference ─────────────────────────────────────────────────────────

/// Raw image content, needed only for caption suggestions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageContent {
  pub data:       Bytes,
  pub media_type: String,
}

/// One image selection. Identity is the `handle`, not the URL or content:
/// picking the same file twice yields two different selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
  pub handle:  Uuid,
  pub url:     String,
  pub content: Option<ImageContent>,
}

/// Hands the caption request's inputs to the caller while the form is pending.
///
/// Not `Clone`: a ticket is finished at most once.
///
/// ```compile_fail
/// fn cloneable<T: Clone>() {}
/// cloneable::<findit_core::report::CaptionTicket>();
/// ```
#[derive(Debug)]
pub struct CaptionTicket {
  pub handle:  Uuid,
  pub content: ImageContent,
}

/// Proof that a location lookup was started.
#[derive(Debug)]
pub struct LocateTicket(());

/// A user-facing, non-fatal message queued by the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice(pub String);

impl fmt::Display for Notice {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// ─── Draft ───────────────────────────────────────────────────────────────────

/// A validated report, ready to become a [`NewItem`] once the author is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDraft {
  pub name:        String,
  pub description: String,
  pub status:      Status,
  pub image_url:   String,
  pub location:    Location,
  pub region:      Region,
}

impl ReportDraft {
  pub fn into_new_item(self, author_id: impl Into<String>) -> NewItem {
    NewItem {
      name:        self.name,
      description: self.description,
      status:      self.status,
      image_url:   self.image_url,
      location:    self.location,
      region:      self.region,
      author_id:   author_id.into(),
    }
  }
}

// ─── Submission ──────────────────────────────────────────────────────────────

/// A report as sent over the wire. Required fields are optional here so the
/// receiving side can validate and name every missing one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSubmission {
  #[serde(default)]
  pub status:      Status,
  #[serde(default)]
  pub name:        String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub region:      Region,
  #[serde(default)]
  pub image_url:   Option<String>,
  #[serde(default)]
  pub location:    Option<Location>,
}

impl ReportSubmission {
  /// Rebuild a form from the submission. A blank image URL counts as no image.
  pub fn into_form(self) -> ReportForm {
    let mut form = ReportForm {
      status: self.status,
      name: self.name,
      description: self.description,
      region: self.region,
      ..ReportForm::default()
    };
    if let Some(url) = self.image_url.filter(|url| !url.trim().is_empty()) {
      form.select_image(url, None);
    }
    form.location = self.location;
    form
  }
}

impl From<&ReportForm> for ReportSubmission {
  fn from(form: &ReportForm) -> Self {
    Self {
      status:      form.status,
      name:        form.name.clone(),
      description: form.description.clone(),
      region:      form.region,
      image_url:   form.image.as_ref().map(|image| image.url.clone()),
      location:    form.location.clone(),
    }
  }
}

// ─── Form ────────────────────────────────────────────────────────────────────

/// In-progress report state.
#[derive(Debug, Clone, Default)]
pub struct ReportForm {
  pub status:      Status,
  pub name:        String,
  pub description: String,
  pub region:      Region,
  image:           Option<SelectedImage>,
  location:        Option<Location>,
  caption:         LookupState<String>,
  locating:        LookupState<Location>,
  notices:         Vec<Notice>,
}

impl ReportForm {
  pub fn new() -> Self { Self::default() }

  // ── Field access ──────────────────────────────────────────────────────

  pub fn image(&self) -> Option<&SelectedImage> { self.image.as_ref() }

  pub fn location(&self) -> Option<&Location> { self.location.as_ref() }

  pub fn caption_state(&self) -> &LookupState<String> { &self.caption }

  pub fn locate_state(&self) -> &LookupState<Location> { &self.locating }

  /// Drain queued notices for display.
  pub fn take_notices(&mut self) -> Vec<Notice> { std::mem::take(&mut self.notices) }

  /// Record a new image selection and return its handle.
  ///
  /// Any caption state belonging to the previous image is reset, so the
  /// suggestion can be requested again.
  pub fn select_image(&mut self, url: impl Into<String>, content: Option<ImageContent>) -> Uuid {
    let handle = Uuid::new_v4();
    self.image = Some(SelectedImage { handle, url: url.into(), content });
    self.caption = LookupState::Idle;
    handle
  }

  /// Set the location directly (e.g. typed in or picked on a map).
  pub fn set_location(&mut self, location: Location) { self.location = Some(location); }

  // ── Caption suggestion ────────────────────────────────────────────────

  /// Start a caption request for the selected image.
  pub fn begin_caption(&mut self) -> Result<CaptionTicket, WorkflowError> {
    if self.caption.is_pending() {
      return Err(WorkflowError::AlreadyPending);
    }
    let image = self.image.as_ref().ok_or(WorkflowError::NoImage)?;
    let content = image.content.clone().ok_or(WorkflowError::NoImageData)?;
    let ticket = CaptionTicket { handle: image.handle, content };
    self.caption = LookupState::Pending;
    Ok(ticket)
  }

  /// Apply the outcome of a caption request.
  ///
  /// On success the normalised label replaces `name`. On failure `name` is
  /// left as it was and a notice is queued. Outcomes for an image that is no
  /// longer selected are dropped.
  pub fn finish_caption(&mut self, ticket: CaptionTicket, outcome: Result<String, LookupError>) {
    let current = self.image.as_ref().map(|image| image.handle);
    if current != Some(ticket.handle) {
      tracing::debug!(handle = %ticket.handle, "discarding caption for replaced image");
      return;
    }

    match outcome.and_then(|raw| normalize_caption(&raw).ok_or(LookupError::Empty)) {
      Ok(label) => {
        self.name = label.clone();
        self.caption = LookupState::Resolved(label);
      }
      Err(e) => {
        tracing::warn!(error = %e, "caption suggestion failed");
        self.notices.push(Notice(format!("Could not analyze image: {e}")));
        self.caption = LookupState::Failed(e.to_string());
      }
    }
  }

  /// Ask `captioner` for a name suggestion, bounded by `limit`.
  pub async fn suggest_caption<C: Captioner>(
    &mut self,
    captioner: &C,
    limit: Duration,
  ) -> Result<&LookupState<String>, WorkflowError> {
    let ticket = self.begin_caption()?;
    let content = ticket.content.clone();
    let outcome = bounded(limit, captioner.analyze_image(&content.data, &content.media_type)).await;
    self.finish_caption(ticket, outcome);
    Ok(&self.caption)
  }

  // ── Geolocation ───────────────────────────────────────────────────────

  /// Start a location lookup.
  pub fn begin_locate(&mut self) -> Result<LocateTicket, WorkflowError> {
    if self.locating.is_pending() {
      return Err(WorkflowError::AlreadyPending);
    }
    self.locating = LookupState::Pending;
    Ok(LocateTicket(()))
  }

  /// Apply the outcome of a location lookup. On failure the previous
  /// location, if any, is kept.
  pub fn finish_locate(&mut self, _ticket: LocateTicket, outcome: Result<Location, LookupError>) {
    match outcome {
      Ok(location) => {
        self.location = Some(location.clone());
        self.locating = LookupState::Resolved(location);
      }
      Err(e) => {
        tracing::warn!(error = %e, "geolocation failed");
        self.notices.push(Notice(LOCATION_NOTICE.to_owned()));
        self.locating = LookupState::Failed(e.to_string());
      }
    }
  }

  /// Ask `locator` for the current position, bounded by `limit`.
  pub async fn locate<L: Locator>(
    &mut self,
    locator: &L,
    limit: Duration,
  ) -> Result<&LookupState<Location>, WorkflowError> {
    let ticket = self.begin_locate()?;
    let outcome = bounded(limit, locator.current_position())
      .await
      .and_then(|fix| {
        Location::near(fix.latitude, fix.longitude)
          .map_err(|e| LookupError::Service(e.to_string()))
      });
    self.finish_locate(ticket, outcome);
    Ok(&self.locating)
  }

  // ── Validation & submission ───────────────────────────────────────────

  /// Check required fields, reporting every missing one.
  pub fn validate(&self) -> Result<ReportDraft, ValidationError> {
    let mut missing = BTreeSet::new();
    if self.name.trim().is_empty() {
      missing.insert(RequiredField::Name);
    }
    if self.image.is_none() {
      missing.insert(RequiredField::Image);
    }
    if self.location.is_none() {
      missing.insert(RequiredField::Location);
    }

    match (&self.image, &self.location) {
      (Some(image), Some(location)) if missing.is_empty() => Ok(ReportDraft {
        name:        self.name.clone(),
        description: self.description.clone(),
        status:      self.status,
        image_url:   image.url.clone(),
        location:    location.clone(),
        region:      self.region,
      }),
      _ => Err(ValidationError { missing_fields: missing }),
    }
  }

  /// Validate and append the report to `store` as `author`.
  ///
  /// Nothing is written when validation fails.
  pub async fn submit<S: ItemStore>(
    &self,
    store: &S,
    author: &User,
  ) -> Result<Item, SubmitError<S::Error>> {
    let draft = self.validate()?;
    let item = store
      .append_item(draft.into_new_item(author.id.clone()))
      .await
      .map_err(SubmitError::Store)?;
    tracing::info!(
      item_id = %item.item_id,
      status = %item.status,
      region = %item.region,
      "report submitted"
    );
    Ok(item)
  }
}
