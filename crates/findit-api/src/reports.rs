//! `POST /reports` — submit a new lost or found report.
//!
//! The body is a [`ReportSubmission`]. The item is attributed to the current
//! user and gets a store-assigned id and timestamp. Missing required fields
//! yield `422` with `{"error", "missing_fields"}` and store nothing. A body
//! that does not decode (bad JSON, unknown region, out-of-range location) is
//! a `400` with `{"error"}`.

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use findit_core::{
  lookup::Captioner,
  report::{ReportSubmission, SubmitError},
  store::ItemStore,
};

use crate::{ApiState, error::ApiError};

/// `POST /reports`
pub async fn create<S, C>(
  State(state): State<ApiState<S, C>>,
  body: Result<Json<ReportSubmission>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ItemStore,
  C: Captioner,
{
  let Json(body) = body?;
  let form = body.into_form();
  let item = form
    .submit(state.store.as_ref(), &state.current_user)
    .await
    .map_err(|e| match e {
      SubmitError::Validation(e) => ApiError::Validation(e),
      SubmitError::Store(e) => ApiError::Store(Box::new(e)),
    })?;
  Ok((StatusCode::CREATED, Json(item)))
}
