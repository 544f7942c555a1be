//! `POST /captions` — suggest a short item name for an image.
//!
//! The request body is the raw image; its `Content-Type` must be an `image/*`
//! type. The response is `{"label": "..."}`. Collaborator failures and
//! timeouts map to `502`.

use axum::{
  Json,
  extract::State,
  http::{HeaderMap, header},
};
use bytes::Bytes;
use findit_core::{
  lookup::{Captioner, LookupError, bounded, normalize_caption},
  store::ItemStore,
};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

#[derive(Debug, Serialize, Deserialize)]
pub struct CaptionResponse {
  pub label: String,
}

/// `POST /captions`
pub async fn suggest<S, C>(
  State(state): State<ApiState<S, C>>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<Json<CaptionResponse>, ApiError>
where
  S: ItemStore,
  C: Captioner,
{
  let media_type = headers
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .filter(|v| v.starts_with("image/"))
    .ok_or_else(|| ApiError::BadRequest("Content-Type must be an image type".into()))?
    .to_owned();
  if body.is_empty() {
    return Err(ApiError::BadRequest("empty image".into()));
  }

  let raw = bounded(state.lookup_timeout, state.captioner.analyze_image(&body, &media_type))
    .await
    .inspect_err(|e| tracing::warn!(error = %e, "caption lookup failed"))?;
  let label = normalize_caption(&raw).ok_or(LookupError::Empty)?;
  Ok(Json(CaptionResponse { label }))
}
