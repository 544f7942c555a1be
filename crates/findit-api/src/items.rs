//! Handlers for `/items` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/items` | Whole collection, newest first |
//! | `GET`  | `/items/:id` | 404 if not found |

use axum::{
  Json,
  extract::{Path, State},
};
use findit_core::{item::Item, lookup::Captioner, store::ItemStore};
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /items`
pub async fn list<S, C>(State(state): State<ApiState<S, C>>) -> Result<Json<Vec<Item>>, ApiError>
where
  S: ItemStore,
  C: Captioner,
{
  let items = state
    .store
    .list_items()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(items))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /items/:id`
pub async fn get_one<S, C>(
  State(state): State<ApiState<S, C>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Item>, ApiError>
where
  S: ItemStore,
  C: Captioner,
{
  let item = state
    .store
    .get_item(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("item {id} not found")))?;
  Ok(Json(item))
}
