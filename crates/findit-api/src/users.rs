//! Handlers for user endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/me` | The configured current user |
//! | `GET`  | `/users/:id` | 404 if not found |
//! | `GET`  | `/users/:id/profile` | User plus their reports, newest first |

use axum::{
  Json,
  extract::{Path, State},
};
use findit_core::{lookup::Captioner, profile::ProfileView, store::ItemStore, user::User};

use crate::{ApiState, error::ApiError};

/// `GET /me`
pub async fn me<S, C>(State(state): State<ApiState<S, C>>) -> Json<User>
where
  S: ItemStore,
  C: Captioner,
{
  Json(state.current_user.as_ref().clone())
}

async fn find_user<S, C>(state: &ApiState<S, C>, id: &str) -> Result<User, ApiError>
where
  S: ItemStore,
{
  state
    .store
    .get_user(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))
}

/// `GET /users/:id`
pub async fn get_one<S, C>(
  State(state): State<ApiState<S, C>>,
  Path(id): Path<String>,
) -> Result<Json<User>, ApiError>
where
  S: ItemStore,
  C: Captioner,
{
  Ok(Json(find_user(&state, &id).await?))
}

/// `GET /users/:id/profile`
pub async fn profile<S, C>(
  State(state): State<ApiState<S, C>>,
  Path(id): Path<String>,
) -> Result<Json<ProfileView>, ApiError>
where
  S: ItemStore,
  C: Captioner,
{
  let user = find_user(&state, &id).await?;
  let items = state
    .store
    .list_items()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(ProfileView::derive(user, &items)))
}
