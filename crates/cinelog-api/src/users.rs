//! Handlers for `/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/users` | |
//! | `POST`   | `/users` | Body: [`NewUser`] |
//! | `GET`    | `/users/{id}` | 404 if not found |
//! | `PUT`    | `/users/{id}` | Body: [`NewUser`], replaces every field |
//! | `DELETE` | `/users/{id}` | |
//! | `GET`    | `/users/{id}/friends` | Confirmed friends only |
//! | `PUT`    | `/users/{id}/friends/{friend_id}` | |
//! | `DELETE` | `/users/{id}/friends/{friend_id}` | `{"removed": bool}` |
//! | `GET`    | `/users/{id}/friends/common/{other_id}` | |
//! | `GET`    | `/users/{id}/recommendations` | |
//! | `GET`    | `/users/{id}/feed` | Oldest first |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use cinelog_core::{
  feed::FeedEvent,
  film::Film,
  store::CineStore,
  user::{NewUser, User, UserId},
};
use cinelog_service::Service;
use serde::Serialize;

use crate::error::ApiError;

// ─── CRUD ─────────────────────────────────────────────────────────────────────

/// `GET /users`
pub async fn list<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
) -> Result<Json<Vec<User>>, ApiError> {
  Ok(Json(service.users().await?))
}

/// `POST /users`
pub async fn create<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Json(body): Json<NewUser>,
) -> Result<impl IntoResponse, ApiError> {
  let user = service.create_user(body).await?;
  Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /users/{id}`
pub async fn get_one<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path(id): Path<UserId>,
) -> Result<Json<User>, ApiError> {
  Ok(Json(service.user(id).await?))
}

/// `PUT /users/{id}`
pub async fn update<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path(id): Path<UserId>,
  Json(body): Json<NewUser>,
) -> Result<Json<User>, ApiError> {
  Ok(Json(service.update_user(id, body).await?))
}

/// `DELETE /users/{id}`
pub async fn remove<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path(id): Path<UserId>,
) -> Result<StatusCode, ApiError> {
  service.remove_user(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Friends ──────────────────────────────────────────────────────────────────

/// `GET /users/{id}/friends`
pub async fn friends<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path(id): Path<UserId>,
) -> Result<Json<Vec<User>>, ApiError> {
  Ok(Json(service.friends(id).await?))
}

/// `PUT /users/{id}/friends/{friend_id}`
pub async fn add_friend<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path((id, friend_id)): Path<(UserId, UserId)>,
) -> Result<StatusCode, ApiError> {
  service.add_friend(id, friend_id).await?;
  Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct RemovedBody {
  pub removed: bool,
}

/// `DELETE /users/{id}/friends/{friend_id}`
///
/// Succeeds with `removed: false` when `id` holds no confirmed edge toward
/// `friend_id`.
pub async fn remove_friend<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path((id, friend_id)): Path<(UserId, UserId)>,
) -> Result<Json<RemovedBody>, ApiError> {
  let removed = service.remove_friend(id, friend_id).await?;
  Ok(Json(RemovedBody { removed }))
}

/// `GET /users/{id}/friends/common/{other_id}`
pub async fn common_friends<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path((id, other_id)): Path<(UserId, UserId)>,
) -> Result<Json<Vec<User>>, ApiError> {
  Ok(Json(service.common_friends(id, other_id).await?))
}

// ─── Derived views ────────────────────────────────────────────────────────────

/// `GET /users/{id}/recommendations`
pub async fn recommendations<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path(id): Path<UserId>,
) -> Result<Json<Vec<Film>>, ApiError> {
  Ok(Json(service.recommendations(id).await?))
}

/// `GET /users/{id}/feed`
pub async fn feed<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path(id): Path<UserId>,
) -> Result<Json<Vec<FeedEvent>>, ApiError> {
  Ok(Json(service.user_feed(id).await?))
}
