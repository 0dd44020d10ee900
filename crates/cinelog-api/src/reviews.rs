//! Handlers for `/reviews` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/reviews` | `?film_id=&count=`, most useful first |
//! | `POST`   | `/reviews` | Body: [`NewReview`] |
//! | `GET`    | `/reviews/{id}` | |
//! | `PUT`    | `/reviews/{id}` | Body: [`ReviewUpdate`] |
//! | `DELETE` | `/reviews/{id}` | |
//! | `PUT`/`DELETE` | `/reviews/{id}/like/{user_id}` | |
//! | `PUT`/`DELETE` | `/reviews/{id}/dislike/{user_id}` | |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use cinelog_core::{
  film::FilmId,
  review::{NewReview, Review, ReviewId, ReviewUpdate},
  store::CineStore,
  user::UserId,
};
use cinelog_service::Service;
use serde::Deserialize;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  pub film_id: Option<FilmId>,
  pub count:   Option<usize>,
}

/// `GET /reviews[?film_id=...][&count=...]`
pub async fn list<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Review>>, ApiError> {
  Ok(Json(service.reviews(params.film_id, params.count).await?))
}

// ─── CRUD ─────────────────────────────────────────────────────────────────────

/// `POST /reviews`
pub async fn create<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Json(body): Json<NewReview>,
) -> Result<impl IntoResponse, ApiError> {
  let review = service.create_review(body).await?;
  Ok((StatusCode::CREATED, Json(review)))
}

/// `GET /reviews/{id}`
pub async fn get_one<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path(id): Path<ReviewId>,
) -> Result<Json<Review>, ApiError> {
  Ok(Json(service.review(id).await?))
}

/// `PUT /reviews/{id}`
pub async fn update<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path(id): Path<ReviewId>,
  Json(body): Json<ReviewUpdate>,
) -> Result<Json<Review>, ApiError> {
  Ok(Json(service.update_review(id, body).await?))
}

/// `DELETE /reviews/{id}`
pub async fn remove<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path(id): Path<ReviewId>,
) -> Result<StatusCode, ApiError> {
  service.remove_review(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Votes ────────────────────────────────────────────────────────────────────

/// `PUT /reviews/{id}/like/{user_id}`
pub async fn like<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path((id, user_id)): Path<(ReviewId, UserId)>,
) -> Result<StatusCode, ApiError> {
  service.add_review_like(id, user_id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /reviews/{id}/like/{user_id}`
pub async fn unlike<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path((id, user_id)): Path<(ReviewId, UserId)>,
) -> Result<StatusCode, ApiError> {
  service.remove_review_like(id, user_id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `PUT /reviews/{id}/dislike/{user_id}`
pub async fn dislike<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path((id, user_id)): Path<(ReviewId, UserId)>,
) -> Result<StatusCode, ApiError> {
  service.add_review_dislike(id, user_id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /reviews/{id}/dislike/{user_id}`
pub async fn undislike<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path((id, user_id)): Path<(ReviewId, UserId)>,
) -> Result<StatusCode, ApiError> {
  service.remove_review_dislike(id, user_id).await?;
  Ok(StatusCode::NO_CONTENT)
}
