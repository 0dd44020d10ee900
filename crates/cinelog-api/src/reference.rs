//! Handlers for genres, MPA ratings and directors.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use cinelog_core::{
  film::{Director, DirectorId, Genre, GenreId, Mpa, MpaId},
  store::CineStore,
};
use cinelog_service::Service;
use serde::Deserialize;

use crate::error::ApiError;

// ─── Genres ───────────────────────────────────────────────────────────────────

/// `GET /genres`
pub async fn genres<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
) -> Result<Json<Vec<Genre>>, ApiError> {
  Ok(Json(service.genres().await?))
}

/// `GET /genres/{id}`
pub async fn genre<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path(id): Path<GenreId>,
) -> Result<Json<Genre>, ApiError> {
  Ok(Json(service.genre(id).await?))
}

// ─── MPA ──────────────────────────────────────────────────────────────────────

/// `GET /mpa`
pub async fn mpa_ratings<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
) -> Result<Json<Vec<Mpa>>, ApiError> {
  Ok(Json(service.mpa_ratings().await?))
}

/// `GET /mpa/{id}`
pub async fn mpa<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path(id): Path<MpaId>,
) -> Result<Json<Mpa>, ApiError> {
  Ok(Json(service.mpa(id).await?))
}

// ─── Directors ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DirectorBody {
  pub name: String,
}

/// `GET /directors`
pub async fn directors<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
) -> Result<Json<Vec<Director>>, ApiError> {
  Ok(Json(service.directors().await?))
}

/// `POST /directors` with body `{"name":"..."}`
pub async fn create_director<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Json(body): Json<DirectorBody>,
) -> Result<impl IntoResponse, ApiError> {
  let director = service.create_director(body.name).await?;
  Ok((StatusCode::CREATED, Json(director)))
}

/// `GET /directors/{id}`
pub async fn director<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path(id): Path<DirectorId>,
) -> Result<Json<Director>, ApiError> {
  Ok(Json(service.director(id).await?))
}

/// `PUT /directors/{id}` with body `{"name":"..."}`
pub async fn update_director<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path(id): Path<DirectorId>,
  Json(body): Json<DirectorBody>,
) -> Result<Json<Director>, ApiError> {
  let director = service
    .update_director(Director { id, name: body.name })
    .await?;
  Ok(Json(director))
}

/// `DELETE /directors/{id}`
pub async fn remove_director<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path(id): Path<DirectorId>,
) -> Result<StatusCode, ApiError> {
  service.remove_director(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
