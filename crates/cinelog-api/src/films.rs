//! Handlers for `/films` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/films` | |
//! | `POST`   | `/films` | Body: [`NewFilm`] |
//! | `GET`    | `/films/{id}` | |
//! | `PUT`    | `/films/{id}` | Body: [`NewFilm`], replaces links too |
//! | `DELETE` | `/films/{id}` | |
//! | `PUT`    | `/films/{id}/like/{user_id}` | |
//! | `DELETE` | `/films/{id}/like/{user_id}` | 404 if the like is absent |
//! | `GET`    | `/films/popular` | `?count=&genre_id=&year=` |
//! | `GET`    | `/films/director/{id}` | `?sort_by=year\|likes` |
//! | `GET`    | `/films/common` | `?user_id=&friend_id=` |
//! | `GET`    | `/films/search` | `?query=&by=title,director` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use cinelog_core::{
  film::{DirectorId, Film, FilmId, GenreId, NewFilm},
  store::CineStore,
  user::UserId,
};
use cinelog_service::Service;
use serde::Deserialize;

use crate::error::ApiError;

// ─── CRUD ─────────────────────────────────────────────────────────────────────

/// `GET /films`
pub async fn list<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
) -> Result<Json<Vec<Film>>, ApiError> {
  Ok(Json(service.films().await?))
}

/// `POST /films`
pub async fn create<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Json(body): Json<NewFilm>,
) -> Result<impl IntoResponse, ApiError> {
  let film = service.create_film(body).await?;
  Ok((StatusCode::CREATED, Json(film)))
}

/// `GET /films/{id}`
pub async fn get_one<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path(id): Path<FilmId>,
) -> Result<Json<Film>, ApiError> {
  Ok(Json(service.film(id).await?))
}

/// `PUT /films/{id}`
pub async fn update<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path(id): Path<FilmId>,
  Json(body): Json<NewFilm>,
) -> Result<Json<Film>, ApiError> {
  Ok(Json(service.update_film(id, body).await?))
}

/// `DELETE /films/{id}`
pub async fn remove<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path(id): Path<FilmId>,
) -> Result<StatusCode, ApiError> {
  service.remove_film(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Likes ────────────────────────────────────────────────────────────────────

/// `PUT /films/{id}/like/{user_id}`
pub async fn like<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path((id, user_id)): Path<(FilmId, UserId)>,
) -> Result<StatusCode, ApiError> {
  service.add_like(id, user_id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /films/{id}/like/{user_id}`
pub async fn unlike<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path((id, user_id)): Path<(FilmId, UserId)>,
) -> Result<StatusCode, ApiError> {
  service.remove_like(id, user_id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Rankings ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct PopularParams {
  pub count:    Option<usize>,
  pub genre_id: Option<GenreId>,
  pub year:     Option<i32>,
}

/// `GET /films/popular[?count=...][&genre_id=...][&year=...]`
pub async fn popular<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Query(params): Query<PopularParams>,
) -> Result<Json<Vec<Film>>, ApiError> {
  let films = service
    .popular_films(params.count, params.genre_id, params.year)
    .await?;
  Ok(Json(films))
}

#[derive(Debug, Deserialize, Default)]
pub struct DirectorParams {
  pub sort_by: Option<String>,
}

/// `GET /films/director/{id}[?sort_by=year|likes]`
pub async fn by_director<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Path(id): Path<DirectorId>,
  Query(params): Query<DirectorParams>,
) -> Result<Json<Vec<Film>>, ApiError> {
  let films = service
    .director_films(id, params.sort_by.as_deref())
    .await?;
  Ok(Json(films))
}

#[derive(Debug, Deserialize)]
pub struct CommonParams {
  pub user_id:   UserId,
  pub friend_id: UserId,
}

/// `GET /films/common?user_id=...&friend_id=...`
pub async fn common<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Query(params): Query<CommonParams>,
) -> Result<Json<Vec<Film>>, ApiError> {
  Ok(Json(service.common_films(params.user_id, params.friend_id).await?))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  #[serde(default)]
  pub query: String,
  /// Comma-separated subset of `title,director`.
  pub by:    Option<String>,
}

/// `GET /films/search?query=...[&by=title,director]`
pub async fn search<S: CineStore>(
  State(service): State<Arc<Service<S>>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Film>>, ApiError> {
  let films = service
    .search_films(&params.query, params.by.as_deref())
    .await?;
  Ok(Json(films))
}
