//! Films, likes, popularity ranking and catalogue search.

use cinelog_core::{
  Entity, Error, Result,
  feed::{EventType, Operation},
  film::{DirectorId, Film, FilmId, GenreId, NewFilm},
  query::{DirectorFilmsQuery, DirectorSort, PopularQuery, SearchField, resolve_count},
  store::CineStore,
  user::UserId,
  validate,
};

use crate::{Service, StoreResultExt as _};

/// Descending like count; ties keep their incoming order.
fn rank_by_likes(films: &mut [Film]) { films.sort_by(|a, b| b.likes.cmp(&a.likes)); }

impl<S: CineStore> Service<S> {
  // ── CRUD ──────────────────────────────────────────────────────────────

  /// Validate and persist a film, then index it for search. Dangling genre,
  /// MPA or director ids fail with `NotFound` and nothing is written.
  pub async fn create_film(&self, input: NewFilm) -> Result<Film> {
    validate::film(&input)?;
    let film = self.store.add_film(input).await.lift()?;
    self.catalog.upsert(&film);
    tracing::info!(film_id = film.id, name = %film.name, "film created");
    Ok(film)
  }

  pub async fn update_film(&self, id: FilmId, input: NewFilm) -> Result<Film> {
    validate::film(&input)?;
    let film = self
      .store
      .update_film(id, input)
      .await
      .lift()?
      .ok_or_else(|| Error::not_found(Entity::Film, id))?;
    self.catalog.upsert(&film);
    tracing::info!(film_id = id, "film updated");
    Ok(film)
  }

  pub async fn film(&self, id: FilmId) -> Result<Film> { self.require_film(id).await }

  pub async fn films(&self) -> Result<Vec<Film>> { self.store.list_films().await.lift() }

  pub async fn remove_film(&self, id: FilmId) -> Result<()> {
    if !self.store.remove_film(id).await.lift()? {
      return Err(Error::not_found(Entity::Film, id));
    }
    self.catalog.remove(id);
    tracing::info!(film_id = id, "film removed");
    Ok(())
  }

  // ── Likes ─────────────────────────────────────────────────────────────

  pub async fn add_like(&self, film_id: FilmId, user_id: UserId) -> Result<()> {
    self.require_film(film_id).await?;
    self.require_user(user_id).await?;

    self.store.add_like(film_id, user_id).await.lift()?;
    self
      .record(user_id, film_id, EventType::Like, Operation::Add)
      .await?;
    tracing::info!(film_id, user_id, "like added");
    Ok(())
  }

  /// Withdraw a like. A like that was never added is `NotFound`.
  pub async fn remove_like(&self, film_id: FilmId, user_id: UserId) -> Result<()> {
    self.require_film(film_id).await?;
    self.require_user(user_id).await?;

    if !self.store.remove_like(film_id, user_id).await.lift()? {
      return Err(Error::not_found(Entity::Like, film_id));
    }
    self
      .record(user_id, film_id, EventType::Like, Operation::Remove)
      .await?;
    tracing::info!(film_id, user_id, "like removed");
    Ok(())
  }

  // ── Rankings ──────────────────────────────────────────────────────────

  /// The `count` most-liked films (default 10), optionally restricted to a
  /// genre and/or release year.
  pub async fn popular_films(
    &self,
    count: Option<usize>,
    genre_id: Option<GenreId>,
    year: Option<i32>,
  ) -> Result<Vec<Film>> {
    let count = resolve_count(count)?;
    if let Some(id) = genre_id {
      self.genre(id).await?;
    }
    self
      .store
      .popular_films(PopularQuery { count, genre_id, year })
      .await
      .lift()
  }

  /// A director's films, sorted by `year` (default) or `likes`.
  pub async fn director_films(
    &self,
    director_id: DirectorId,
    sort_by: Option<&str>,
  ) -> Result<Vec<Film>> {
    let sort = DirectorSort::parse(sort_by)?;
    self.director(director_id).await?;
    self
      .store
      .director_films(DirectorFilmsQuery { director_id, sort })
      .await
      .lift()
  }

  /// Films both users like, most popular first.
  pub async fn common_films(&self, user_id: UserId, friend_id: UserId) -> Result<Vec<Film>> {
    self.require_user(user_id).await?;
    self.require_user(friend_id).await?;
    self.store.common_films(user_id, friend_id).await.lift()
  }

  // ── Search ────────────────────────────────────────────────────────────

  /// Case-insensitive substring search over titles and/or director names.
  ///
  /// `by` is a comma-separated list of `title` and `director`; absent or
  /// empty means both. Matches are returned most-liked first.
  pub async fn search_films(&self, query: &str, by: Option<&str>) -> Result<Vec<Film>> {
    let fields = SearchField::parse_list(by)?;
    let ids = self.catalog.search(query, &fields);
    if ids.is_empty() {
      return Ok(Vec::new());
    }

    let mut films = self.store.films_by_ids(ids).await.lift()?;
    rank_by_likes(&mut films);
    Ok(films)
  }
}
