//! The `CineStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `cinelog-store-sqlite`).
//! Higher layers (`cinelog-service`, `cinelog-api`) depend on this
//! abstraction, not on any concrete backend.
//!
//! Lookups by id return `Ok(None)` and removals return `Ok(false)` for a
//! missing record; the service turns those into [`crate::Error::NotFound`].
//! Writes that reference other records (a film's genres, MPA rating and
//! directors) must fail with `NotFound` when a reference is dangling, never
//! with an opaque error.

use std::future::Future;

use crate::{
  feed::{FeedEvent, NewEvent},
  film::{Director, DirectorId, Film, FilmId, Genre, GenreId, Mpa, MpaId, NewFilm},
  query::{DirectorFilmsQuery, PopularQuery},
  review::{NewReview, Review, ReviewId, ReviewUpdate, VoteKind},
  user::{NewUser, User, UserId},
};

/// Abstraction over a Cinelog storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CineStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. The store assigns the id and resolves the display
  /// name via [`NewUser::display_name`].
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Replace every field of an existing user. Returns `None` if not found.
  fn update_user(
    &self,
    id: UserId,
    input: NewUser,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Delete a user together with their likes, friendship edges, reviews and
  /// votes. Feed events the user recorded are kept.
  fn remove_user(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Films ─────────────────────────────────────────────────────────────

  /// Persist a film with its genre, director and MPA links atomically.
  fn add_film(
    &self,
    input: NewFilm,
  ) -> impl Future<Output = Result<Film, Self::Error>> + Send + '_;

  /// Replace a film wholesale, links included. Returns `None` if not found.
  fn update_film(
    &self,
    id: FilmId,
    input: NewFilm,
  ) -> impl Future<Output = Result<Option<Film>, Self::Error>> + Send + '_;

  fn get_film(
    &self,
    id: FilmId,
  ) -> impl Future<Output = Result<Option<Film>, Self::Error>> + Send + '_;

  /// All films in id order.
  fn list_films(
    &self,
  ) -> impl Future<Output = Result<Vec<Film>, Self::Error>> + Send + '_;

  /// Hydrate the given ids. Unknown ids are skipped; order is by id.
  fn films_by_ids(
    &self,
    ids: Vec<FilmId>,
  ) -> impl Future<Output = Result<Vec<Film>, Self::Error>> + Send + '_;

  fn remove_film(
    &self,
    id: FilmId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Reference data ────────────────────────────────────────────────────

  fn get_genre(
    &self,
    id: GenreId,
  ) -> impl Future<Output = Result<Option<Genre>, Self::Error>> + Send + '_;

  fn list_genres(
    &self,
  ) -> impl Future<Output = Result<Vec<Genre>, Self::Error>> + Send + '_;

  fn get_mpa(
    &self,
    id: MpaId,
  ) -> impl Future<Output = Result<Option<Mpa>, Self::Error>> + Send + '_;

  fn list_mpa(
    &self,
  ) -> impl Future<Output = Result<Vec<Mpa>, Self::Error>> + Send + '_;

  fn add_director(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Director, Self::Error>> + Send + '_;

  fn update_director(
    &self,
    director: Director,
  ) -> impl Future<Output = Result<Option<Director>, Self::Error>> + Send + '_;

  fn get_director(
    &self,
    id: DirectorId,
  ) -> impl Future<Output = Result<Option<Director>, Self::Error>> + Send + '_;

  fn list_directors(
    &self,
  ) -> impl Future<Output = Result<Vec<Director>, Self::Error>> + Send + '_;

  fn remove_director(
    &self,
    id: DirectorId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Film likes and rankings ───────────────────────────────────────────

  /// Record that `user_id` likes `film_id`. Repeating a like is a no-op.
  fn add_like(
    &self,
    film_id: FilmId,
    user_id: UserId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Returns `false` if the like did not exist.
  fn remove_like(
    &self,
    film_id: FilmId,
    user_id: UserId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Films by descending like count, ties by ascending id, truncated to
  /// `query.count`, optionally restricted to a genre and/or release year.
  fn popular_films(
    &self,
    query: PopularQuery,
  ) -> impl Future<Output = Result<Vec<Film>, Self::Error>> + Send + '_;

  fn director_films(
    &self,
    query: DirectorFilmsQuery,
  ) -> impl Future<Output = Result<Vec<Film>, Self::Error>> + Send + '_;

  /// Films liked by both users, by descending like count.
  fn common_films(
    &self,
    user_id: UserId,
    other_id: UserId,
  ) -> impl Future<Output = Result<Vec<Film>, Self::Error>> + Send + '_;

  /// Films liked by users who share at least one like with `user_id`,
  /// excluding films `user_id` already likes.
  fn recommended_films(
    &self,
    user_id: UserId,
  ) -> impl Future<Output = Result<Vec<Film>, Self::Error>> + Send + '_;

  // ── Friendship ────────────────────────────────────────────────────────

  /// Apply [`crate::social::plan_add`] atomically.
  fn add_friend(
    &self,
    user_id: UserId,
    friend_id: UserId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Apply [`crate::social::plan_removal`] atomically. Returns whether
  /// anything was removed.
  fn remove_friend(
    &self,
    user_id: UserId,
    friend_id: UserId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Users reachable over `user_id`'s confirmed outgoing edges.
  fn friends(
    &self,
    user_id: UserId,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Users that are confirmed targets of both `user_id` and `other_id`.
  fn common_friends(
    &self,
    user_id: UserId,
    other_id: UserId,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  // ── Reviews ───────────────────────────────────────────────────────────

  fn add_review(
    &self,
    input: NewReview,
  ) -> impl Future<Output = Result<Review, Self::Error>> + Send + '_;

  fn update_review(
    &self,
    id: ReviewId,
    input: ReviewUpdate,
  ) -> impl Future<Output = Result<Option<Review>, Self::Error>> + Send + '_;

  fn get_review(
    &self,
    id: ReviewId,
  ) -> impl Future<Output = Result<Option<Review>, Self::Error>> + Send + '_;

  fn remove_review(
    &self,
    id: ReviewId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Reviews by descending usefulness, ties by ascending id, for one film or
  /// across all films.
  fn list_reviews(
    &self,
    film_id: Option<FilmId>,
    count: usize,
  ) -> impl Future<Output = Result<Vec<Review>, Self::Error>> + Send + '_;

  /// Cast a vote. Repeating the same vote is a no-op.
  fn add_review_vote(
    &self,
    review_id: ReviewId,
    user_id: UserId,
    kind: VoteKind,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Returns `false` if no such vote existed.
  fn remove_review_vote(
    &self,
    review_id: ReviewId,
    user_id: UserId,
    kind: VoteKind,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Feed ──────────────────────────────────────────────────────────────

  /// Append an event. The store assigns the id and timestamp.
  fn add_event(
    &self,
    event: NewEvent,
  ) -> impl Future<Output = Result<FeedEvent, Self::Error>> + Send + '_;

  /// Events whose acting user is `user_id`, in insertion order.
  fn user_feed(
    &self,
    user_id: UserId,
  ) -> impl Future<Output = Result<Vec<FeedEvent>, Self::Error>> + Send + '_;
}
