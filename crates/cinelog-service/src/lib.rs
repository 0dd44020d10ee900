//! The Cinelog service layer.
//!
//! [`Service`] validates input, calls a [`CineStore`], combines the results
//! (rankings, recommendations, search) and appends activity-feed events as a
//! side effect of like, friend and review mutations. It is generic over the
//! store so the same rules run against any backend.

pub mod catalog;

mod feed;
mod films;
mod reference;
mod reviews;
mod users;

use std::sync::Arc;

use cinelog_core::{
  Entity, Error, Result,
  film::{Film, FilmId},
  review::{Review, ReviewId},
  store::CineStore,
  user::{User, UserId},
};

pub use catalog::CatalogIndex;

/// Lift a backend result into the core error type.
trait StoreResultExt<T> {
  fn lift(self) -> Result<T>;
}

impl<T, E: Into<Error>> StoreResultExt<T> for std::result::Result<T, E> {
  fn lift(self) -> Result<T> { self.map_err(Into::into) }
}

/// Entry point for every operation the HTTP layer exposes.
pub struct Service<S> {
  store:   Arc<S>,
  catalog: CatalogIndex,
}

impl<S: CineStore> Service<S> {
  /// Build a service over `store` and populate the catalogue index from it.
  pub async fn open(store: Arc<S>) -> Result<Self> {
    let service = Self { store, catalog: CatalogIndex::default() };
    service.rebuild_catalog().await?;
    Ok(service)
  }

  pub fn store(&self) -> &S { &self.store }

  pub fn catalog(&self) -> &CatalogIndex { &self.catalog }

  /// Reload every film into the catalogue index. Returns the entry count.
  pub async fn rebuild_catalog(&self) -> Result<usize> {
    let films = self.store.list_films().await.lift()?;
    self.catalog.rebuild(&films);
    tracing::debug!(films = films.len(), "catalogue index rebuilt");
    Ok(films.len())
  }

  // ── Existence guards ──────────────────────────────────────────────────
  //
  // Run before any mutation so a missing id never partially applies one.

  async fn require_user(&self, id: UserId) -> Result<User> {
    self
      .store
      .get_user(id)
      .await
      .lift()?
      .ok_or_else(|| Error::not_found(Entity::User, id))
  }

  async fn require_film(&self, id: FilmId) -> Result<Film> {
    self
      .store
      .get_film(id)
      .await
      .lift()?
      .ok_or_else(|| Error::not_found(Entity::Film, id))
  }

  async fn require_review(&self, id: ReviewId) -> Result<Review> {
    self
      .store
      .get_review(id)
      .await
      .lift()?
      .ok_or_else(|| Error::not_found(Entity::Review, id))
  }
}

#[cfg(test)]
mod tests;
