//! Genres, MPA ratings and directors.

use cinelog_core::{
  Entity, Error, Result,
  film::{Director, DirectorId, Genre, GenreId, Mpa, MpaId},
  store::CineStore,
  validate,
};

use crate::{Service, StoreResultExt as _};

impl<S: CineStore> Service<S> {
  pub async fn genres(&self) -> Result<Vec<Genre>> { self.store.list_genres().await.lift() }

  pub async fn genre(&self, id: GenreId) -> Result<Genre> {
    self
      .store
      .get_genre(id)
      .await
      .lift()?
      .ok_or_else(|| Error::not_found(Entity::Genre, id))
  }

  pub async fn mpa_ratings(&self) -> Result<Vec<Mpa>> { self.store.list_mpa().await.lift() }

  pub async fn mpa(&self, id: MpaId) -> Result<Mpa> {
    self
      .store
      .get_mpa(id)
      .await
      .lift()?
      .ok_or_else(|| Error::not_found(Entity::Mpa, id))
  }

  pub async fn directors(&self) -> Result<Vec<Director>> {
    self.store.list_directors().await.lift()
  }

  pub async fn director(&self, id: DirectorId) -> Result<Director> {
    self
      .store
      .get_director(id)
      .await
      .lift()?
      .ok_or_else(|| Error::not_found(Entity::Director, id))
  }

  pub async fn create_director(&self, name: String) -> Result<Director> {
    validate::director_name(&name)?;
    let director = self.store.add_director(name).await.lift()?;
    tracing::info!(director_id = director.id, "director created");
    Ok(director)
  }

  /// Rename a director. Catalogue entries of existing films keep the old name
  /// until each film is next updated.
  pub async fn update_director(&self, director: Director) -> Result<Director> {
    validate::director_name(&director.name)?;
    let id = director.id;
    self
      .store
      .update_director(director)
      .await
      .lift()?
      .ok_or_else(|| Error::not_found(Entity::Director, id))
  }

  pub async fn remove_director(&self, id: DirectorId) -> Result<()> {
    if !self.store.remove_director(id).await.lift()? {
      return Err(Error::not_found(Entity::Director, id));
    }
    tracing::info!(director_id = id, "director removed");
    Ok(())
  }
}
