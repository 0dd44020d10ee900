//! In-memory search index over film titles and director names.
//!
//! The index holds a lowercase projection of every film. It is rebuilt
//! wholesale from storage at startup and patched on each film create, update
//! and delete. Director renames alone do not touch it.

use std::{
  collections::{BTreeSet, HashMap},
  sync::{PoisonError, RwLock},
};

use cinelog_core::{
  film::{Film, FilmId},
  query::SearchField,
};

/// The searchable projection of a [`Film`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CataloguedFilm {
  pub title:     String,
  pub directors: BTreeSet<String>,
}

impl From<&Film> for CataloguedFilm {
  fn from(film: &Film) -> Self {
    Self {
      title:     film.name.to_lowercase(),
      directors: film.directors.iter().map(|d| d.name.to_lowercase()).collect(),
    }
  }
}

impl CataloguedFilm {
  fn matches(&self, needle: &str, fields: &[SearchField]) -> bool {
    fields.iter().any(|field| match field {
      SearchField::Title => self.title.contains(needle),
      SearchField::Director => self.directors.iter().any(|d| d.contains(needle)),
    })
  }
}

/// Shared, internally synchronised film index.
///
/// Readers and writers never hold the lock across an `.await`.
#[derive(Debug, Default)]
pub struct CatalogIndex {
  entries: RwLock<HashMap<FilmId, CataloguedFilm>>,
}

impl CatalogIndex {
  /// Replace the whole index with `films`.
  pub fn rebuild(&self, films: &[Film]) {
    let fresh: HashMap<_, _> =
      films.iter().map(|f| (f.id, CataloguedFilm::from(f))).collect();
    *self.entries.write().unwrap_or_else(PoisonError::into_inner) = fresh;
  }

  /// Insert or replace the entry for `film`.
  pub fn upsert(&self, film: &Film) {
    self
      .entries
      .write()
      .unwrap_or_else(PoisonError::into_inner)
      .insert(film.id, CataloguedFilm::from(film));
  }

  pub fn remove(&self, id: FilmId) -> bool {
    self
      .entries
      .write()
      .unwrap_or_else(PoisonError::into_inner)
      .remove(&id)
      .is_some()
  }

  pub fn get(&self, id: FilmId) -> Option<CataloguedFilm> {
    self
      .entries
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .get(&id)
      .cloned()
  }

  pub fn len(&self) -> usize {
    self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }

  /// Ids of films whose selected fields contain `query`, case-insensitively.
  /// Returned in ascending id order.
  pub fn search(&self, query: &str, fields: &[SearchField]) -> Vec<FilmId> {
    let needle = query.to_lowercase();
    let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
    let mut ids: Vec<FilmId> = entries
      .iter()
      .filter(|(_, entry)| entry.matches(&needle, fields))
      .map(|(id, _)| *id)
      .collect();
    ids.sort_unstable();
    ids
  }
}
