//! Films and the reference data attached to them.
//!
//! Genres and MPA ratings are fixed vocabularies seeded by the store.
//! Directors are user-managed. A film refers to all three by id; the store
//! hydrates the references into full records on read.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type FilmId = i64;
pub type GenreId = i64;
pub type MpaId = i64;
pub type DirectorId = i64;

// ─── Reference data ──────────────────────────────────────────────────────────

/// A genre tag. Films and genres are many-to-many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
  pub id:   GenreId,
  pub name: String,
}

/// A content classification such as `PG-13`. At most one per film.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mpa {
  pub id:   MpaId,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Director {
  pub id:   DirectorId,
  pub name: String,
}

// ─── Film ────────────────────────────────────────────────────────────────────

/// A film as returned by the store, with references hydrated and the like
/// count computed at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Film {
  pub id:           FilmId,
  pub name:         String,
  pub description:  String,
  pub release_date: NaiveDate,
  /// Running time in minutes.
  pub duration:     i32,
  pub mpa:          Option<Mpa>,
  /// Ordered by genre id, without duplicates.
  pub genres:       Vec<Genre>,
  /// Ordered by director id, without duplicates.
  pub directors:    Vec<Director>,
  pub likes:        u64,
}

// ─── NewFilm ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::CineStore::add_film`] and
/// [`crate::store::CineStore::update_film`].
///
/// An update replaces every field wholesale, including the genre and director
/// sets. Duplicate ids in `genres` or `directors` are collapsed by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFilm {
  pub name:         String,
  #[serde(default)]
  pub description:  String,
  pub release_date: NaiveDate,
  pub duration:     i32,
  #[serde(default)]
  pub mpa:          Option<MpaId>,
  #[serde(default)]
  pub genres:       Vec<GenreId>,
  #[serde(default)]
  pub directors:    Vec<DirectorId>,
}

impl NewFilm {
  /// Convenience constructor with no MPA rating, genres, or directors.
  pub fn new(
    name: impl Into<String>,
    release_date: NaiveDate,
    duration: i32,
  ) -> Self {
    Self {
      name: name.into(),
      description: String::new(),
      release_date,
      duration,
      mpa: None,
      genres: Vec::new(),
      directors: Vec::new(),
    }
  }
}
