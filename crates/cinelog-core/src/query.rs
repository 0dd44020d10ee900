//! Query parameters accepted by ranked listings and catalogue search.
//!
//! Raw string tokens from callers are parsed here so that an unsupported
//! value becomes [`Error::IncorrectParameter`] before any store call.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{
  Error, Result,
  film::{DirectorId, GenreId},
};

/// Listing size used when a caller omits `count`.
pub const DEFAULT_COUNT: usize = 10;

/// Validate an optional caller-supplied `count`, applying the default.
pub fn resolve_count(count: Option<usize>) -> Result<usize> {
  match count {
    None => Ok(DEFAULT_COUNT),
    Some(0) => Err(Error::incorrect("count", 0)),
    Some(n) => Ok(n),
  }
}

// ─── Popularity ──────────────────────────────────────────────────────────────

/// Parameters for [`crate::store::CineStore::popular_films`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopularQuery {
  pub count:    usize,
  /// Only films tagged with this genre.
  pub genre_id: Option<GenreId>,
  /// Only films released in this calendar year.
  pub year:     Option<i32>,
}

impl Default for PopularQuery {
  fn default() -> Self {
    Self { count: DEFAULT_COUNT, genre_id: None, year: None }
  }
}

// ─── Director listing ────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Display, AsRefStr, EnumString,
  Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DirectorSort {
  /// Ascending release date.
  #[default]
  Year,
  /// Descending like count.
  Likes,
}

impl DirectorSort {
  pub fn parse(raw: Option<&str>) -> Result<Self> {
    match raw.map(str::trim) {
      None | Some("") => Ok(Self::default()),
      Some(token) => token
        .to_lowercase()
        .parse()
        .map_err(|_| Error::incorrect("sort_by", token)),
    }
  }
}

/// Parameters for [`crate::store::CineStore::director_films`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectorFilmsQuery {
  pub director_id: DirectorId,
  pub sort:        DirectorSort,
}

// ─── Search ──────────────────────────────────────────────────────────────────

/// A catalogue field that `search_films` can match against.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString,
  Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
  Title,
  Director,
}

impl SearchField {
  pub const ALL: [Self; 2] = [Self::Title, Self::Director];

  /// Parse a comma-separated `by` parameter. Absent or empty means both
  /// fields; any unknown token is an [`Error::IncorrectParameter`].
  pub fn parse_list(raw: Option<&str>) -> Result<Vec<Self>> {
    let mut fields = Vec::new();
    for token in raw.unwrap_or_default().split(',').map(str::trim) {
      if token.is_empty() {
        continue;
      }
      let field: Self = token
        .to_lowercase()
        .parse()
        .map_err(|_| Error::incorrect("by", token))?;
      if !fields.contains(&field) {
        fields.push(field);
      }
    }
    if fields.is_empty() {
      fields.extend(Self::ALL);
    }
    Ok(fields)
  }
}
