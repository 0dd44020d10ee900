//! Error type for `cinelog-store-sqlite`.

use cinelog_core::Entity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown {column} value: {value:?}")]
  Decode { column: &'static str, value: String },

  /// A film write referenced a genre, MPA rating or director that does not
  /// exist.
  #[error("{entity} {id} not found")]
  ReferenceNotFound { entity: Entity, id: i64 },
}

impl From<Error> for cinelog_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::ReferenceNotFound { entity, id } => Self::NotFound { entity, id },
      other => Self::Store(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
