//! Error types for `cinelog-core`.

use serde::Serialize;
use strum::{AsRefStr, Display};
use thiserror::Error;

/// The kind of record a [`Error::NotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Entity {
  Film,
  User,
  Review,
  Genre,
  Mpa,
  Director,
  Like,
  ReviewLike,
  ReviewDislike,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("{entity} {id} not found")]
  NotFound { entity: Entity, id: i64 },

  #[error("invalid {field}: {reason}")]
  InvalidField { field: &'static str, reason: String },

  #[error("incorrect parameter {name}: {value:?}")]
  IncorrectParameter { name: &'static str, value: String },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn not_found(entity: Entity, id: i64) -> Self {
    Self::NotFound { entity, id }
  }

  pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
    Self::InvalidField { field, reason: reason.into() }
  }

  pub fn incorrect(name: &'static str, value: impl ToString) -> Self {
    Self::IncorrectParameter { name, value: value.to_string() }
  }

  pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound { .. }) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
