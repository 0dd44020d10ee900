//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! This is the only place that knows how domain failures map to HTTP status
//! codes.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<cinelog_core::Error> for ApiError {
  fn from(err: cinelog_core::Error) -> Self {
    use cinelog_core::Error as E;
    match err {
      E::NotFound { .. } => Self::NotFound(err.to_string()),
      E::InvalidField { .. } | E::IncorrectParameter { .. } => {
        Self::BadRequest(err.to_string())
      }
      E::Store(source) => Self::Store(source),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "request failed in store");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use cinelog_core::{Entity, Error};

  use super::*;

  #[test]
  fn domain_errors_map_to_status_classes() {
    let not_found: ApiError = Error::not_found(Entity::Film, 7).into();
    assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

    let invalid: ApiError = Error::invalid("name", "must not be blank").into();
    assert_eq!(invalid.into_response().status(), StatusCode::BAD_REQUEST);

    let incorrect: ApiError = Error::incorrect("by", "genre").into();
    assert_eq!(incorrect.into_response().status(), StatusCode::BAD_REQUEST);

    let store: ApiError = Error::Store("disk on fire".into()).into();
    assert_eq!(
      store.into_response().status(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }
}
