//! Registered users.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type UserId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:       UserId,
  pub email:    String,
  pub login:    String,
  /// Display name; equal to `login` when none was supplied.
  pub name:     String,
  pub birthday: NaiveDate,
}

/// Input to [`crate::store::CineStore::add_user`] and
/// [`crate::store::CineStore::update_user`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
  pub email:    String,
  pub login:    String,
  #[serde(default)]
  pub name:     Option<String>,
  pub birthday: NaiveDate,
}

impl NewUser {
  pub fn new(
    email: impl Into<String>,
    login: impl Into<String>,
    birthday: NaiveDate,
  ) -> Self {
    Self { email: email.into(), login: login.into(), name: None, birthday }
  }

  /// The name that will be stored: the supplied name, or the login when the
  /// name is absent or blank.
  pub fn display_name(&self) -> &str {
    match self.name.as_deref() {
      Some(n) if !n.trim().is_empty() => n,
      _ => &self.login,
    }
  }
}
