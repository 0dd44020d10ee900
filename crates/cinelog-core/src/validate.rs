//! Structural field checks run before any store call.
//!
//! Every check returns [`Error::InvalidField`] naming the offending field.

use chrono::{NaiveDate, Utc};

use crate::{
  Error, Result,
  film::NewFilm,
  review::{NewReview, ReviewUpdate},
  user::NewUser,
};

pub const MAX_DESCRIPTION_CHARS: usize = 200;
pub const MAX_REVIEW_CHARS: usize = 5000;

/// The earliest accepted release date: the first public film screening.
pub fn earliest_release_date() -> NaiveDate {
  NaiveDate::from_ymd_opt(1895, 12, 28).expect("valid calendar date")
}

pub fn film(input: &NewFilm) -> Result<()> {
  if input.name.trim().is_empty() {
    return Err(Error::invalid("name", "must not be blank"));
  }
  if input.description.chars().count() > MAX_DESCRIPTION_CHARS {
    return Err(Error::invalid(
      "description",
      format!("must be at most {MAX_DESCRIPTION_CHARS} characters"),
    ));
  }
  if input.release_date < earliest_release_date() {
    return Err(Error::invalid(
      "release_date",
      format!("must not be before {}", earliest_release_date()),
    ));
  }
  if input.duration <= 0 {
    return Err(Error::invalid("duration", "must be positive"));
  }
  Ok(())
}

pub fn user(input: &NewUser) -> Result<()> {
  let email = input.email.trim();
  if email.is_empty() || !email.contains('@') {
    return Err(Error::invalid("email", "must be an email address"));
  }
  if input.login.is_empty() || input.login.chars().any(char::is_whitespace) {
    return Err(Error::invalid("login", "must be non-empty without whitespace"));
  }
  if input.birthday > Utc::now().date_naive() {
    return Err(Error::invalid("birthday", "must not be in the future"));
  }
  Ok(())
}

pub fn review(input: &NewReview) -> Result<()> { review_content(&input.content) }

pub fn review_update(input: &ReviewUpdate) -> Result<()> {
  review_content(&input.content)
}

fn review_content(content: &str) -> Result<()> {
  if content.trim().is_empty() {
    return Err(Error::invalid("content", "must not be blank"));
  }
  if content.chars().count() > MAX_REVIEW_CHARS {
    return Err(Error::invalid(
      "content",
      format!("must be at most {MAX_REVIEW_CHARS} characters"),
    ));
  }
  Ok(())
}

pub fn director_name(name: &str) -> Result<()> {
  if name.trim().is_empty() {
    return Err(Error::invalid("name", "must not be blank"));
  }
  Ok(())
}
