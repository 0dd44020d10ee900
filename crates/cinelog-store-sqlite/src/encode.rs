//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Calendar dates are stored as `YYYY-MM-DD` text, feed timestamps as epoch
//! milliseconds, and fixed vocabularies as their `strum` string forms.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use cinelog_core::{
  feed::FeedEvent,
  film::{Director, Film, Genre, Mpa},
  review::Review,
  user::User,
};

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_ts(dt: DateTime<Utc>) -> i64 { dt.timestamp_millis() }

pub fn decode_ts(ms: i64) -> Result<DateTime<Utc>> {
  DateTime::from_timestamp_millis(ms)
    .ok_or_else(|| Error::DateParse(format!("timestamp out of range: {ms}")))
}

// ─── Vocabularies ────────────────────────────────────────────────────────────

/// Parse a `strum` string form read back from `column`.
pub fn decode_token<T: FromStr>(column: &'static str, s: &str) -> Result<T> {
  s.parse()
    .map_err(|_| Error::Decode { column, value: s.to_owned() })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// A `films` row joined with its MPA rating, like count and link tables.
pub struct RawFilm {
  pub film_id:      i64,
  pub name:         String,
  pub description:  String,
  pub release_date: String,
  pub duration:     i32,
  pub mpa_id:       Option<i64>,
  pub mpa_name:     Option<String>,
  pub likes:        i64,
  pub genres:       Vec<Genre>,
  pub directors:    Vec<Director>,
}

impl RawFilm {
  pub fn into_film(self) -> Result<Film> {
    let mpa = match (self.mpa_id, self.mpa_name) {
      (Some(id), Some(name)) => Some(Mpa { id, name }),
      _ => None,
    };
    Ok(Film {
      id: self.film_id,
      name: self.name,
      description: self.description,
      release_date: decode_date(&self.release_date)?,
      duration: self.duration,
      mpa,
      genres: self.genres,
      directors: self.directors,
      likes: u64::try_from(self.likes).unwrap_or_default(),
    })
  }
}

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub user_id:  i64,
  pub email:    String,
  pub login:    String,
  pub name:     String,
  pub birthday: String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:       self.user_id,
      email:    self.email,
      login:    self.login,
      name:     self.name,
      birthday: decode_date(&self.birthday)?,
    })
  }
}

/// A `reviews` row with its usefulness already aggregated by SQL. Nothing
/// needs decoding, so rows convert directly.
pub fn review_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Review> {
  Ok(Review {
    id:          row.get(0)?,
    content:     row.get(1)?,
    is_positive: row.get(2)?,
    user_id:     row.get(3)?,
    film_id:     row.get(4)?,
    useful:      row.get(5)?,
  })
}

/// Raw values read directly from a `feed_events` row.
pub struct RawEvent {
  pub event_id:   i64,
  pub timestamp:  i64,
  pub user_id:    i64,
  pub event_type: String,
  pub operation:  String,
  pub entity_id:  i64,
}

impl RawEvent {
  pub fn into_event(self) -> Result<FeedEvent> {
    Ok(FeedEvent {
      event_id:   self.event_id,
      timestamp:  decode_ts(self.timestamp)?,
      user_id:    self.user_id,
      event_type: decode_token("event_type", &self.event_type)?,
      operation:  decode_token("operation", &self.operation)?,
      entity_id:  self.entity_id,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn date_roundtrip_keeps_early_dates() {
    let d = NaiveDate::from_ymd_opt(1895, 12, 28).unwrap();
    assert_eq!(encode_date(d), "1895-12-28");
    assert_eq!(decode_date("1895-12-28").unwrap(), d);
  }

  #[test]
  fn bad_tokens_name_their_column() {
    let err = decode_token::<cinelog_core::feed::EventType>("event_type", "POKE")
      .unwrap_err();
    assert!(matches!(err, Error::Decode { column: "event_type", .. }));
  }
}
