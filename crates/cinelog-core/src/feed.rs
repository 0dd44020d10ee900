//! Activity feed events.
//!
//! Events are append-only: once written they are never updated or deleted.
//! Insertion order is the event id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::user::UserId;

pub type EventId = i64;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString, Serialize,
  Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
  Like,
  Review,
  Friend,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString, Serialize,
  Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
  Add,
  Remove,
  Update,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEvent {
  pub event_id:   EventId,
  /// Server-assigned wall-clock time.
  #[serde(with = "chrono::serde::ts_milliseconds")]
  pub timestamp:  DateTime<Utc>,
  /// The acting user.
  pub user_id:    UserId,
  pub event_type: EventType,
  pub operation:  Operation,
  /// Film id for likes, review id for reviews, user id for friendships.
  pub entity_id:  i64,
}

/// Input to [`crate::store::CineStore::add_event`]. The id and timestamp are
/// assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewEvent {
  pub user_id:    UserId,
  pub entity_id:  i64,
  pub event_type: EventType,
  pub operation:  Operation,
}
