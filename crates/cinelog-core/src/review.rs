//! Film reviews and their usefulness votes.
//!
//! A review's `useful` score is never stored. It is derived from the vote
//! table as `count(likes) - count(dislikes)` every time a review is read.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{error::Entity, film::FilmId, user::UserId};

pub type ReviewId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
  pub id:          ReviewId,
  pub content:     String,
  pub is_positive: bool,
  pub user_id:     UserId,
  pub film_id:     FilmId,
  pub useful:      i64,
}

/// Input to [`crate::store::CineStore::add_review`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReview {
  pub content:     String,
  pub is_positive: bool,
  pub user_id:     UserId,
  pub film_id:     FilmId,
}

/// The mutable part of a review. Author and film never change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewUpdate {
  pub content:     String,
  pub is_positive: bool,
}

/// A usefulness vote. Likes and dislikes are separate sets: one user may hold
/// both on the same review at once.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString,
  Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
  Like,
  Dislike,
}

impl VoteKind {
  /// The entity named when removing a vote that was never cast.
  pub fn entity(self) -> Entity {
    match self {
      Self::Like => Entity::ReviewLike,
      Self::Dislike => Entity::ReviewDislike,
    }
  }
}
