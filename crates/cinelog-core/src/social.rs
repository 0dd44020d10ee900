//! Friendship edges and the rules that move them between states.
//!
//! Friendship is stored as directed edges. Asking to befriend someone writes
//! a `Confirmed` edge from the requester and a `Pending` edge back. Two users
//! are mutual friends only when both directions are `Confirmed`.
//!
//! The store applies the transitions computed here inside a single
//! transaction; the rules themselves live in this module so every backend
//! agrees on them.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::user::UserId;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString, Serialize,
  Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FriendshipStatus {
  Pending,
  Confirmed,
}

/// A single directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendEdge {
  pub user_id:   UserId,
  pub friend_id: UserId,
  pub status:    FriendshipStatus,
}

// ─── Adding ──────────────────────────────────────────────────────────────────

/// Edge writes required by `add_friend(user, friend)`.
///
/// The requester's edge always ends `Confirmed`. The reciprocal edge is only
/// created (as `Pending`) when absent; an existing reciprocal edge keeps its
/// status, which is how a second `add_friend` in the other direction turns a
/// one-way friendship into a mutual one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddPlan {
  pub own:        FriendshipStatus,
  pub reciprocal: Option<FriendshipStatus>,
}

pub fn plan_add(reciprocal: Option<FriendshipStatus>) -> AddPlan {
  AddPlan {
    own:        FriendshipStatus::Confirmed,
    reciprocal: match reciprocal {
      Some(_) => None,
      None => Some(FriendshipStatus::Pending),
    },
  }
}

// ─── Removing ────────────────────────────────────────────────────────────────

/// What `remove_friend(user, friend)` does to the two edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalPlan {
  /// No edge from the requester, or the requester's edge is still pending.
  /// Nothing changes and the caller reports "not removed" without an error.
  NotRemoved,
  /// The friendship was mutual: only the requester's edge drops back to
  /// `Pending`. The other side keeps its `Confirmed` edge.
  DemoteOwn,
  /// The friendship was one-way from the requester: both rows are deleted.
  DeleteBoth,
}

impl RemovalPlan {
  pub fn removed(self) -> bool { !matches!(self, Self::NotRemoved) }
}

pub fn plan_removal(
  own: Option<FriendshipStatus>,
  reciprocal: Option<FriendshipStatus>,
) -> RemovalPlan {
  match (own, reciprocal) {
    (None | Some(FriendshipStatus::Pending), _) => RemovalPlan::NotRemoved,
    (Some(FriendshipStatus::Confirmed), Some(FriendshipStatus::Confirmed)) => {
      RemovalPlan::DemoteOwn
    }
    (Some(FriendshipStatus::Confirmed), _) => RemovalPlan::DeleteBoth,
  }
}
