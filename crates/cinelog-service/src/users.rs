//! Users, the friendship graph and film recommendations.

use cinelog_core::{
  Entity, Error, Result,
  feed::{EventType, Operation},
  film::Film,
  store::CineStore,
  user::{NewUser, User, UserId},
  validate,
};

use crate::{Service, StoreResultExt as _};

impl<S: CineStore> Service<S> {
  // ── Users ─────────────────────────────────────────────────────────────

  pub async fn create_user(&self, input: NewUser) -> Result<User> {
    validate::user(&input)?;
    let user = self.store.add_user(input).await.lift()?;
    tracing::info!(user_id = user.id, login = %user.login, "user created");
    Ok(user)
  }

  pub async fn update_user(&self, id: UserId, input: NewUser) -> Result<User> {
    validate::user(&input)?;
    let user = self
      .store
      .update_user(id, input)
      .await
      .lift()?
      .ok_or_else(|| Error::not_found(Entity::User, id))?;
    tracing::info!(user_id = id, "user updated");
    Ok(user)
  }

  pub async fn user(&self, id: UserId) -> Result<User> { self.require_user(id).await }

  pub async fn users(&self) -> Result<Vec<User>> { self.store.list_users().await.lift() }

  pub async fn remove_user(&self, id: UserId) -> Result<()> {
    if !self.store.remove_user(id).await.lift()? {
      return Err(Error::not_found(Entity::User, id));
    }
    tracing::info!(user_id = id, "user removed");
    Ok(())
  }

  // ── Friendship ────────────────────────────────────────────────────────

  /// Befriend `friend_id` on behalf of `user_id`. Repeating the call is
  /// harmless and records another FRIEND/ADD event.
  pub async fn add_friend(&self, user_id: UserId, friend_id: UserId) -> Result<()> {
    self.require_user(user_id).await?;
    self.require_user(friend_id).await?;
    if user_id == friend_id {
      return Err(Error::invalid("friend_id", "a user cannot befriend themselves"));
    }

    self.store.add_friend(user_id, friend_id).await.lift()?;
    self
      .record(user_id, friend_id, EventType::Friend, Operation::Add)
      .await?;
    tracing::info!(user_id, friend_id, "friend added");
    Ok(())
  }

  /// Withdraw `user_id`'s side of a friendship.
  ///
  /// Returns `Ok(false)` without recording an event when `user_id` has no
  /// confirmed edge toward `friend_id`.
  pub async fn remove_friend(&self, user_id: UserId, friend_id: UserId) -> Result<bool> {
    self.require_user(user_id).await?;
    self.require_user(friend_id).await?;

    if !self.store.remove_friend(user_id, friend_id).await.lift()? {
      tracing::debug!(user_id, friend_id, "friend not removed: no confirmed edge");
      return Ok(false);
    }

    self
      .record(user_id, friend_id, EventType::Friend, Operation::Remove)
      .await?;
    tracing::info!(user_id, friend_id, "friend removed");
    Ok(true)
  }

  pub async fn friends(&self, user_id: UserId) -> Result<Vec<User>> {
    self.require_user(user_id).await?;
    self.store.friends(user_id).await.lift()
  }

  pub async fn common_friends(&self, user_id: UserId, other_id: UserId) -> Result<Vec<User>> {
    self.require_user(user_id).await?;
    self.require_user(other_id).await?;
    self.store.common_friends(user_id, other_id).await.lift()
  }

  // ── Recommendations ───────────────────────────────────────────────────

  /// Films liked by users with overlapping taste, minus films `user_id`
  /// already likes. No ranking beyond set membership.
  pub async fn recommendations(&self, user_id: UserId) -> Result<Vec<Film>> {
    self.require_user(user_id).await?;
    self.store.recommended_films(user_id).await.lift()
  }
}
