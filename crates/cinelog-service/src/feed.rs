//! Activity feed: append on mutation, read per user.

use cinelog_core::{
  Result,
  feed::{EventType, FeedEvent, NewEvent, Operation},
  store::CineStore,
  user::UserId,
};

use crate::{Service, StoreResultExt as _};

impl<S: CineStore> Service<S> {
  /// Append an event. Callers have already validated the actors; the stored
  /// event is not returned.
  pub(crate) async fn record(
    &self,
    user_id: UserId,
    entity_id: i64,
    event_type: EventType,
    operation: Operation,
  ) -> Result<()> {
    let event = self
      .store
      .add_event(NewEvent { user_id, entity_id, event_type, operation })
      .await
      .lift()?;
    tracing::debug!(
      event_id = event.event_id,
      user_id,
      entity_id,
      %event_type,
      %operation,
      "feed event recorded"
    );
    Ok(())
  }

  /// Every event the user performed, oldest first.
  pub async fn user_feed(&self, user_id: UserId) -> Result<Vec<FeedEvent>> {
    self.require_user(user_id).await?;
    self.store.user_feed(user_id).await.lift()
  }
}
