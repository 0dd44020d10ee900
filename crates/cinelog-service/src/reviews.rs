//! Reviews and the usefulness ledger.
//!
//! Vote removal is strict: withdrawing a vote that was never cast is
//! `NotFound`. Friendship removal, by contrast, is a silent no-op.

use cinelog_core::{
  Entity, Error, Result,
  feed::{EventType, Operation},
  film::FilmId,
  query::resolve_count,
  review::{NewReview, Review, ReviewId, ReviewUpdate, VoteKind},
  store::CineStore,
  user::UserId,
  validate,
};

use crate::{Service, StoreResultExt as _};

impl<S: CineStore> Service<S> {
  pub async fn create_review(&self, input: NewReview) -> Result<Review> {
    validate::review(&input)?;
    self.require_user(input.user_id).await?;
    self.require_film(input.film_id).await?;

    let review = self.store.add_review(input).await.lift()?;
    self
      .record(review.user_id, review.id, EventType::Review, Operation::Add)
      .await?;
    tracing::info!(review_id = review.id, film_id = review.film_id, "review created");
    Ok(review)
  }

  /// Replace a review's content and polarity. The event is attributed to the
  /// stored author.
  pub async fn update_review(&self, id: ReviewId, input: ReviewUpdate) -> Result<Review> {
    validate::review_update(&input)?;
    let existing = self.require_review(id).await?;

    let review = self
      .store
      .update_review(id, input)
      .await
      .lift()?
      .ok_or_else(|| Error::not_found(Entity::Review, id))?;
    self
      .record(existing.user_id, id, EventType::Review, Operation::Update)
      .await?;
    tracing::info!(review_id = id, "review updated");
    Ok(review)
  }

  pub async fn review(&self, id: ReviewId) -> Result<Review> { self.require_review(id).await }

  pub async fn remove_review(&self, id: ReviewId) -> Result<()> {
    let existing = self.require_review(id).await?;
    if !self.store.remove_review(id).await.lift()? {
      return Err(Error::not_found(Entity::Review, id));
    }
    self
      .record(existing.user_id, id, EventType::Review, Operation::Remove)
      .await?;
    tracing::info!(review_id = id, "review removed");
    Ok(())
  }

  /// The `count` most useful reviews (default 10), for one film or all.
  pub async fn reviews(&self, film_id: Option<FilmId>, count: Option<usize>) -> Result<Vec<Review>> {
    let count = resolve_count(count)?;
    self.store.list_reviews(film_id, count).await.lift()
  }

  // ── Votes ─────────────────────────────────────────────────────────────

  pub async fn add_review_like(&self, review_id: ReviewId, user_id: UserId) -> Result<()> {
    self.vote(review_id, user_id, VoteKind::Like).await
  }

  pub async fn remove_review_like(&self, review_id: ReviewId, user_id: UserId) -> Result<()> {
    self.unvote(review_id, user_id, VoteKind::Like).await
  }

  pub async fn add_review_dislike(&self, review_id: ReviewId, user_id: UserId) -> Result<()> {
    self.vote(review_id, user_id, VoteKind::Dislike).await
  }

  pub async fn remove_review_dislike(&self, review_id: ReviewId, user_id: UserId) -> Result<()> {
    self.unvote(review_id, user_id, VoteKind::Dislike).await
  }

  async fn vote(&self, review_id: ReviewId, user_id: UserId, kind: VoteKind) -> Result<()> {
    self.require_review(review_id).await?;
    self.require_user(user_id).await?;
    self.store.add_review_vote(review_id, user_id, kind).await.lift()?;
    tracing::info!(review_id, user_id, %kind, "review vote cast");
    Ok(())
  }

  async fn unvote(&self, review_id: ReviewId, user_id: UserId, kind: VoteKind) -> Result<()> {
    self.require_review(review_id).await?;
    self.require_user(user_id).await?;
    if !self.store.remove_review_vote(review_id, user_id, kind).await.lift()? {
      return Err(Error::not_found(kind.entity(), review_id));
    }
    tracing::info!(review_id, user_id, %kind, "review vote withdrawn");
    Ok(())
  }
}
