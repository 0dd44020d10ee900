//! [`SqliteStore`]: the SQLite implementation of [`CineStore`].

use std::path::Path;

use chrono::Utc;
use cinelog_core::{
  feed::{FeedEvent, NewEvent},
  film::{Director, DirectorId, Film, FilmId, Genre, GenreId, Mpa, MpaId, NewFilm},
  query::{DirectorFilmsQuery, DirectorSort, PopularQuery},
  review::{NewReview, Review, ReviewId, ReviewUpdate, VoteKind},
  social::{FriendshipStatus, RemovalPlan, plan_add, plan_removal},
  store::CineStore,
  user::{NewUser, User, UserId},
};
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{RawEvent, RawFilm, RawUser, decode_ts, encode_date, encode_ts},
  queries::{
    friend_status, insert_film_links, missing_reference, select_film, select_films,
    select_reviews, select_users,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Cinelog store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store. Used by tests and `store_path = ":memory:"`.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn films_where(
    &self,
    tail: &'static str,
    params: Vec<i64>,
  ) -> Result<Vec<Film>> {
    let raws: Vec<RawFilm> = self
      .conn
      .call(move |conn| {
        Ok(select_films(conn, tail, rusqlite::params_from_iter(params))?)
      })
      .await?;

    raws.into_iter().map(RawFilm::into_film).collect()
  }

  async fn users_where(
    &self,
    tail: &'static str,
    params: Vec<i64>,
  ) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(select_users(conn, tail, rusqlite::params_from_iter(params))?)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  /// Execute a single statement and report whether it touched any row.
  async fn execute_changed(
    &self,
    sql: &'static str,
    params: Vec<i64>,
  ) -> Result<bool> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(sql, rusqlite::params_from_iter(params))?)
      })
      .await?;
    Ok(changed > 0)
  }
}

/// Either the committed value or the dangling reference that aborted the
/// transaction.
type Checked<T> = std::result::Result<T, (cinelog_core::Entity, i64)>;

fn reference_error((entity, id): (cinelog_core::Entity, i64)) -> Error {
  Error::ReferenceNotFound { entity, id }
}

fn limit(count: usize) -> i64 { i64::try_from(count).unwrap_or(i64::MAX) }

// ─── CineStore impl ──────────────────────────────────────────────────────────

impl CineStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let name     = input.display_name().to_owned();
    let birthday = encode_date(input.birthday);

    let user_id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (email, login, name, birthday) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![input.email, input.login, name, birthday],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    self
      .get_user(user_id)
      .await?
      .ok_or_else(|| Error::Database(rusqlite::Error::QueryReturnedNoRows.into()))
  }

  async fn update_user(&self, id: UserId, input: NewUser) -> Result<Option<User>> {
    let name     = input.display_name().to_owned();
    let birthday = encode_date(input.birthday);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users SET email = ?1, login = ?2, name = ?3, birthday = ?4
           WHERE user_id = ?5",
          rusqlite::params![input.email, input.login, name, birthday, id],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_user(id).await
  }

  async fn get_user(&self, id: UserId) -> Result<Option<User>> {
    Ok(self.users_where("WHERE u.user_id = ?1", vec![id]).await?.pop())
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    self.users_where("ORDER BY u.user_id", vec![]).await
  }

  async fn remove_user(&self, id: UserId) -> Result<bool> {
    self
      .execute_changed("DELETE FROM users WHERE user_id = ?1", vec![id])
      .await
  }

  // ── Films ─────────────────────────────────────────────────────────────────

  async fn add_film(&self, input: NewFilm) -> Result<Film> {
    let outcome: Checked<RawFilm> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if let Some(missing) = missing_reference(&tx, &input)? {
          return Ok(Err(missing));
        }

        tx.execute(
          "INSERT INTO films (name, description, release_date, duration, mpa_id)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            input.name,
            input.description,
            encode_date(input.release_date),
            input.duration,
            input.mpa,
          ],
        )?;
        let film_id = tx.last_insert_rowid();
        insert_film_links(&tx, film_id, &input)?;

        let raw = select_film(&tx, film_id)?;
        tx.commit()?;
        Ok(Ok(raw))
      })
      .await?;

    outcome.map_err(reference_error)?.into_film()
  }

  async fn update_film(&self, id: FilmId, input: NewFilm) -> Result<Option<Film>> {
    let outcome: Checked<Option<RawFilm>> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if let Some(missing) = missing_reference(&tx, &input)? {
          return Ok(Err(missing));
        }

        let changed = tx.execute(
          "UPDATE films
           SET name = ?1, description = ?2, release_date = ?3, duration = ?4, mpa_id = ?5
           WHERE film_id = ?6",
          rusqlite::params![
            input.name,
            input.description,
            encode_date(input.release_date),
            input.duration,
            input.mpa,
            id,
          ],
        )?;
        if changed == 0 {
          return Ok(Ok(None));
        }

        tx.execute("DELETE FROM film_genres WHERE film_id = ?1", [id])?;
        tx.execute("DELETE FROM film_directors WHERE film_id = ?1", [id])?;
        insert_film_links(&tx, id, &input)?;

        let raw = select_film(&tx, id)?;
        tx.commit()?;
        Ok(Ok(Some(raw)))
      })
      .await?;

    outcome
      .map_err(reference_error)?
      .map(RawFilm::into_film)
      .transpose()
  }

  async fn get_film(&self, id: FilmId) -> Result<Option<Film>> {
    Ok(self.films_where("WHERE f.film_id = ?1", vec![id]).await?.pop())
  }

  async fn list_films(&self) -> Result<Vec<Film>> {
    self.films_where("ORDER BY f.film_id", vec![]).await
  }

  async fn films_by_ids(&self, ids: Vec<FilmId>) -> Result<Vec<Film>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }

    let raws: Vec<RawFilm> = self
      .conn
      .call(move |conn| {
        let placeholders = vec!["?"; ids.len()].join(", ");
        let tail = format!("WHERE f.film_id IN ({placeholders}) ORDER BY f.film_id");
        Ok(select_films(conn, &tail, rusqlite::params_from_iter(ids))?)
      })
      .await?;

    raws.into_iter().map(RawFilm::into_film).collect()
  }

  async fn remove_film(&self, id: FilmId) -> Result<bool> {
    self
      .execute_changed("DELETE FROM films WHERE film_id = ?1", vec![id])
      .await
  }

  // ── Reference data ────────────────────────────────────────────────────────

  async fn get_genre(&self, id: GenreId) -> Result<Option<Genre>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT genre_id, name FROM genres WHERE genre_id = ?1",
                [id],
                |row| Ok(Genre { id: row.get(0)?, name: row.get(1)? }),
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn list_genres(&self) -> Result<Vec<Genre>> {
    Ok(
      self
        .conn
        .call(|conn| {
          let mut stmt =
            conn.prepare("SELECT genre_id, name FROM genres ORDER BY genre_id")?;
          let rows = stmt
            .query_map([], |row| Ok(Genre { id: row.get(0)?, name: row.get(1)? }))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  async fn get_mpa(&self, id: MpaId) -> Result<Option<Mpa>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT mpa_id, name FROM mpa WHERE mpa_id = ?1",
                [id],
                |row| Ok(Mpa { id: row.get(0)?, name: row.get(1)? }),
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn list_mpa(&self) -> Result<Vec<Mpa>> {
    Ok(
      self
        .conn
        .call(|conn| {
          let mut stmt = conn.prepare("SELECT mpa_id, name FROM mpa ORDER BY mpa_id")?;
          let rows = stmt
            .query_map([], |row| Ok(Mpa { id: row.get(0)?, name: row.get(1)? }))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  async fn add_director(&self, name: String) -> Result<Director> {
    let stored = name.clone();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute("INSERT INTO directors (name) VALUES (?1)", [stored])?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(Director { id, name })
  }

  async fn update_director(&self, director: Director) -> Result<Option<Director>> {
    let Director { id, name } = director.clone();
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE directors SET name = ?1 WHERE director_id = ?2",
          rusqlite::params![name, id],
        )?)
      })
      .await?;
    Ok((changed > 0).then_some(director))
  }

  async fn get_director(&self, id: DirectorId) -> Result<Option<Director>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT director_id, name FROM directors WHERE director_id = ?1",
                [id],
                |row| Ok(Director { id: row.get(0)?, name: row.get(1)? }),
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn list_directors(&self) -> Result<Vec<Director>> {
    Ok(
      self
        .conn
        .call(|conn| {
          let mut stmt = conn
            .prepare("SELECT director_id, name FROM directors ORDER BY director_id")?;
          let rows = stmt
            .query_map([], |row| Ok(Director { id: row.get(0)?, name: row.get(1)? }))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  async fn remove_director(&self, id: DirectorId) -> Result<bool> {
    self
      .execute_changed("DELETE FROM directors WHERE director_id = ?1", vec![id])
      .await
  }

  // ── Film likes and rankings ───────────────────────────────────────────────

  async fn add_like(&self, film_id: FilmId, user_id: UserId) -> Result<()> {
    self
      .execute_changed(
        "INSERT OR IGNORE INTO film_likes (film_id, user_id) VALUES (?1, ?2)",
        vec![film_id, user_id],
      )
      .await?;
    Ok(())
  }

  async fn remove_like(&self, film_id: FilmId, user_id: UserId) -> Result<bool> {
    self
      .execute_changed(
        "DELETE FROM film_likes WHERE film_id = ?1 AND user_id = ?2",
        vec![film_id, user_id],
      )
      .await
  }

  async fn popular_films(&self, query: PopularQuery) -> Result<Vec<Film>> {
    let PopularQuery { count, genre_id, year } = query;

    let raws: Vec<RawFilm> = self
      .conn
      .call(move |conn| {
        Ok(select_films(
          conn,
          "WHERE (?1 IS NULL OR EXISTS (
                   SELECT 1 FROM film_genres g
                   WHERE g.film_id = f.film_id AND g.genre_id = ?1))
             AND (?2 IS NULL
                  OR CAST(strftime('%Y', f.release_date) AS INTEGER) = ?2)
           ORDER BY likes DESC, f.film_id ASC
           LIMIT ?3",
          rusqlite::params![genre_id, year, limit(count)],
        )?)
      })
      .await?;

    raws.into_iter().map(RawFilm::into_film).collect()
  }

  async fn director_films(&self, query: DirectorFilmsQuery) -> Result<Vec<Film>> {
    let tail = match query.sort {
      DirectorSort::Year => {
        "WHERE EXISTS (SELECT 1 FROM film_directors d
                       WHERE d.film_id = f.film_id AND d.director_id = ?1)
         ORDER BY f.release_date ASC, f.film_id ASC"
      }
      DirectorSort::Likes => {
        "WHERE EXISTS (SELECT 1 FROM film_directors d
                       WHERE d.film_id = f.film_id AND d.director_id = ?1)
         ORDER BY likes DESC, f.film_id ASC"
      }
    };
    self.films_where(tail, vec![query.director_id]).await
  }

  async fn common_films(&self, user_id: UserId, other_id: UserId) -> Result<Vec<Film>> {
    self
      .films_where(
        "WHERE f.film_id IN (
           SELECT a.film_id
           FROM film_likes a
           JOIN film_likes b ON b.film_id = a.film_id
           WHERE a.user_id = ?1 AND b.user_id = ?2)
         ORDER BY likes DESC, f.film_id ASC",
        vec![user_id, other_id],
      )
      .await
  }

  async fn recommended_films(&self, user_id: UserId) -> Result<Vec<Film>> {
    // Stage one: users sharing any like with ?1 (self-join on film_id).
    // Stage two: their likes minus ?1's own (left anti-join).
    self
      .films_where(
        "WHERE f.film_id IN (
           SELECT l.film_id
           FROM film_likes l
           JOIN (SELECT DISTINCT other.user_id
                 FROM film_likes mine
                 JOIN film_likes other
                   ON other.film_id = mine.film_id AND other.user_id != mine.user_id
                 WHERE mine.user_id = ?1) similar
             ON similar.user_id = l.user_id
           LEFT JOIN film_likes own
             ON own.film_id = l.film_id AND own.user_id = ?1
           WHERE own.film_id IS NULL)
         ORDER BY f.film_id ASC",
        vec![user_id],
      )
      .await
  }

  // ── Friendship ────────────────────────────────────────────────────────────

  async fn add_friend(&self, user_id: UserId, friend_id: UserId) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let plan = plan_add(friend_status(&tx, friend_id, user_id)?);

        tx.execute(
          "INSERT INTO friendships (user_id, friend_id, status) VALUES (?1, ?2, ?3)
           ON CONFLICT (user_id, friend_id) DO UPDATE SET status = excluded.status",
          rusqlite::params![user_id, friend_id, plan.own.as_ref()],
        )?;
        if let Some(status) = plan.reciprocal {
          tx.execute(
            "INSERT OR IGNORE INTO friendships (user_id, friend_id, status)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![friend_id, user_id, status.as_ref()],
          )?;
        }

        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn remove_friend(&self, user_id: UserId, friend_id: UserId) -> Result<bool> {
    let plan = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let plan = plan_removal(
          friend_status(&tx, user_id, friend_id)?,
          friend_status(&tx, friend_id, user_id)?,
        );

        match plan {
          RemovalPlan::NotRemoved => {}
          RemovalPlan::DemoteOwn => {
            tx.execute(
              "UPDATE friendships SET status = ?3 WHERE user_id = ?1 AND friend_id = ?2",
              rusqlite::params![user_id, friend_id, FriendshipStatus::Pending.as_ref()],
            )?;
          }
          RemovalPlan::DeleteBoth => {
            tx.execute(
              "DELETE FROM friendships
               WHERE (user_id = ?1 AND friend_id = ?2)
                  OR (user_id = ?2 AND friend_id = ?1)",
              [user_id, friend_id],
            )?;
          }
        }

        tx.commit()?;
        Ok(plan)
      })
      .await?;
    Ok(plan.removed())
  }

  async fn friends(&self, user_id: UserId) -> Result<Vec<User>> {
    self
      .users_where(
        "JOIN friendships fr ON fr.friend_id = u.user_id
         WHERE fr.user_id = ?1 AND fr.status = 'confirmed'
         ORDER BY u.user_id",
        vec![user_id],
      )
      .await
  }

  async fn common_friends(&self, user_id: UserId, other_id: UserId) -> Result<Vec<User>> {
    // Multiset union of both confirmed target lists; a target seen twice is
    // common to both users.
    self
      .users_where(
        "WHERE u.user_id IN (
           SELECT friend_id FROM (
             SELECT friend_id FROM friendships
             WHERE user_id = ?1 AND status = 'confirmed'
             UNION ALL
             SELECT friend_id FROM friendships
             WHERE user_id = ?2 AND status = 'confirmed')
           GROUP BY friend_id
           HAVING COUNT(*) > 1)
         ORDER BY u.user_id",
        vec![user_id, other_id],
      )
      .await
  }

  // ── Reviews ───────────────────────────────────────────────────────────────

  async fn add_review(&self, input: NewReview) -> Result<Review> {
    Ok(
      self
        .conn
        .call(move |conn| {
          conn.execute(
            "INSERT INTO reviews (film_id, user_id, content, is_positive)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
              input.film_id,
              input.user_id,
              input.content,
              input.is_positive,
            ],
          )?;
          let id = conn.last_insert_rowid();
          select_reviews(conn, "WHERE r.review_id = ?1", [id])?
            .pop()
            .ok_or_else(|| rusqlite::Error::QueryReturnedNoRows.into())
        })
        .await?,
    )
  }

  async fn update_review(&self, id: ReviewId, input: ReviewUpdate) -> Result<Option<Review>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          let changed = conn.execute(
            "UPDATE reviews SET content = ?1, is_positive = ?2 WHERE review_id = ?3",
            rusqlite::params![input.content, input.is_positive, id],
          )?;
          if changed == 0 {
            return Ok(None);
          }
          Ok(select_reviews(conn, "WHERE r.review_id = ?1", [id])?.pop())
        })
        .await?,
    )
  }

  async fn get_review(&self, id: ReviewId) -> Result<Option<Review>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(select_reviews(conn, "WHERE r.review_id = ?1", [id])?.pop())
        })
        .await?,
    )
  }

  async fn remove_review(&self, id: ReviewId) -> Result<bool> {
    self
      .execute_changed("DELETE FROM reviews WHERE review_id = ?1", vec![id])
      .await
  }

  async fn list_reviews(&self, film_id: Option<FilmId>, count: usize) -> Result<Vec<Review>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(select_reviews(
            conn,
            "WHERE ?1 IS NULL OR r.film_id = ?1
             ORDER BY useful DESC, r.review_id ASC
             LIMIT ?2",
            rusqlite::params![film_id, limit(count)],
          )?)
        })
        .await?,
    )
  }

  async fn add_review_vote(
    &self,
    review_id: ReviewId,
    user_id: UserId,
    kind: VoteKind,
  ) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO review_votes (review_id, user_id, kind)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![review_id, user_id, kind.as_ref()],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn remove_review_vote(
    &self,
    review_id: ReviewId,
    user_id: UserId,
    kind: VoteKind,
  ) -> Result<bool> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM review_votes
           WHERE review_id = ?1 AND user_id = ?2 AND kind = ?3",
          rusqlite::params![review_id, user_id, kind.as_ref()],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  // ── Feed ──────────────────────────────────────────────────────────────────

  async fn add_event(&self, event: NewEvent) -> Result<FeedEvent> {
    // Round-trip through the stored precision so the returned event equals
    // what a later read produces.
    let stamp     = encode_ts(Utc::now());
    let timestamp = decode_ts(stamp)?;

    let event_id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO feed_events (timestamp, user_id, event_type, operation, entity_id)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            stamp,
            event.user_id,
            event.event_type.as_ref(),
            event.operation.as_ref(),
            event.entity_id,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(FeedEvent {
      event_id,
      timestamp,
      user_id: event.user_id,
      event_type: event.event_type,
      operation: event.operation,
      entity_id: event.entity_id,
    })
  }

  async fn user_feed(&self, user_id: UserId) -> Result<Vec<FeedEvent>> {
    let raws: Vec<RawEvent> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT event_id, timestamp, user_id, event_type, operation, entity_id
           FROM feed_events
           WHERE user_id = ?1
           ORDER BY event_id ASC",
        )?;
        let rows = stmt
          .query_map([user_id], |row| {
            Ok(RawEvent {
              event_id:   row.get(0)?,
              timestamp:  row.get(1)?,
              user_id:    row.get(2)?,
              event_type: row.get(3)?,
              operation:  row.get(4)?,
              entity_id:  row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEvent::into_event).collect()
  }
}
