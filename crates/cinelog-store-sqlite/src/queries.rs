//! Synchronous query helpers run inside [`tokio_rusqlite::Connection::call`].
//!
//! Everything here takes a plain `&rusqlite::Connection` so the same helper
//! works on a connection or inside a transaction.

use cinelog_core::{
  Entity,
  film::{Director, FilmId, Genre, NewFilm},
  review::Review,
  social::FriendshipStatus,
  user::UserId,
};
use rusqlite::{Connection, OptionalExtension as _, Params, types::Type};

use crate::encode::{RawFilm, RawUser, review_from_row};

// ─── Films ───────────────────────────────────────────────────────────────────

/// Film columns plus the MPA name and the like count. Callers append a
/// `WHERE`/`ORDER BY`/`LIMIT` tail that may refer to `f` and `likes`.
const FILM_SELECT: &str = "
  SELECT f.film_id, f.name, f.description, f.release_date, f.duration,
         f.mpa_id, m.name,
         (SELECT COUNT(*) FROM film_likes l WHERE l.film_id = f.film_id) AS likes
  FROM films f
  LEFT JOIN mpa m ON m.mpa_id = f.mpa_id";

pub fn select_films<P: Params>(
  conn: &Connection,
  tail: &str,
  params: P,
) -> rusqlite::Result<Vec<RawFilm>> {
  let mut films = {
    let mut stmt = conn.prepare(&format!("{FILM_SELECT} {tail}"))?;
    stmt
      .query_map(params, |row| {
        Ok(RawFilm {
          film_id:      row.get(0)?,
          name:         row.get(1)?,
          description:  row.get(2)?,
          release_date: row.get(3)?,
          duration:     row.get(4)?,
          mpa_id:       row.get(5)?,
          mpa_name:     row.get(6)?,
          likes:        row.get(7)?,
          genres:       Vec::new(),
          directors:    Vec::new(),
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?
  };

  for film in &mut films {
    film.genres = film_genres(conn, film.film_id)?;
    film.directors = film_directors(conn, film.film_id)?;
  }
  Ok(films)
}

/// Load exactly one film; a missing row is `QueryReturnedNoRows`.
pub fn select_film(conn: &Connection, id: FilmId) -> rusqlite::Result<RawFilm> {
  select_films(conn, "WHERE f.film_id = ?1", [id])?
    .pop()
    .ok_or(rusqlite::Error::QueryReturnedNoRows)
}

fn film_genres(conn: &Connection, film_id: FilmId) -> rusqlite::Result<Vec<Genre>> {
  let mut stmt = conn.prepare(
    "SELECT g.genre_id, g.name
     FROM film_genres fg
     JOIN genres g ON g.genre_id = fg.genre_id
     WHERE fg.film_id = ?1
     ORDER BY g.genre_id",
  )?;
  stmt
    .query_map([film_id], |row| Ok(Genre { id: row.get(0)?, name: row.get(1)? }))?
    .collect()
}

fn film_directors(
  conn: &Connection,
  film_id: FilmId,
) -> rusqlite::Result<Vec<Director>> {
  let mut stmt = conn.prepare(
    "SELECT d.director_id, d.name
     FROM film_directors fd
     JOIN directors d ON d.director_id = fd.director_id
     WHERE fd.film_id = ?1
     ORDER BY d.director_id",
  )?;
  stmt
    .query_map([film_id], |row| Ok(Director { id: row.get(0)?, name: row.get(1)? }))?
    .collect()
}

/// The first MPA, genre or director id in `input` that has no row.
pub fn missing_reference(
  conn: &Connection,
  input: &NewFilm,
) -> rusqlite::Result<Option<(Entity, i64)>> {
  if let Some(mpa_id) = input.mpa
    && !exists(conn, "SELECT 1 FROM mpa WHERE mpa_id = ?1", mpa_id)?
  {
    return Ok(Some((Entity::Mpa, mpa_id)));
  }
  for &genre_id in &input.genres {
    if !exists(conn, "SELECT 1 FROM genres WHERE genre_id = ?1", genre_id)? {
      return Ok(Some((Entity::Genre, genre_id)));
    }
  }
  for &director_id in &input.directors {
    if !exists(conn, "SELECT 1 FROM directors WHERE director_id = ?1", director_id)? {
      return Ok(Some((Entity::Director, director_id)));
    }
  }
  Ok(None)
}

/// Write the genre and director link rows. Duplicate ids collapse on the
/// composite primary keys.
pub fn insert_film_links(
  conn: &Connection,
  film_id: FilmId,
  input: &NewFilm,
) -> rusqlite::Result<()> {
  let mut genre_stmt = conn
    .prepare("INSERT OR IGNORE INTO film_genres (film_id, genre_id) VALUES (?1, ?2)")?;
  for genre_id in &input.genres {
    genre_stmt.execute(rusqlite::params![film_id, genre_id])?;
  }

  let mut director_stmt = conn.prepare(
    "INSERT OR IGNORE INTO film_directors (film_id, director_id) VALUES (?1, ?2)",
  )?;
  for director_id in &input.directors {
    director_stmt.execute(rusqlite::params![film_id, director_id])?;
  }
  Ok(())
}

fn exists(conn: &Connection, sql: &str, id: i64) -> rusqlite::Result<bool> {
  Ok(conn.query_row(sql, [id], |_| Ok(())).optional()?.is_some())
}

// ─── Users ───────────────────────────────────────────────────────────────────

const USER_SELECT: &str =
  "SELECT u.user_id, u.email, u.login, u.name, u.birthday FROM users u";

pub fn select_users<P: Params>(
  conn: &Connection,
  tail: &str,
  params: P,
) -> rusqlite::Result<Vec<RawUser>> {
  let mut stmt = conn.prepare(&format!("{USER_SELECT} {tail}"))?;
  stmt
    .query_map(params, |row| {
      Ok(RawUser {
        user_id:  row.get(0)?,
        email:    row.get(1)?,
        login:    row.get(2)?,
        name:     row.get(3)?,
        birthday: row.get(4)?,
      })
    })?
    .collect()
}

// ─── Friendships ─────────────────────────────────────────────────────────────

/// Status of the directed edge `user_id → friend_id`, if any.
pub fn friend_status(
  conn: &Connection,
  user_id: UserId,
  friend_id: UserId,
) -> rusqlite::Result<Option<FriendshipStatus>> {
  let raw: Option<String> = conn
    .query_row(
      "SELECT status FROM friendships WHERE user_id = ?1 AND friend_id = ?2",
      [user_id, friend_id],
      |row| row.get(0),
    )
    .optional()?;

  raw
    .map(|s| {
      s.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
    })
    .transpose()
}

// ─── Reviews ─────────────────────────────────────────────────────────────────

/// Review columns plus `useful` = likes − dislikes, computed per row.
const REVIEW_SELECT: &str = "
  SELECT r.review_id, r.content, r.is_positive, r.user_id, r.film_id,
         (SELECT COUNT(*) FROM review_votes v
            WHERE v.review_id = r.review_id AND v.kind = 'like')
       - (SELECT COUNT(*) FROM review_votes v
            WHERE v.review_id = r.review_id AND v.kind = 'dislike') AS useful
  FROM reviews r";

pub fn select_reviews<P: Params>(
  conn: &Connection,
  tail: &str,
  params: P,
) -> rusqlite::Result<Vec<Review>> {
  let mut stmt = conn.prepare(&format!("{REVIEW_SELECT} {tail}"))?;
  stmt.query_map(params, review_from_row)?.collect()
}
