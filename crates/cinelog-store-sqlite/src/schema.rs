//! SQL schema for the Cinelog SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS` and `INSERT OR
/// IGNORE` on the seeded reference tables.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS mpa (
    mpa_id  INTEGER PRIMARY KEY,
    name    TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS genres (
    genre_id INTEGER PRIMARY KEY,
    name     TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS directors (
    director_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS films (
    film_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    name         TEXT NOT NULL,
    description  TEXT NOT NULL DEFAULT '',
    release_date TEXT NOT NULL,    -- YYYY-MM-DD
    duration     INTEGER NOT NULL CHECK (duration > 0),
    mpa_id       INTEGER REFERENCES mpa(mpa_id)
);

CREATE TABLE IF NOT EXISTS film_genres (
    film_id  INTEGER NOT NULL REFERENCES films(film_id) ON DELETE CASCADE,
    genre_id INTEGER NOT NULL REFERENCES genres(genre_id),
    PRIMARY KEY (film_id, genre_id)
);

CREATE TABLE IF NOT EXISTS film_directors (
    film_id     INTEGER NOT NULL REFERENCES films(film_id) ON DELETE CASCADE,
    director_id INTEGER NOT NULL REFERENCES directors(director_id) ON DELETE CASCADE,
    PRIMARY KEY (film_id, director_id)
);

CREATE TABLE IF NOT EXISTS users (
    user_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    email    TEXT NOT NULL,
    login    TEXT NOT NULL,
    name     TEXT NOT NULL,
    birthday TEXT NOT NULL         -- YYYY-MM-DD
);

-- Directed edges. At most one status per ordered pair.
CREATE TABLE IF NOT EXISTS friendships (
    user_id   INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    friend_id INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    status    TEXT NOT NULL,       -- 'pending' | 'confirmed'
    PRIMARY KEY (user_id, friend_id),
    CHECK (user_id != friend_id)
);

CREATE TABLE IF NOT EXISTS film_likes (
    film_id INTEGER NOT NULL REFERENCES films(film_id) ON DELETE CASCADE,
    user_id INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    PRIMARY KEY (film_id, user_id)
);

CREATE TABLE IF NOT EXISTS reviews (
    review_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    film_id     INTEGER NOT NULL REFERENCES films(film_id) ON DELETE CASCADE,
    user_id     INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    content     TEXT NOT NULL,
    is_positive INTEGER NOT NULL
);

-- Likes and dislikes are independent sets keyed by (review, user).
CREATE TABLE IF NOT EXISTS review_votes (
    review_id INTEGER NOT NULL REFERENCES reviews(review_id) ON DELETE CASCADE,
    user_id   INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    kind      TEXT NOT NULL,       -- 'like' | 'dislike'
    PRIMARY KEY (review_id, user_id, kind)
);

-- Append-only. Rows are never updated or deleted, and outlive the user
-- they belong to, so `user_id` carries no foreign key.
CREATE TABLE IF NOT EXISTS feed_events (
    event_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp  INTEGER NOT NULL,   -- epoch milliseconds
    user_id    INTEGER NOT NULL,
    event_type TEXT NOT NULL,      -- 'LIKE' | 'REVIEW' | 'FRIEND'
    operation  TEXT NOT NULL,      -- 'ADD' | 'REMOVE' | 'UPDATE'
    entity_id  INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS film_likes_user_idx   ON film_likes(user_id);
CREATE INDEX IF NOT EXISTS friendships_friend_idx ON friendships(friend_id);
CREATE INDEX IF NOT EXISTS reviews_film_idx      ON reviews(film_id);
CREATE INDEX IF NOT EXISTS feed_events_user_idx  ON feed_events(user_id);

INSERT OR IGNORE INTO mpa (mpa_id, name) VALUES
    (1, 'G'), (2, 'PG'), (3, 'PG-13'), (4, 'R'), (5, 'NC-17');

INSERT OR IGNORE INTO genres (genre_id, name) VALUES
    (1, 'Comedy'), (2, 'Drama'), (3, 'Cartoon'),
    (4, 'Thriller'), (5, 'Documentary'), (6, 'Action');

PRAGMA user_version = 1;
";
