//! Service-level tests against an in-memory SQLite store.

use std::sync::Arc;

use chrono::NaiveDate;
use cinelog_core::{
  Entity, Error,
  feed::{EventType, Operation},
  film::{Film, NewFilm},
  review::{NewReview, ReviewUpdate},
  user::NewUser,
};
use cinelog_store_sqlite::SqliteStore;

use crate::Service;

async fn service() -> Service<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.expect("in-memory store");
  Service::open(Arc::new(store)).await.expect("service")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn user(svc: &Service<SqliteStore>, login: &str) -> i64 {
  svc
    .create_user(NewUser::new(format!("{login}@example.com"), login, date(1990, 1, 1)))
    .await
    .unwrap()
    .id
}

async fn film(svc: &Service<SqliteStore>, name: &str) -> i64 {
  svc
    .create_film(NewFilm::new(name, date(2000, 1, 1), 100))
    .await
    .unwrap()
    .id
}

async fn review(svc: &Service<SqliteStore>, user_id: i64, film_id: i64) -> i64 {
  svc
    .create_review(NewReview {
      content: "Worth a watch.".into(),
      is_positive: true,
      user_id,
      film_id,
    })
    .await
    .unwrap()
    .id
}

fn ids(films: &[Film]) -> Vec<i64> { films.iter().map(|f| f.id).collect() }

fn assert_not_found(err: Error, entity: Entity) {
  match err {
    Error::NotFound { entity: got, .. } => assert_eq!(got, entity),
    other => panic!("expected {entity} not found, got {other:?}"),
  }
}

// ─── Friendship ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn friendship_is_one_way_until_reciprocated() {
  let svc = service().await;
  let u = user(&svc, "u").await;
  let v = user(&svc, "v").await;

  svc.add_friend(u, v).await.unwrap();
  assert_eq!(svc.friends(u).await.unwrap().len(), 1);
  assert!(svc.friends(v).await.unwrap().is_empty());

  svc.add_friend(v, u).await.unwrap();
  assert_eq!(svc.friends(v).await.unwrap()[0].id, u);
}

#[tokio::test]
async fn mutual_removal_keeps_the_other_side() {
  let svc = service().await;
  let u = user(&svc, "u").await;
  let v = user(&svc, "v").await;
  svc.add_friend(u, v).await.unwrap();
  svc.add_friend(v, u).await.unwrap();

  assert!(svc.remove_friend(u, v).await.unwrap());
  assert!(svc.friends(u).await.unwrap().is_empty());
  assert_eq!(svc.friends(v).await.unwrap()[0].id, u);
}

#[tokio::test]
async fn one_way_removal_logs_add_then_remove() {
  let svc = service().await;
  let u = user(&svc, "u").await;
  let v = user(&svc, "v").await;

  svc.add_friend(u, v).await.unwrap();
  assert!(svc.remove_friend(u, v).await.unwrap());

  let feed = svc.user_feed(u).await.unwrap();
  let kinds: Vec<_> = feed
    .iter()
    .map(|e| (e.event_type, e.operation, e.entity_id))
    .collect();
  assert_eq!(kinds, vec![
    (EventType::Friend, Operation::Add, v),
    (EventType::Friend, Operation::Remove, v),
  ]);
  assert!(svc.user_feed(v).await.unwrap().is_empty());
}

#[tokio::test]
async fn removing_a_pending_edge_is_silent() {
  let svc = service().await;
  let u = user(&svc, "u").await;
  let v = user(&svc, "v").await;
  svc.add_friend(u, v).await.unwrap();

  // v only holds the pending reciprocal.
  assert!(!svc.remove_friend(v, u).await.unwrap());
  assert!(svc.user_feed(v).await.unwrap().is_empty());
  assert_eq!(svc.friends(u).await.unwrap().len(), 1);
}

#[tokio::test]
async fn friend_operations_check_users_first() {
  let svc = service().await;
  let u = user(&svc, "u").await;

  assert_not_found(svc.add_friend(u, 99).await.unwrap_err(), Entity::User);
  assert_not_found(svc.add_friend(99, u).await.unwrap_err(), Entity::User);
  assert_not_found(svc.remove_friend(u, 99).await.unwrap_err(), Entity::User);
  assert_not_found(svc.common_friends(u, 99).await.unwrap_err(), Entity::User);
  assert!(svc.user_feed(u).await.unwrap().is_empty());
}

#[tokio::test]
async fn befriending_self_is_rejected() {
  let svc = service().await;
  let u = user(&svc, "u").await;
  assert!(matches!(
    svc.add_friend(u, u).await,
    Err(Error::InvalidField { field: "friend_id", .. })
  ));
}

#[tokio::test]
async fn common_friends_intersects_confirmed_lists() {
  let svc = service().await;
  let a = user(&svc, "a").await;
  let b = user(&svc, "b").await;
  let c = user(&svc, "c").await;
  let d = user(&svc, "d").await;
  svc.add_friend(a, c).await.unwrap();
  svc.add_friend(b, c).await.unwrap();
  svc.add_friend(a, d).await.unwrap();

  let common = svc.common_friends(a, b).await.unwrap();
  assert_eq!(common.iter().map(|u| u.id).collect::<Vec<_>>(), vec![c]);
}

// ─── Likes and rankings ──────────────────────────────────────────────────────

#[tokio::test]
async fn like_records_event_and_unlike_requires_like() {
  let svc = service().await;
  let u = user(&svc, "u").await;
  let f = film(&svc, "Heat").await;

  assert_not_found(svc.remove_like(f, u).await.unwrap_err(), Entity::Like);

  svc.add_like(f, u).await.unwrap();
  assert_eq!(svc.film(f).await.unwrap().likes, 1);
  svc.remove_like(f, u).await.unwrap();
  assert_eq!(svc.film(f).await.unwrap().likes, 0);

  let feed = svc.user_feed(u).await.unwrap();
  assert_eq!(feed.len(), 2);
  assert_eq!(feed[0].event_type, EventType::Like);
  assert_eq!(feed[0].entity_id, f);
  assert_eq!(feed[1].operation, Operation::Remove);
}

#[tokio::test]
async fn like_requires_existing_film_and_user() {
  let svc = service().await;
  let u = user(&svc, "u").await;
  let f = film(&svc, "Heat").await;

  assert_not_found(svc.add_like(99, u).await.unwrap_err(), Entity::Film);
  assert_not_found(svc.add_like(f, 99).await.unwrap_err(), Entity::User);
  assert!(svc.user_feed(u).await.unwrap().is_empty());
}

#[tokio::test]
async fn popular_films_are_bounded_and_ordered() {
  let svc = service().await;
  let users = [user(&svc, "a").await, user(&svc, "b").await, user(&svc, "c").await];
  let f1 = film(&svc, "One").await;
  let f2 = film(&svc, "Two").await;
  let f3 = film(&svc, "Three").await;

  for u in users {
    svc.add_like(f2, u).await.unwrap();
  }
  svc.add_like(f3, users[0]).await.unwrap();

  let top = svc.popular_films(Some(2), None, None).await.unwrap();
  assert_eq!(ids(&top), vec![f2, f3]);

  let all = svc.popular_films(None, None, None).await.unwrap();
  assert_eq!(ids(&all), vec![f2, f3, f1]);
  assert!(all.windows(2).all(|w| w[0].likes >= w[1].likes));
}

#[tokio::test]
async fn popular_films_rejects_bad_parameters() {
  let svc = service().await;
  assert!(matches!(
    svc.popular_films(Some(0), None, None).await,
    Err(Error::IncorrectParameter { name: "count", .. })
  ));
  assert_not_found(
    svc.popular_films(None, Some(404), None).await.unwrap_err(),
    Entity::Genre,
  );
}

#[tokio::test]
async fn popular_films_filters_by_genre_and_year() {
  let svc = service().await;
  let mut drama = NewFilm::new("Drama", date(1999, 5, 1), 90);
  drama.genres = vec![2];
  let drama = svc.create_film(drama).await.unwrap().id;
  let other = svc
    .create_film(NewFilm::new("Other", date(2005, 5, 1), 90))
    .await
    .unwrap()
    .id;

  let by_genre = svc.popular_films(None, Some(2), None).await.unwrap();
  assert_eq!(ids(&by_genre), vec![drama]);

  let by_year = svc.popular_films(None, None, Some(2005)).await.unwrap();
  assert_eq!(ids(&by_year), vec![other]);
}

#[tokio::test]
async fn director_films_validate_sort_and_director() {
  let svc = service().await;
  let director = svc.create_director("Michael Mann".into()).await.unwrap();

  let mut old = NewFilm::new("Thief", date(1981, 3, 27), 123);
  old.directors = vec![director.id];
  let old = svc.create_film(old).await.unwrap().id;
  let mut new = NewFilm::new("Heat", date(1995, 12, 15), 170);
  new.directors = vec![director.id];
  let new = svc.create_film(new).await.unwrap().id;

  let u = user(&svc, "u").await;
  svc.add_like(new, u).await.unwrap();

  let by_year = svc.director_films(director.id, None).await.unwrap();
  assert_eq!(ids(&by_year), vec![old, new]);
  let by_likes = svc.director_films(director.id, Some("LIKES")).await.unwrap();
  assert_eq!(ids(&by_likes), vec![new, old]);

  assert!(matches!(
    svc.director_films(director.id, Some("rating")).await,
    Err(Error::IncorrectParameter { name: "sort_by", .. })
  ));
  assert_not_found(
    svc.director_films(999, None).await.unwrap_err(),
    Entity::Director,
  );
}

#[tokio::test]
async fn common_films_need_both_users() {
  let svc = service().await;
  let a = user(&svc, "a").await;
  let b = user(&svc, "b").await;
  let f = film(&svc, "Shared").await;
  let g = film(&svc, "Solo").await;
  svc.add_like(f, a).await.unwrap();
  svc.add_like(f, b).await.unwrap();
  svc.add_like(g, a).await.unwrap();

  assert_eq!(ids(&svc.common_films(a, b).await.unwrap()), vec![f]);
  assert_not_found(svc.common_films(a, 77).await.unwrap_err(), Entity::User);
}

// ─── Recommendations ─────────────────────────────────────────────────────────

#[tokio::test]
async fn recommends_films_liked_by_similar_users() {
  let svc = service().await;
  let a = user(&svc, "a").await;
  let b = user(&svc, "b").await;
  let f1 = film(&svc, "F1").await;
  let f2 = film(&svc, "F2").await;

  svc.add_like(f1, a).await.unwrap();
  svc.add_like(f1, b).await.unwrap();
  svc.add_like(f2, b).await.unwrap();

  assert_eq!(ids(&svc.recommendations(a).await.unwrap()), vec![f2]);
  assert!(svc.recommendations(b).await.unwrap().is_empty());
  assert_not_found(svc.recommendations(42).await.unwrap_err(), Entity::User);
}

// ─── Reviews ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn usefulness_is_likes_minus_dislikes() {
  let svc = service().await;
  let author = user(&svc, "author").await;
  let f = film(&svc, "Heat").await;
  let r = review(&svc, author, f).await;

  let voters: Vec<i64> = {
    let mut v = Vec::new();
    for login in ["v1", "v2", "v3", "v4", "v5"] {
      v.push(user(&svc, login).await);
    }
    v
  };
  for &u in &voters[..3] {
    svc.add_review_like(r, u).await.unwrap();
  }
  for &u in &voters[3..] {
    svc.add_review_dislike(r, u).await.unwrap();
  }
  assert_eq!(svc.review(r).await.unwrap().useful, 1);

  svc.add_review_like(r, voters[0]).await.unwrap();
  assert_eq!(svc.review(r).await.unwrap().useful, 1);

  assert_not_found(
    svc.remove_review_dislike(r, voters[0]).await.unwrap_err(),
    Entity::ReviewDislike,
  );
  assert_eq!(svc.review(r).await.unwrap().useful, 1);

  assert_not_found(
    svc.remove_review_like(r, voters[4]).await.unwrap_err(),
    Entity::ReviewLike,
  );
  assert_eq!(svc.review(r).await.unwrap().useful, 1);

  svc.remove_review_like(r, voters[0]).await.unwrap();
  assert_eq!(svc.review(r).await.unwrap().useful, 0);
}

#[tokio::test]
async fn review_events_are_attributed_to_the_author() {
  let svc = service().await;
  let author = user(&svc, "author").await;
  let f = film(&svc, "Heat").await;
  let r = review(&svc, author, f).await;

  svc
    .update_review(r, ReviewUpdate { content: "Changed my mind.".into(), is_positive: false })
    .await
    .unwrap();
  svc.remove_review(r).await.unwrap();
  assert_not_found(svc.remove_review(r).await.unwrap_err(), Entity::Review);

  let ops: Vec<_> = svc
    .user_feed(author)
    .await
    .unwrap()
    .into_iter()
    .map(|e| (e.event_type, e.operation, e.entity_id))
    .collect();
  assert_eq!(ops, vec![
    (EventType::Review, Operation::Add, r),
    (EventType::Review, Operation::Update, r),
    (EventType::Review, Operation::Remove, r),
  ]);
  assert_not_found(svc.review(r).await.unwrap_err(), Entity::Review);
}

#[tokio::test]
async fn review_creation_is_validated() {
  let svc = service().await;
  let u = user(&svc, "u").await;
  let f = film(&svc, "Heat").await;

  let blank = NewReview { content: "  ".into(), is_positive: true, user_id: u, film_id: f };
  assert!(matches!(
    svc.create_review(blank).await,
    Err(Error::InvalidField { field: "content", .. })
  ));

  let orphan = NewReview { content: "Hm".into(), is_positive: true, user_id: u, film_id: 404 };
  assert_not_found(svc.create_review(orphan).await.unwrap_err(), Entity::Film);
  assert!(svc.reviews(None, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn reviews_are_listed_most_useful_first() {
  let svc = service().await;
  let a = user(&svc, "a").await;
  let b = user(&svc, "b").await;
  let f = film(&svc, "Heat").await;
  let first = review(&svc, a, f).await;
  let second = review(&svc, b, f).await;
  svc.add_review_like(second, a).await.unwrap();

  let listed = svc.reviews(Some(f), None).await.unwrap();
  assert_eq!(listed.iter().map(|r| r.id).collect::<Vec<_>>(), vec![second, first]);
  assert_eq!(svc.reviews(Some(f), Some(1)).await.unwrap().len(), 1);
}

// ─── Catalogue ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_by_title_or_director() {
  let svc = service().await;
  let cameron = svc.create_director("James Cameron".into()).await.unwrap();
  let mut titanic = NewFilm::new("Titanic", date(1997, 12, 19), 195);
  titanic.directors = vec![cameron.id];
  let titanic = svc.create_film(titanic).await.unwrap().id;

  assert_eq!(ids(&svc.search_films("titan", Some("title")).await.unwrap()), vec![titanic]);
  assert!(svc.search_films("titan", Some("director")).await.unwrap().is_empty());
  assert_eq!(ids(&svc.search_films("CAMERON", None).await.unwrap()), vec![titanic]);
  assert!(matches!(
    svc.search_films("titan", Some("title,genre")).await,
    Err(Error::IncorrectParameter { name: "by", .. })
  ));
}

#[tokio::test]
async fn search_results_follow_popularity() {
  let svc = service().await;
  let u = user(&svc, "u").await;
  let quiet = film(&svc, "Star Quiet").await;
  let loud = film(&svc, "Star Loud").await;
  svc.add_like(loud, u).await.unwrap();

  assert_eq!(ids(&svc.search_films("star", None).await.unwrap()), vec![loud, quiet]);
}

#[tokio::test]
async fn catalogue_tracks_film_writes() {
  let svc = service().await;
  let f = film(&svc, "Alien").await;
  assert_eq!(svc.catalog().get(f).unwrap().title, "alien");

  svc
    .update_film(f, NewFilm::new("Aliens", date(1986, 7, 18), 137))
    .await
    .unwrap();
  assert_eq!(svc.catalog().get(f).unwrap().title, "aliens");

  svc.remove_film(f).await.unwrap();
  assert!(svc.catalog().is_empty());
  assert_not_found(svc.remove_film(f).await.unwrap_err(), Entity::Film);
}

#[tokio::test]
async fn catalogue_is_rebuilt_on_open() {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  {
    let svc = Service::open(store.clone()).await.unwrap();
    film(&svc, "Persisted").await;
  }

  let reopened = Service::open(store).await.unwrap();
  assert_eq!(reopened.catalog().len(), 1);
  assert_eq!(reopened.rebuild_catalog().await.unwrap(), 1);
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn film_validation_names_the_field() {
  let svc = service().await;
  let early = NewFilm::new("Proto", date(1890, 1, 1), 10);
  assert!(matches!(
    svc.create_film(early).await,
    Err(Error::InvalidField { field: "release_date", .. })
  ));

  let mut dangling = NewFilm::new("Dangling", date(2000, 1, 1), 10);
  dangling.mpa = Some(99);
  assert_not_found(svc.create_film(dangling).await.unwrap_err(), Entity::Mpa);
  assert!(svc.films().await.unwrap().is_empty());
  assert!(svc.catalog().is_empty());
}

#[tokio::test]
async fn user_validation_and_missing_updates() {
  let svc = service().await;
  let bad = NewUser::new("not-an-email", "login", date(1990, 1, 1));
  assert!(matches!(
    svc.create_user(bad).await,
    Err(Error::InvalidField { field: "email", .. })
  ));

  let ok = NewUser::new("x@example.com", "x", date(1990, 1, 1));
  assert_not_found(svc.update_user(5, ok).await.unwrap_err(), Entity::User);
}
