//! JSON REST API for Cinelog.
//!
//! Exposes an axum [`Router`] backed by a [`Service`] over any
//! [`CineStore`]. Tracing middleware, TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(cinelog_api::api_router(service.clone()))
//! ```

pub mod error;
pub mod films;
pub mod reference;
pub mod reviews;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, put},
};
use cinelog_core::store::CineStore;
use cinelog_service::Service;

pub use error::ApiError;

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: Arc<Service<S>>) -> Router<()>
where
  S: CineStore + 'static,
{
  Router::new()
    // Users and the friendship graph
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    .route(
      "/users/{id}",
      get(users::get_one::<S>)
        .put(users::update::<S>)
        .delete(users::remove::<S>),
    )
    .route("/users/{id}/friends", get(users::friends::<S>))
    .route(
      "/users/{id}/friends/{friend_id}",
      put(users::add_friend::<S>).delete(users::remove_friend::<S>),
    )
    .route(
      "/users/{id}/friends/common/{other_id}",
      get(users::common_friends::<S>),
    )
    .route(
      "/users/{id}/recommendations",
      get(users::recommendations::<S>),
    )
    .route("/users/{id}/feed", get(users::feed::<S>))
    // Films, likes and rankings
    .route("/films", get(films::list::<S>).post(films::create::<S>))
    .route("/films/popular", get(films::popular::<S>))
    .route("/films/common", get(films::common::<S>))
    .route("/films/search", get(films::search::<S>))
    .route("/films/director/{id}", get(films::by_director::<S>))
    .route(
      "/films/{id}",
      get(films::get_one::<S>)
        .put(films::update::<S>)
        .delete(films::remove::<S>),
    )
    .route(
      "/films/{id}/like/{user_id}",
      put(films::like::<S>).delete(films::unlike::<S>),
    )
    // Reference data
    .route("/genres", get(reference::genres::<S>))
    .route("/genres/{id}", get(reference::genre::<S>))
    .route("/mpa", get(reference::mpa_ratings::<S>))
    .route("/mpa/{id}", get(reference::mpa::<S>))
    .route(
      "/directors",
      get(reference::directors::<S>).post(reference::create_director::<S>),
    )
    .route(
      "/directors/{id}",
      get(reference::director::<S>)
        .put(reference::update_director::<S>)
        .delete(reference::remove_director::<S>),
    )
    // Reviews
    .route("/reviews", get(reviews::list::<S>).post(reviews::create::<S>))
    .route(
      "/reviews/{id}",
      get(reviews::get_one::<S>)
        .put(reviews::update::<S>)
        .delete(reviews::remove::<S>),
    )
    .route(
      "/reviews/{id}/like/{user_id}",
      put(reviews::like::<S>).delete(reviews::unlike::<S>),
    )
    .route(
      "/reviews/{id}/dislike/{user_id}",
      put(reviews::dislike::<S>).delete(reviews::undislike::<S>),
    )
    .with_state(service)
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use cinelog_service::Service;
  use cinelog_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::api_router;

  async fn app() -> axum::Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let service = Service::open(Arc::new(store)).await.unwrap();
    api_router(Arc::new(service))
  }

  async fn call(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = app
      .clone()
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();

    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn create_user(app: &axum::Router, login: &str) -> i64 {
    let (status, body) = call(
      app,
      "POST",
      "/users",
      Some(json!({
        "email": format!("{login}@example.com"),
        "login": login,
        "birthday": "1990-01-01",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
  }

  async fn create_film(app: &axum::Router, name: &str) -> i64 {
    let (status, body) = call(
      app,
      "POST",
      "/films",
      Some(json!({
        "name": name,
        "release_date": "1997-12-19",
        "duration": 195,
        "mpa": 3,
        "genres": [2, 2],
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
  }

  // ── Users ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn created_user_defaults_name_to_login() {
    let app = app().await;
    let id = create_user(&app, "neo").await;

    let (status, body) = call(&app, "GET", &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "neo");
  }

  #[tokio::test]
  async fn invalid_user_is_a_bad_request() {
    let app = app().await;
    let (status, body) = call(
      &app,
      "POST",
      "/users",
      Some(json!({ "email": "nope", "login": "x", "birthday": "1990-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("email"));
  }

  #[tokio::test]
  async fn missing_user_is_not_found() {
    let app = app().await;
    let (status, body) = call(&app, "GET", "/users/404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
  }

  // ── Friends ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn friend_removal_reports_whether_anything_changed() {
    let app = app().await;
    let u = create_user(&app, "u").await;
    let v = create_user(&app, "v").await;

    let (status, _) = call(&app, "PUT", &format!("/users/{u}/friends/{v}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, friends) = call(&app, "GET", &format!("/users/{v}/friends"), None).await;
    assert_eq!(friends, json!([]));

    let (status, body) =
      call(&app, "DELETE", &format!("/users/{v}/friends/{u}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "removed": false }));

    let (_, body) = call(&app, "DELETE", &format!("/users/{u}/friends/{v}"), None).await;
    assert_eq!(body, json!({ "removed": true }));

    let (_, feed) = call(&app, "GET", &format!("/users/{u}/feed"), None).await;
    let ops: Vec<_> = feed
      .as_array()
      .unwrap()
      .iter()
      .map(|e| (e["event_type"].clone(), e["operation"].clone()))
      .collect();
    assert_eq!(ops, vec![
      (json!("FRIEND"), json!("ADD")),
      (json!("FRIEND"), json!("REMOVE")),
    ]);
  }

  // ── Films ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn film_round_trip_hydrates_references() {
    let app = app().await;
    let id = create_film(&app, "Titanic").await;

    let (status, film) = call(&app, "GET", &format!("/films/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(film["mpa"]["name"], "PG-13");
    assert_eq!(film["genres"], json!([{ "id": 2, "name": "Drama" }]));
    assert_eq!(film["likes"], 0);
  }

  #[tokio::test]
  async fn unknown_genre_on_film_is_not_found() {
    let app = app().await;
    let (status, _) = call(
      &app,
      "POST",
      "/films",
      Some(json!({
        "name": "Ghost",
        "release_date": "2000-01-01",
        "duration": 90,
        "genres": [99],
      })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, films) = call(&app, "GET", "/films", None).await;
    assert_eq!(films, json!([]));
  }

  #[tokio::test]
  async fn popular_and_search_follow_likes() {
    let app = app().await;
    let u = create_user(&app, "u").await;
    let quiet = create_film(&app, "Titan Quiet").await;
    let loud = create_film(&app, "Titan Loud").await;

    let (status, _) = call(&app, "PUT", &format!("/films/{loud}/like/{u}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, popular) = call(&app, "GET", "/films/popular?count=1", None).await;
    assert_eq!(popular[0]["id"], loud);
    assert_eq!(popular.as_array().unwrap().len(), 1);

    let (_, found) = call(&app, "GET", "/films/search?query=TITAN&by=title", None).await;
    let ids: Vec<_> = found.as_array().unwrap().iter().map(|f| f["id"].clone()).collect();
    assert_eq!(ids, vec![json!(loud), json!(quiet)]);

    let (status, _) = call(&app, "GET", "/films/search?query=titan&by=plot", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, "GET", "/films/popular?count=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn removing_absent_like_is_not_found() {
    let app = app().await;
    let u = create_user(&app, "u").await;
    let f = create_film(&app, "Heat").await;

    let (status, _) = call(&app, "DELETE", &format!("/films/{f}/like/{u}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn director_films_reject_unknown_sort() {
    let app = app().await;
    let (status, director) =
      call(&app, "POST", "/directors", Some(json!({ "name": "Michael Mann" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = director["id"].as_i64().unwrap();

    let (status, films) = call(&app, "GET", &format!("/films/director/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(films, json!([]));

    let (status, _) =
      call(&app, "GET", &format!("/films/director/{id}?sort_by=rating"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  // ── Reviews ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn review_votes_adjust_usefulness() {
    let app = app().await;
    let author = create_user(&app, "author").await;
    let voter = create_user(&app, "voter").await;
    let f = create_film(&app, "Heat").await;

    let (status, review) = call(
      &app,
      "POST",
      "/reviews",
      Some(json!({
        "content": "Great heist.",
        "is_positive": true,
        "user_id": author,
        "film_id": f,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = review["id"].as_i64().unwrap();
    assert_eq!(review["useful"], 0);

    call(&app, "PUT", &format!("/reviews/{id}/like/{voter}"), None).await;
    let (_, review) = call(&app, "GET", &format!("/reviews/{id}"), None).await;
    assert_eq!(review["useful"], 1);

    let (status, _) =
      call(&app, "DELETE", &format!("/reviews/{id}/dislike/{voter}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = call(&app, "GET", &format!("/reviews?film_id={f}&count=5"), None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
  }

  // ── Reference data ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn reference_data_is_seeded() {
    let app = app().await;
    let (_, genres) = call(&app, "GET", "/genres", None).await;
    assert_eq!(genres.as_array().unwrap().len(), 6);

    let (_, mpa) = call(&app, "GET", "/mpa/5", None).await;
    assert_eq!(mpa["name"], "NC-17");

    let (status, _) = call(&app, "GET", "/mpa/6", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}
