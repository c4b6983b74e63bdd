//! Router tests against an in-memory store.

use std::{collections::HashMap, sync::Arc};

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use siteline_core::{actor::CompanyDirectory, service::RfiService};
use siteline_store_sqlite::SqliteStore;
use tower::ServiceExt as _;

async fn app() -> Router {
  let store = SqliteStore::open_in_memory(Vec::new())
    .await
    .expect("in-memory store");
  let directory = CompanyDirectory::new(
    HashMap::from([
      ("electrical".to_owned(), "Volta Electric".to_owned()),
      ("plumbing".to_owned(), "PipeWorks".to_owned()),
    ]),
    Some("Meridian GC".to_owned()),
  );
  siteline_api::api_router(Arc::new(RfiService::new(store, directory)))
}

fn admin_query() -> &'static str {
  "actor_id=a1&actor_name=Admin&role=admin&department=office"
}

fn electrician_query() -> &'static str {
  "actor_id=s1&actor_name=Rosa&role=subcontractor&department=electrical"
}

fn plumber_query() -> &'static str {
  "actor_id=s2&actor_name=Pat&role=subcontractor&department=plumbing"
}

fn create_body(title: &str, priority: &str) -> Value {
  json!({
    "actor": {
      "actor_id": "s1",
      "actor_name": "Rosa",
      "role": "subcontractor",
      "department": "electrical"
    },
    "rfi": {
      "title": title,
      "description": "Clarification needed before rough-in.",
      "discipline": "electrical",
      "category": "design",
      "priority": priority,
      "assigned_to": "GC Office"
    }
  })
}

fn post(uri: &str, body: Value) -> Request<Body> {
  Request::builder()
    .method("POST")
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(body.to_string()))
    .unwrap()
}

fn get(uri: &str) -> Request<Body> {
  Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(res: axum::response::Response) -> Value {
  let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
    .await
    .unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

async fn create_one(app: &Router, title: &str, priority: &str) -> Value {
  let res = app
    .clone()
    .oneshot(post("/rfis", create_body(title, priority)))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::CREATED);
  body_json(res).await
}

#[tokio::test]
async fn create_returns_created_rfi() {
  let app = app().await;
  let rfi = create_one(&app, "Feeder sizing", "high").await;

  assert_eq!(rfi["status"], "open");
  assert_eq!(rfi["company"], "Volta Electric");
  assert!(rfi["rfi_number"].as_str().unwrap().starts_with("RFI-"));
  assert!(rfi["due_date"].is_string());
}

#[tokio::test]
async fn create_empty_title_is_bad_request() {
  let app = app().await;
  let res = app
    .clone()
    .oneshot(post("/rfis", create_body("   ", "high")))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::BAD_REQUEST);

  // Nothing persisted.
  let res = app
    .oneshot(get(&format!("/rfis?{}", admin_query())))
    .await
    .unwrap();
  assert_eq!(body_json(res).await.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn list_scopes_by_actor_company() {
  let app = app().await;
  create_one(&app, "Panel schedule", "medium").await;

  let res = app
    .clone()
    .oneshot(get(&format!("/rfis?{}", electrician_query())))
    .await
    .unwrap();
  assert_eq!(body_json(res).await.as_array().unwrap().len(), 1);

  let res = app
    .clone()
    .oneshot(get(&format!("/rfis?{}", plumber_query())))
    .await
    .unwrap();
  assert_eq!(body_json(res).await.as_array().unwrap().len(), 0);

  let res = app
    .oneshot(get(&format!("/rfis?{}", admin_query())))
    .await
    .unwrap();
  assert_eq!(body_json(res).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn get_one_is_visibility_checked() {
  let app = app().await;
  let rfi = create_one(&app, "Grounding detail", "low").await;
  let id = rfi["id"].as_str().unwrap();

  let res = app
    .clone()
    .oneshot(get(&format!("/rfis/{id}?{}", electrician_query())))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::OK);

  let res = app
    .oneshot(get(&format!("/rfis/{id}?{}", plumber_query())))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn priority_sort_descending() {
  let app = app().await;
  create_one(&app, "low one", "low").await;
  create_one(&app, "urgent one", "urgent").await;
  create_one(&app, "medium one", "medium").await;

  let res = app
    .oneshot(get(&format!(
      "/rfis?{}&sort=priority&dir=desc",
      admin_query()
    )))
    .await
    .unwrap();
  let rows = body_json(res).await;
  let titles: Vec<&str> = rows
    .as_array()
    .unwrap()
    .iter()
    .map(|r| r["title"].as_str().unwrap())
    .collect();
  assert_eq!(titles, ["urgent one", "medium one", "low one"]);
}

#[tokio::test]
async fn unknown_filter_and_sort_tokens_are_ignored() {
  let app = app().await;
  create_one(&app, "Still listed", "medium").await;

  let res = app
    .oneshot(get(&format!(
      "/rfis?{}&status=bogus&sort=favourite_colour",
      admin_query()
    )))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::OK);
  assert_eq!(body_json(res).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn respond_close_and_conflict() {
  let app = app().await;
  let rfi = create_one(&app, "Riser clash", "urgent").await;
  let id = rfi["id"].as_str().unwrap().to_owned();

  let respond = json!({
    "actor": {
      "actor_id": "a1",
      "actor_name": "Admin",
      "role": "admin",
      "department": "office"
    },
    "response": "Offset the riser 150mm to the north.",
    "outcome": "responded"
  });
  let res = app
    .clone()
    .oneshot(post(&format!("/rfis/{id}/respond"), respond))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::OK);
  let body = body_json(res).await;
  assert_eq!(body["status"], "responded");
  assert_eq!(body["response_by"], "Admin");

  let res = app
    .clone()
    .oneshot(post(&format!("/rfis/{id}/close"), json!({})))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::OK);

  // Closed is terminal; a second close conflicts.
  let res = app
    .oneshot(post(&format!("/rfis/{id}/close"), json!({})))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn short_response_is_bad_request() {
  let app = app().await;
  let rfi = create_one(&app, "Door hardware", "low").await;
  let id = rfi["id"].as_str().unwrap().to_owned();

  let respond = json!({
    "actor": {
      "actor_id": "a1",
      "actor_name": "Admin",
      "role": "admin",
      "department": "office"
    },
    "response": "ok",
    "outcome": "responded"
  });
  let res = app
    .oneshot(post(&format!("/rfis/{id}/respond"), respond))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn edit_patch_recomputes_due_date() {
  let app = app().await;
  let rfi = create_one(&app, "Spec conflict", "high").await;
  let id = rfi["id"].as_str().unwrap().to_owned();
  let original_due = rfi["due_date"].as_str().unwrap().to_owned();

  let res = app
    .clone()
    .oneshot(
      Request::builder()
        .method("PATCH")
        .uri(format!("/rfis/{id}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "priority": "low" }).to_string()))
        .unwrap(),
    )
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::OK);
  let body = body_json(res).await;
  assert_eq!(body["priority"], "low");
  assert_ne!(body["due_date"].as_str().unwrap(), original_due);
}

#[tokio::test]
async fn delete_removes_durable_copy() {
  let app = app().await;
  let rfi = create_one(&app, "Disposable", "low").await;
  let id = rfi["id"].as_str().unwrap().to_owned();

  let res = app
    .clone()
    .oneshot(
      Request::builder()
        .method("DELETE")
        .uri(format!("/rfis/{id}"))
        .body(Body::empty())
        .unwrap(),
    )
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::NO_CONTENT);

  let res = app
    .oneshot(get(&format!("/rfis/{id}?{}", admin_query())))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
