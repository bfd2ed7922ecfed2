//! Gateway tests against an in-memory SQLite store, and `HttpStore` tests
//! against the real API router served on an ephemeral port.

use std::sync::Arc;

use axum::{Json, Router, http::StatusCode, routing::get};
use chrono::NaiveDate;
use roster_core::{ContactFormData, Error, Gender, Role, store::ContactStore};
use roster_store_sqlite::SqliteStore;
use serde_json::json;
use tokio::net::TcpListener;

use crate::{ApiConfig, Gateway, HttpStore};

fn ada() -> ContactFormData {
  ContactFormData {
    first_name: "Ada".into(),
    last_name:  "Lovelace".into(),
    email:      "ada@example.com".into(),
    role:       Role::Admin,
    gender:     Gender::Female,
    is_active:  true,
    newsletter: false,
    birth_date: NaiveDate::from_ymd_opt(1815, 12, 10).unwrap(),
  }
}

fn grace() -> ContactFormData {
  ContactFormData {
    first_name: "Grace".into(),
    last_name:  "Hopper".into(),
    email:      "grace@example.com".into(),
    role:       Role::User,
    gender:     Gender::Female,
    is_active:  false,
    newsletter: true,
    birth_date: NaiveDate::from_ymd_opt(1906, 12, 9).unwrap(),
  }
}

async fn sqlite_gateway() -> Gateway<SqliteStore> {
  Gateway::new(SqliteStore::open_in_memory().await.expect("in-memory store"))
}

// ─── Gateway cache ───────────────────────────────────────────────────────────

#[tokio::test]
async fn snapshot_is_empty_until_first_list() {
  let gw = sqlite_gateway().await;
  assert!(gw.snapshot().is_none());

  let listed = gw.list().await.unwrap();
  assert!(listed.is_empty());
  assert_eq!(gw.snapshot().map(|s| s.len()), Some(0));
}

#[tokio::test]
async fn create_appends_to_loaded_cache() {
  let gw = sqlite_gateway().await;
  gw.list().await.unwrap();

  let created = gw.create(ada()).await.unwrap();
  let snapshot = gw.snapshot().unwrap();
  assert_eq!(snapshot.len(), 1);
  assert_eq!(snapshot[0], created);
  assert_eq!(ContactFormData::from(&snapshot[0]), ada());
}

#[tokio::test]
async fn mutations_leave_unloaded_cache_alone() {
  let gw = sqlite_gateway().await;
  gw.create(ada()).await.unwrap();
  assert!(gw.snapshot().is_none());

  // The next list observes the write.
  assert_eq!(gw.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn subscribers_see_mutations_without_refetch() {
  let gw = sqlite_gateway().await;
  gw.list().await.unwrap();
  let mut rx = gw.subscribe();
  rx.borrow_and_update();

  let created = gw.create(ada()).await.unwrap();
  assert!(rx.has_changed().unwrap());
  let seen = rx.borrow_and_update().clone().unwrap();
  assert_eq!(seen.len(), 1);
  assert_eq!(seen[0].id, created.id);
}

#[tokio::test]
async fn held_snapshots_are_not_mutated() {
  let gw = sqlite_gateway().await;
  gw.create(ada()).await.unwrap();
  let before = gw.list().await.unwrap();

  gw.create(grace()).await.unwrap();
  assert_eq!(before.len(), 1);
  assert_eq!(gw.snapshot().unwrap().len(), 2);
}

#[tokio::test]
async fn get_reports_missing_as_not_found() {
  let gw = sqlite_gateway().await;
  let err = gw.get("missing").await.unwrap_err();
  assert!(matches!(err, Error::NotFound(id) if id == "missing"));
}

#[tokio::test]
async fn update_replaces_only_the_matching_entry() {
  let gw = sqlite_gateway().await;
  let a = gw.create(ada()).await.unwrap();
  let g = gw.create(grace()).await.unwrap();
  gw.list().await.unwrap();

  let mut changes = ada();
  changes.role = Role::Viewer;
  let updated = gw.update(&a.id, changes).await.unwrap();
  assert_eq!(updated.role, Role::Viewer);

  let snapshot = gw.snapshot().unwrap();
  assert_eq!(snapshot.len(), 2);
  assert_eq!(snapshot[0].id, a.id);
  assert_eq!(snapshot[0].role, Role::Viewer);
  assert_eq!(snapshot[0].email, a.email);
  assert_eq!(snapshot[1], g);
}

#[tokio::test]
async fn update_of_vanished_id_is_not_found_and_evicted() {
  let gw = sqlite_gateway().await;
  let a = gw.create(ada()).await.unwrap();
  gw.list().await.unwrap();

  // Someone else deletes it behind the cache's back.
  assert!(gw.store().delete(&a.id).await.unwrap());

  let err = gw.update(&a.id, ada()).await.unwrap_err();
  assert!(err.is_not_found());
  assert!(gw.snapshot().unwrap().is_empty());
}

#[tokio::test]
async fn delete_removes_exactly_one_entry() {
  let gw = sqlite_gateway().await;
  let a = gw.create(ada()).await.unwrap();
  let g = gw.create(grace()).await.unwrap();
  gw.list().await.unwrap();

  gw.delete(&a.id).await.unwrap();
  let snapshot = gw.snapshot().unwrap();
  assert_eq!(snapshot.len(), 1);
  assert_eq!(snapshot[0].id, g.id);

  let listed = gw.list().await.unwrap();
  assert!(listed.iter().all(|c| c.id != a.id));

  let err = gw.delete(&a.id).await.unwrap_err();
  assert!(err.is_not_found());
}

#[tokio::test]
async fn invalidate_drops_the_cache() {
  let gw = sqlite_gateway().await;
  gw.list().await.unwrap();
  gw.invalidate();
  assert!(gw.snapshot().is_none());
}

// ─── HttpStore against the API ───────────────────────────────────────────────

/// Serve `router` on 127.0.0.1 and return its base URL.
async fn serve(router: Router) -> String {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, router).await.unwrap();
  });
  format!("http://{addr}")
}

async fn http_gateway() -> Gateway<HttpStore> {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let base_url = serve(roster_api::api_router(store)).await;
  let http = HttpStore::new(ApiConfig {
    base_url,
    ..ApiConfig::default()
  })
  .unwrap();
  Gateway::new(http)
}

#[tokio::test]
async fn http_create_update_delete_scenario() {
  let gw = http_gateway().await;
  assert!(gw.list().await.unwrap().is_empty());

  // Create.
  let created = gw.create(ada()).await.unwrap();
  assert!(!created.id.is_empty());
  assert_eq!(ContactFormData::from(&created), ada());
  assert_eq!(gw.snapshot().unwrap().len(), 1);

  // Round trip.
  let fetched = gw.get(&created.id).await.unwrap();
  assert_eq!(ContactFormData::from(&fetched), ada());

  // Update the role only.
  let mut changes = ada();
  changes.role = Role::Viewer;
  gw.update(&created.id, changes).await.unwrap();
  let listed = gw.list().await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].role, Role::Viewer);
  assert_eq!(listed[0].first_name, "Ada");
  assert_eq!(listed[0].email, "ada@example.com");
  assert_eq!(listed[0].birth_date, ada().birth_date);

  // Delete, then delete again.
  gw.delete(&created.id).await.unwrap();
  assert!(gw.list().await.unwrap().is_empty());
  let err = gw.delete(&created.id).await.unwrap_err();
  assert!(err.is_not_found(), "{err:?}");
}

#[tokio::test]
async fn http_rejected_payload_is_validation_error() {
  let gw = http_gateway().await;
  let mut bad = ada();
  bad.first_name = String::new();

  let err = gw.create(bad).await.unwrap_err();
  match err {
    Error::Validation(message) => assert!(message.contains("First name is required")),
    other => panic!("expected validation error, got {other:?}"),
  }
}

#[tokio::test]
async fn http_missing_ids_are_not_found() {
  let gw = http_gateway().await;
  assert!(gw.get("nope").await.unwrap_err().is_not_found());
  assert!(gw.update("nope", ada()).await.unwrap_err().is_not_found());
  assert!(gw.delete("nope").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn http_server_failure_is_server_error() {
  let router = Router::new().route(
    "/users",
    get(|| async { (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "error": "down" }))) }),
  );
  let http = HttpStore::new(ApiConfig {
    base_url: serve(router).await,
    ..ApiConfig::default()
  })
  .unwrap();

  let err = Gateway::new(http).list().await.unwrap_err();
  match err {
    Error::Server { status, message } => {
      assert_eq!(status, 503);
      assert_eq!(message, "down");
    }
    other => panic!("expected server error, got {other:?}"),
  }
}

#[tokio::test]
async fn http_unreachable_is_network_error() {
  // Bind then drop to get a port nobody is listening on.
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  drop(listener);

  let http = HttpStore::new(ApiConfig {
    base_url: format!("http://{addr}"),
    ..ApiConfig::default()
  })
  .unwrap();
  let err = Gateway::new(http).list().await.unwrap_err();
  assert!(matches!(err, Error::Network(_)), "{err:?}");
}

#[tokio::test]
async fn http_list_normalises_foreign_records() {
  let router = Router::new().route(
    "/users",
    get(|| async {
      Json(json!([
        {
          "id": 1,
          "firstName": "Ada",
          "lastName": "Lovelace",
          "email": "ada@example.com",
          "role": "Admin",
          "gender": "Female",
          "isActive": true,
          "newsletter": false,
          "birthDate": "1815-12-10T00:00:00.000Z"
        }
      ]))
    }),
  );
  let http = HttpStore::new(ApiConfig {
    base_url: serve(router).await,
    ..ApiConfig::default()
  })
  .unwrap();

  let listed = Gateway::new(http).list().await.unwrap();
  assert_eq!(listed[0].id, "1");
  assert_eq!(listed[0].birth_date, NaiveDate::from_ymd_opt(1815, 12, 10).unwrap());
  assert!(listed[0].created_at.is_some());
  assert!(listed[0].updated_at.is_some());
}
