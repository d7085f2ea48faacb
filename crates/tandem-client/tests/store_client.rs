//! Integration tests for [`StoreClient`] against a mock record store.

use chrono::DateTime;
use serde_json::json;
use tandem_client::{StoreClient, StoreConfig, StoreError};
use tandem_core::{
  profile::ProfileUpsert,
  store::RecordStore,
  thing::{DonePolicy, NewThing, ThingStatus},
};
use wiremock::{
  Mock, MockServer, ResponseTemplate,
  matchers::{body_json, header, method, path, query_param},
};

fn client(server: &MockServer, done_policy: DonePolicy) -> StoreClient {
  StoreClient::new(StoreConfig {
    base_url: server.uri(),
    api_key: "test-key".into(),
    done_policy,
  })
  .expect("store client")
}

fn planned_doc(id: &str, title: &str, created_at: i64) -> serde_json::Value {
  json!({
    "id": id,
    "title": title,
    "notes": null,
    "status": "planned",
    "createdAt": created_at,
    "addedBy": "Ana",
  })
}

fn done_doc(id: &str, created_at: i64, done_at: i64) -> serde_json::Value {
  json!({
    "id": id,
    "title": "Cook dinner together",
    "status": "done",
    "createdAt": created_at,
    "doneAt": done_at,
    "photoUrl": "https://photos.example/1.jpg",
    "addedBy": "Bea",
  })
}

// ─── Things ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_thing_posts_document_and_returns_id() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/v1/things"))
    .and(header("x-api-key", "test-key"))
    .and(body_json(json!({
      "title": "Plan a weekend getaway",
      "notes": null,
      "addedBy": "Ana",
    })))
    .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "thing-1" })))
    .expect(1)
    .mount(&server)
    .await;

  let input = NewThing::new("Plan a weekend getaway", "Ana", None).unwrap();
  let id = client(&server, DonePolicy::Redo)
    .create_thing(&input)
    .await
    .unwrap();
  assert_eq!(id, "thing-1");
}

#[tokio::test]
async fn list_planned_queries_by_creation_time_descending() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/v1/things"))
    .and(query_param("status", "planned"))
    .and(query_param("orderBy", "createdAt"))
    .and(query_param("dir", "desc"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!([
      planned_doc("thing-2", "Picnic", 1_700_000_100_000i64),
      planned_doc("thing-1", "Museum", 1_700_000_000_000i64),
    ])))
    .mount(&server)
    .await;

  let things = client(&server, DonePolicy::Redo).list_planned().await.unwrap();
  assert_eq!(things.len(), 2);
  assert!(things.iter().all(|t| t.status == ThingStatus::Planned));
  assert!(things.iter().all(|t| t.done_at.is_none()));
  // Server order is preserved; timestamps resolve from epoch millis.
  assert_eq!(things[0].id, "thing-2");
  assert_eq!(
    things[1].created_at,
    DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
  );
}

#[tokio::test]
async fn list_done_queries_by_completion_time_descending() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/v1/things"))
    .and(query_param("status", "done"))
    .and(query_param("orderBy", "doneAt"))
    .and(query_param("dir", "desc"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!([done_doc(
      "thing-3",
      1_700_000_000_000i64,
      1_700_000_200_000i64
    )])))
    .mount(&server)
    .await;

  let things = client(&server, DonePolicy::Redo).list_done().await.unwrap();
  assert_eq!(things.len(), 1);
  let thing = &things[0];
  assert!(thing.is_done());
  assert_eq!(
    thing.done_at,
    Some(DateTime::from_timestamp_millis(1_700_000_200_000).unwrap())
  );
  assert!(thing.done_at.unwrap() >= thing.created_at);
  assert_eq!(thing.photo_url.as_deref(), Some("https://photos.example/1.jpg"));
}

#[tokio::test]
async fn get_thing_missing_is_absent_not_an_error() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/v1/things/no-such-id"))
    .respond_with(ResponseTemplate::new(404))
    .mount(&server)
    .await;

  let thing = client(&server, DonePolicy::Redo)
    .get_thing("no-such-id")
    .await
    .unwrap();
  assert!(thing.is_none());
}

#[tokio::test]
async fn mark_done_without_photo_omits_the_field() {
  let server = MockServer::start().await;
  Mock::given(method("PATCH"))
    .and(path("/v1/things/thing-1"))
    .and(body_json(json!({ "status": "done" })))
    .respond_with(ResponseTemplate::new(204))
    .expect(1)
    .mount(&server)
    .await;

  client(&server, DonePolicy::Redo)
    .mark_done("thing-1", None)
    .await
    .unwrap();
}

#[tokio::test]
async fn mark_done_with_photo_sends_the_url() {
  let server = MockServer::start().await;
  Mock::given(method("PATCH"))
    .and(path("/v1/things/thing-1"))
    .and(body_json(json!({
      "status": "done",
      "photoUrl": "https://photos.example/2.jpg",
    })))
    .respond_with(ResponseTemplate::new(204))
    .expect(1)
    .mount(&server)
    .await;

  client(&server, DonePolicy::Redo)
    .mark_done("thing-1", Some("https://photos.example/2.jpg"))
    .await
    .unwrap();
}

#[tokio::test]
async fn keep_first_policy_skips_rewrite_of_a_done_thing() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/v1/things/thing-3"))
    .respond_with(ResponseTemplate::new(200).set_body_json(done_doc(
      "thing-3",
      1_700_000_000_000i64,
      1_700_000_200_000i64,
    )))
    .expect(1)
    .mount(&server)
    .await;
  Mock::given(method("PATCH"))
    .and(path("/v1/things/thing-3"))
    .respond_with(ResponseTemplate::new(204))
    .expect(0)
    .mount(&server)
    .await;

  client(&server, DonePolicy::KeepFirst)
    .mark_done("thing-3", None)
    .await
    .unwrap();
}

#[tokio::test]
async fn keep_first_policy_still_writes_a_photo_backfill() {
  let server = MockServer::start().await;
  Mock::given(method("PATCH"))
    .and(path("/v1/things/thing-3"))
    .and(body_json(json!({
      "status": "done",
      "photoUrl": "https://photos.example/3.jpg",
    })))
    .respond_with(ResponseTemplate::new(204))
    .expect(1)
    .mount(&server)
    .await;

  client(&server, DonePolicy::KeepFirst)
    .mark_done("thing-3", Some("https://photos.example/3.jpg"))
    .await
    .unwrap();
}

#[tokio::test]
async fn server_failure_surfaces_as_status_error() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/v1/things"))
    .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
    .mount(&server)
    .await;

  let err = client(&server, DonePolicy::Redo)
    .list_planned()
    .await
    .unwrap_err();
  match err {
    StoreError::Status { status, body } => {
      assert_eq!(status.as_u16(), 500);
      assert_eq!(body, "boom");
    }
    other => panic!("expected status error, got {other:?}"),
  }
}

#[tokio::test]
async fn out_of_range_timestamp_is_an_invalid_document() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/v1/things"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!([
      planned_doc("thing-1", "Museum", i64::MAX),
    ])))
    .mount(&server)
    .await;

  let err = client(&server, DonePolicy::Redo)
    .list_planned()
    .await
    .unwrap_err();
  assert!(matches!(err, StoreError::InvalidDocument(_)));
}

// ─── Profiles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_profile_missing_is_absent() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/v1/users/uid-9"))
    .respond_with(ResponseTemplate::new(404))
    .mount(&server)
    .await;

  let profile = client(&server, DonePolicy::Redo)
    .get_profile("uid-9")
    .await
    .unwrap();
  assert!(profile.is_none());
}

#[tokio::test]
async fn upsert_profile_rereads_the_stored_document() {
  let server = MockServer::start().await;
  Mock::given(method("PUT"))
    .and(path("/v1/users/uid-1"))
    .and(body_json(json!({
      "email": "ana@example.com",
      "displayName": "Ana",
      "partnerName": "Bea",
    })))
    .respond_with(ResponseTemplate::new(204))
    .expect(1)
    .mount(&server)
    .await;
  Mock::given(method("GET"))
    .and(path("/v1/users/uid-1"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "uid": "uid-1",
      "email": "ana@example.com",
      "displayName": "Ana",
      "partnerName": "Bea",
      // Server-resolved creation time, only observable on the re-read.
      "createdAt": 1_690_000_000_000i64,
    })))
    .expect(1)
    .mount(&server)
    .await;

  let upsert = ProfileUpsert::new("uid-1", "ana@example.com", "Ana", "Bea").unwrap();
  let profile = client(&server, DonePolicy::Redo)
    .upsert_profile(&upsert)
    .await
    .unwrap();
  assert_eq!(profile.uid, "uid-1");
  assert_eq!(
    profile.created_at,
    DateTime::from_timestamp_millis(1_690_000_000_000).unwrap()
  );
}
