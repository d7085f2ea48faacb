//! Integration tests for [`AuthClient`] against a mock identity provider.

use serde_json::json;
use tandem_client::{AuthClient, AuthConfig, AuthError, AuthErrorCode};
use wiremock::{
  Mock, MockServer, ResponseTemplate,
  matchers::{body_json, method, path},
};

fn client(server: &MockServer) -> AuthClient {
  AuthClient::new(AuthConfig {
    base_url: server.uri(),
    api_key: "test-key".into(),
  })
  .expect("auth client")
}

#[tokio::test]
async fn subscribers_see_the_initial_state_immediately() {
  let server = MockServer::start().await;
  let auth = client(&server);
  assert!(auth.subscribe().borrow().is_none());
  assert!(auth.current_user().is_none());
}

#[tokio::test]
async fn sign_in_publishes_the_user_to_subscribers() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/auth/v1/session"))
    .and(body_json(json!({
      "email": "ana@example.com",
      "password": "hunter2",
    })))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "uid": "uid-1",
      "email": "ana@example.com",
    })))
    .mount(&server)
    .await;

  let auth = client(&server);
  let rx = auth.subscribe();

  let user = auth.sign_in("ana@example.com", "hunter2").await.unwrap();
  assert_eq!(user.uid, "uid-1");
  assert_eq!(rx.borrow().as_ref().map(|u| u.uid.clone()), Some("uid-1".into()));
}

#[tokio::test]
async fn unknown_email_maps_to_the_shared_credentials_message() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/auth/v1/session"))
    .respond_with(
      ResponseTemplate::new(401).set_body_json(json!({ "error": "user-not-found" })),
    )
    .mount(&server)
    .await;

  let err = client(&server)
    .sign_in("nobody@example.com", "hunter2")
    .await
    .unwrap_err();
  match &err {
    AuthError::Rejected { code } => assert_eq!(*code, AuthErrorCode::UserNotFound),
    other => panic!("expected rejection, got {other:?}"),
  }
  assert_eq!(err.user_message(), "Invalid email or password.");
}

#[tokio::test]
async fn unrecognized_codes_collapse_to_other() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/auth/v1/session"))
    .respond_with(
      ResponseTemplate::new(403).set_body_json(json!({ "error": "account-frozen" })),
    )
    .mount(&server)
    .await;

  let err = client(&server)
    .sign_in("ana@example.com", "hunter2")
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    AuthError::Rejected {
      code: AuthErrorCode::Other
    }
  ));
}

#[tokio::test]
async fn sign_out_publishes_none() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/auth/v1/session"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "uid": "uid-1",
      "email": "ana@example.com",
    })))
    .mount(&server)
    .await;
  Mock::given(method("DELETE"))
    .and(path("/auth/v1/session"))
    .respond_with(ResponseTemplate::new(204))
    .mount(&server)
    .await;

  let auth = client(&server);
  auth.sign_in("ana@example.com", "hunter2").await.unwrap();
  assert!(auth.current_user().is_some());

  auth.sign_out().await.unwrap();
  assert!(auth.current_user().is_none());
}
