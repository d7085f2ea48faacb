//! [`AuthClient`] — the hosted identity provider.
//!
//! Exposes email+password sign-in, sign-out, and a subscribable auth-state
//! stream. The stream is a `watch` channel over `Option<AuthUser>`: every
//! subscriber observes the current value immediately and each change after
//! that, which is exactly the provider's "fires once with the initial state"
//! notification contract.

use std::{future::Future, time::Duration};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tandem_core::session::AuthUser;
use tokio::sync::watch;

use crate::error::{AuthError, AuthErrorCode};

/// The sign-in/sign-out surface of the identity provider, abstracted so the
/// UI can be driven by a fake provider in tests. The auth-state stream is
/// obtained separately (see [`AuthClient::subscribe`]).
pub trait Authenticator: Send + Sync {
  fn sign_in<'a>(
    &'a self,
    email: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<AuthUser, AuthError>> + Send + 'a;

  fn sign_out(&self) -> impl Future<Output = Result<(), AuthError>> + Send + '_;
}

/// Connection settings for the identity provider.
#[derive(Debug, Clone)]
pub struct AuthConfig {
  pub base_url: String,
  pub api_key:  String,
}

/// Async HTTP client for the identity provider, owning the auth-state stream.
pub struct AuthClient {
  client:   Client,
  config:   AuthConfig,
  state_tx: watch::Sender<Option<AuthUser>>,
}

#[derive(Serialize)]
struct Credentials<'a> {
  email:    &'a str,
  password: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

impl AuthClient {
  pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    let (state_tx, _) = watch::channel(None);
    Ok(Self {
      client,
      config,
      state_tx,
    })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/auth/v1{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// Subscribe to auth-state changes. The receiver's current value is the
  /// present state; [`watch::Receiver::changed`] resolves on every sign-in
  /// and sign-out after that.
  pub fn subscribe(&self) -> watch::Receiver<Option<AuthUser>> {
    self.state_tx.subscribe()
  }

  pub fn current_user(&self) -> Option<AuthUser> {
    self.state_tx.borrow().clone()
  }

  /// Sign in with email and password. On success the new user is published
  /// to all auth-state subscribers.
  pub async fn sign_in(
    &self,
    email: &str,
    password: &str,
  ) -> Result<AuthUser, AuthError> {
    let resp = self
      .client
      .post(self.url("/session"))
      .header("x-api-key", &self.config.api_key)
      .json(&Credentials { email, password })
      .send()
      .await?;

    if !resp.status().is_success() {
      let body = resp.text().await.unwrap_or_default();
      let code = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| AuthErrorCode::from_wire(&b.error))
        .unwrap_or(AuthErrorCode::Other);
      return Err(AuthError::Rejected { code });
    }

    let user: AuthUser = resp.json().await?;
    self.state_tx.send_replace(Some(user.clone()));
    Ok(user)
  }

  /// Sign out. Publishes `None` to all auth-state subscribers on success.
  pub async fn sign_out(&self) -> Result<(), AuthError> {
    let resp = self
      .client
      .delete(self.url("/session"))
      .header("x-api-key", &self.config.api_key)
      .send()
      .await?;
    resp.error_for_status()?;
    self.state_tx.send_replace(None);
    Ok(())
  }
}

impl Authenticator for AuthClient {
  async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
    AuthClient::sign_in(self, email, password).await
  }

  async fn sign_out(&self) -> Result<(), AuthError> {
    AuthClient::sign_out(self).await
  }
}
