//! Session-context tests against an in-memory store and a hand-driven
//! auth-state stream.

use std::{
  collections::HashMap,
  sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
  },
  time::Duration,
};

use chrono::Utc;
use tandem_client::SessionContext;
use tandem_core::{
  profile::{DEFAULT_PARTNER_NAME, ProfileUpsert, UserProfile},
  session::{AuthUser, SessionState},
  store::RecordStore,
  thing::{NewThing, Thing},
};
use thiserror::Error;
use tokio::sync::watch;

// ─── Fake store ──────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
#[error("fake store failure")]
struct FakeError;

/// Only the profile surface matters to the session context; the thing
/// operations are inert.
#[derive(Default)]
struct FakeStore {
  profiles:     Mutex<HashMap<String, UserProfile>>,
  fail_lookups: AtomicBool,
}

impl FakeStore {
  fn with_profile(profile: UserProfile) -> Self {
    let store = Self::default();
    store
      .profiles
      .lock()
      .unwrap()
      .insert(profile.uid.clone(), profile);
    store
  }
}

impl RecordStore for FakeStore {
  type Error = FakeError;

  fn create_thing(
    &self,
    _input: &NewThing,
  ) -> impl Future<Output = Result<String, FakeError>> + Send + '_ {
    async { Ok(String::new()) }
  }

  async fn list_planned(&self) -> Result<Vec<Thing>, FakeError> {
    Ok(Vec::new())
  }

  async fn list_done(&self) -> Result<Vec<Thing>, FakeError> {
    Ok(Vec::new())
  }

  async fn get_thing(&self, _id: &str) -> Result<Option<Thing>, FakeError> {
    Ok(None)
  }

  async fn mark_done(
    &self,
    _id: &str,
    _photo_url: Option<&str>,
  ) -> Result<(), FakeError> {
    Ok(())
  }

  async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, FakeError> {
    if self.fail_lookups.load(Ordering::SeqCst) {
      return Err(FakeError);
    }
    Ok(self.profiles.lock().unwrap().get(uid).cloned())
  }

  async fn upsert_profile(
    &self,
    _input: &ProfileUpsert,
  ) -> Result<UserProfile, FakeError> {
    Err(FakeError)
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn user(uid: &str) -> AuthUser {
  AuthUser {
    uid:   uid.into(),
    email: format!("{uid}@example.com"),
  }
}

fn profile(uid: &str, partner_name: &str) -> UserProfile {
  UserProfile {
    uid:          uid.into(),
    email:        format!("{uid}@example.com"),
    display_name: "Ana".into(),
    partner_name: partner_name.into(),
    created_at:   Utc::now(),
  }
}

/// Wait (bounded) for the session to publish a state matching `pred`.
async fn wait_for(
  rx: &mut watch::Receiver<SessionState>,
  pred: impl Fn(&SessionState) -> bool,
) -> SessionState {
  tokio::time::timeout(Duration::from_secs(2), async {
    loop {
      let state = rx.borrow_and_update().clone();
      if pred(&state) {
        return state;
      }
      rx.changed().await.expect("session task gone");
    }
  })
  .await
  .expect("session never reached the expected state")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn settles_unauthenticated_from_an_empty_initial_state() {
  let (_auth_tx, auth_rx) = watch::channel(None);
  let session = SessionContext::start(auth_rx, Arc::new(FakeStore::default()));

  let mut rx = session.subscribe();
  let state = wait_for(&mut rx, |s| !s.loading).await;
  assert!(state.user.is_none());
  assert!(state.profile.is_none());

  session.teardown();
}

#[tokio::test]
async fn settles_authenticated_with_profile() {
  let (auth_tx, auth_rx) = watch::channel(Some(user("uid-1")));
  let store = Arc::new(FakeStore::with_profile(profile("uid-1", "Bea")));
  let session = SessionContext::start(auth_rx, store);

  let mut rx = session.subscribe();
  let state = wait_for(&mut rx, |s| !s.loading).await;
  assert!(state.is_authenticated());
  assert_eq!(state.display_name(), Some("Ana"));
  assert_eq!(state.partner_name(), "Bea");

  drop(auth_tx);
  session.teardown();
}

#[tokio::test]
async fn missing_profile_is_a_valid_degraded_state() {
  let (auth_tx, auth_rx) = watch::channel(Some(user("uid-1")));
  let session = SessionContext::start(auth_rx, Arc::new(FakeStore::default()));

  let mut rx = session.subscribe();
  let state = wait_for(&mut rx, |s| !s.loading).await;
  assert!(state.is_authenticated());
  assert!(state.profile.is_none());
  assert_eq!(state.partner_name(), DEFAULT_PARTNER_NAME);

  drop(auth_tx);
  session.teardown();
}

#[tokio::test]
async fn profile_lookup_failure_degrades_instead_of_failing() {
  let store = FakeStore::default();
  store.fail_lookups.store(true, Ordering::SeqCst);

  let (auth_tx, auth_rx) = watch::channel(Some(user("uid-1")));
  let session = SessionContext::start(auth_rx, Arc::new(store));

  let mut rx = session.subscribe();
  let state = wait_for(&mut rx, |s| !s.loading).await;
  assert!(state.is_authenticated());
  assert!(state.profile.is_none());

  drop(auth_tx);
  session.teardown();
}

#[tokio::test]
async fn sign_out_clears_the_profile() {
  let (auth_tx, auth_rx) = watch::channel(Some(user("uid-1")));
  let store = Arc::new(FakeStore::with_profile(profile("uid-1", "Bea")));
  let session = SessionContext::start(auth_rx, store);

  let mut rx = session.subscribe();
  wait_for(&mut rx, |s| !s.loading && s.is_authenticated()).await;

  auth_tx.send(None).unwrap();
  let state = wait_for(&mut rx, |s| !s.loading && !s.is_authenticated()).await;
  assert!(state.profile.is_none());

  session.teardown();
}

#[tokio::test]
async fn rapid_user_changes_settle_on_the_last_one() {
  let store = FakeStore::with_profile(profile("uid-2", "Bea"));
  store
    .profiles
    .lock()
    .unwrap()
    .insert("uid-1".into(), profile("uid-1", "Cleo"));

  let (auth_tx, auth_rx) = watch::channel(None);
  let session = SessionContext::start(auth_rx, Arc::new(store));
  let mut rx = session.subscribe();

  // Two notifications in quick succession; only the later one may win.
  auth_tx.send(Some(user("uid-1"))).unwrap();
  auth_tx.send(Some(user("uid-2"))).unwrap();

  let state = wait_for(&mut rx, |s| {
    !s.loading && s.user.as_ref().is_some_and(|u| u.uid == "uid-2")
  })
  .await;
  assert_eq!(state.partner_name(), "Bea");

  drop(auth_tx);
  session.teardown();
}
