//! [`SessionContext`] — the single owned view of authentication + profile
//! state, reacting to the identity provider's auth-state stream.
//!
//! Constructed once at startup and injected into every consumer. One spawned
//! task is the sole writer; everything else reads snapshots through
//! [`SessionContext::current`] or watches via [`SessionContext::subscribe`].

use std::sync::Arc;

use tandem_core::{
  session::{AuthUser, SessionState},
  store::RecordStore,
};
use tokio::{sync::watch, task::JoinHandle};

pub struct SessionContext {
  state_rx: watch::Receiver<SessionState>,
  task:     JoinHandle<()>,
}

impl SessionContext {
  /// Subscribe to the provider's auth-state stream and start resolving
  /// profiles. The stream's current value counts as the first notification
  /// and is processed immediately.
  pub fn start<S>(auth_rx: watch::Receiver<Option<AuthUser>>, store: Arc<S>) -> Self
  where
    S: RecordStore + 'static,
  {
    let (state_tx, state_rx) = watch::channel(SessionState::initial());
    let task = tokio::spawn(run(auth_rx, store, state_tx));
    Self { state_rx, task }
  }

  /// A pure read of the current session snapshot; never blocks.
  pub fn current(&self) -> SessionState {
    self.state_rx.borrow().clone()
  }

  pub fn subscribe(&self) -> watch::Receiver<SessionState> {
    self.state_rx.clone()
  }

  /// Stop listening to the provider stream. Consuming `self` makes the
  /// exactly-once teardown requirement a compile-time property; after this,
  /// no further session writes can occur.
  pub fn teardown(self) {
    self.task.abort();
  }
}

async fn run<S>(
  mut auth_rx: watch::Receiver<Option<AuthUser>>,
  store: Arc<S>,
  state_tx: watch::Sender<SessionState>,
) where
  S: RecordStore + 'static,
{
  loop {
    let user = auth_rx.borrow_and_update().clone();
    match user {
      Some(user) => {
        // Back to loading until this user's profile lookup resolves.
        state_tx.send_replace(SessionState {
          user: Some(user.clone()),
          profile: None,
          loading: true,
        });

        // A lookup failure degrades to "no profile" rather than failing
        // the whole session.
        let profile = match store.get_profile(&user.uid).await {
          Ok(profile) => profile,
          Err(error) => {
            tracing::warn!(uid = %user.uid, %error, "profile lookup failed, continuing without a profile");
            None
          }
        };

        // If the provider reported a newer state while the lookup was in
        // flight, this result is stale; the next iteration handles the
        // current value.
        if !auth_rx.has_changed().unwrap_or(false) {
          state_tx.send_replace(SessionState {
            user: Some(user),
            profile,
            loading: false,
          });
        }
      }
      None => {
        state_tx.send_replace(SessionState {
          user: None,
          profile: None,
          loading: false,
        });
      }
    }

    if auth_rx.changed().await.is_err() {
      break;
    }
  }
}
