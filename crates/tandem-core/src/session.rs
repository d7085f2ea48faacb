//! Session — the process-wide view of "who is using the app right now".
//!
//! Exactly one live instance exists per running application, written only by
//! the auth-stream task in `tandem-client`; everything else reads snapshots.

use serde::{Deserialize, Serialize};

use crate::profile::{DEFAULT_PARTNER_NAME, UserProfile};

/// The authenticated-user handle reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
  pub uid:   String,
  pub email: String,
}

/// A snapshot of authentication + profile state.
///
/// Settles to exactly one of: authenticated with profile, authenticated
/// without profile (degraded), or unauthenticated. `loading` is only true
/// before the provider's first notification has been fully processed, or
/// while a newly-reported user's profile lookup is still in flight.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
  pub user:    Option<AuthUser>,
  pub profile: Option<UserProfile>,
  pub loading: bool,
}

impl SessionState {
  /// The state before the identity provider has reported anything.
  pub fn initial() -> Self {
    Self {
      user: None,
      profile: None,
      loading: true,
    }
  }

  pub fn is_authenticated(&self) -> bool { self.user.is_some() }

  /// Display name of the signed-in user, if their profile resolved.
  pub fn display_name(&self) -> Option<&str> {
    self.profile.as_ref().map(|p| p.display_name.as_str())
  }

  /// Partner display name, falling back to [`DEFAULT_PARTNER_NAME`] when no
  /// profile (or an empty partner name) is available.
  pub fn partner_name(&self) -> &str {
    self
      .profile
      .as_ref()
      .map(|p| p.partner_name.as_str())
      .filter(|n| !n.is_empty())
      .unwrap_or(DEFAULT_PARTNER_NAME)
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;

  fn profile(partner_name: &str) -> UserProfile {
    UserProfile {
      uid:          "uid-1".into(),
      email:        "ana@example.com".into(),
      display_name: "Ana".into(),
      partner_name: partner_name.into(),
      created_at:   Utc::now(),
    }
  }

  #[test]
  fn partner_name_falls_back_without_profile() {
    let state = SessionState {
      user: Some(AuthUser {
        uid:   "uid-1".into(),
        email: "ana@example.com".into(),
      }),
      profile: None,
      loading: false,
    };
    assert_eq!(state.partner_name(), DEFAULT_PARTNER_NAME);
    assert_eq!(state.display_name(), None);
  }

  #[test]
  fn partner_name_falls_back_on_empty_string() {
    let state = SessionState {
      user: None,
      profile: Some(profile("")),
      loading: false,
    };
    assert_eq!(state.partner_name(), DEFAULT_PARTNER_NAME);
  }

  #[test]
  fn partner_name_from_profile() {
    let state = SessionState {
      user: None,
      profile: Some(profile("Bea")),
      loading: false,
    };
    assert_eq!(state.partner_name(), "Bea");
  }
}
