//! Error types for the backend clients.

use reqwest::StatusCode;
use thiserror::Error;

// ─── Record store ────────────────────────────────────────────────────────────

/// A failure talking to the hosted record store.
///
/// Callers surface these as a screen-level error state with a manual retry;
/// nothing here is retried automatically.
#[derive(Debug, Error)]
pub enum StoreError {
  /// Network-level failure: connect, timeout, or reading the body.
  #[error("store request failed: {0}")]
  Http(#[from] reqwest::Error),

  /// The store answered with an unexpected status.
  #[error("store replied {status}: {body}")]
  Status { status: StatusCode, body: String },

  /// A stored document could not be translated into an entity.
  #[error("invalid document: {0}")]
  InvalidDocument(String),
}

// ─── Identity provider ───────────────────────────────────────────────────────

/// The identity provider's fixed set of sign-in rejection codes. Every code
/// outside the known set collapses to [`AuthErrorCode::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorCode {
  InvalidEmail,
  UserNotFound,
  WrongPassword,
  TooManyRequests,
  Other,
}

impl AuthErrorCode {
  pub(crate) fn from_wire(code: &str) -> Self {
    match code {
      "invalid-email" => Self::InvalidEmail,
      "user-not-found" => Self::UserNotFound,
      "wrong-password" => Self::WrongPassword,
      "too-many-requests" => Self::TooManyRequests,
      _ => Self::Other,
    }
  }

  /// The message shown on the sign-in screen. Wrong-password and
  /// user-not-found are deliberately indistinguishable.
  pub fn user_message(self) -> &'static str {
    match self {
      Self::InvalidEmail => "Invalid email address format.",
      Self::UserNotFound | Self::WrongPassword => "Invalid email or password.",
      Self::TooManyRequests => {
        "Too many failed login attempts. Please try again later."
      }
      Self::Other => "Sign in failed. Please check your credentials.",
    }
  }
}

/// A failure talking to the identity provider.
#[derive(Debug, Error)]
pub enum AuthError {
  #[error("auth request failed: {0}")]
  Http(#[from] reqwest::Error),

  /// The provider rejected the credentials with one of its fixed codes.
  #[error("sign-in rejected ({code:?})")]
  Rejected { code: AuthErrorCode },
}

impl AuthError {
  /// The user-facing message for this failure.
  pub fn user_message(&self) -> &'static str {
    match self {
      Self::Rejected { code } => code.user_message(),
      Self::Http(_) => AuthErrorCode::Other.user_message(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn wire_codes_map_to_the_fixed_set() {
    assert_eq!(
      AuthErrorCode::from_wire("user-not-found"),
      AuthErrorCode::UserNotFound
    );
    assert_eq!(
      AuthErrorCode::from_wire("expired-token"),
      AuthErrorCode::Other
    );
  }

  #[test]
  fn user_not_found_and_wrong_password_share_a_message() {
    assert_eq!(
      AuthErrorCode::UserNotFound.user_message(),
      "Invalid email or password."
    );
    assert_eq!(
      AuthErrorCode::WrongPassword.user_message(),
      "Invalid email or password."
    );
  }
}
