//! UserProfile — a pre-provisioned identity record, one per account.
//!
//! Profile existence is NOT guaranteed at signup; profiles are provisioned
//! separately (see the `provision` subcommand). A logged-in user with no
//! profile record is a valid, degraded state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Partner display name used whenever no profile (or no partner name) has
/// been provisioned for the signed-in user.
pub const DEFAULT_PARTNER_NAME: &str = "Partner";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
  /// Matches the identity provider's account id.
  pub uid:          String,
  pub email:        String,
  /// Shown as `added_by` on things this user creates.
  pub display_name: String,
  /// The display name shown to this user for their counterpart.
  pub partner_name: String,
  pub created_at:   DateTime<Utc>,
}

/// Validated input for the idempotent profile upsert, keyed on uid.
#[derive(Debug, Clone)]
pub struct ProfileUpsert {
  uid:          String,
  email:        String,
  display_name: String,
  partner_name: String,
}

impl ProfileUpsert {
  pub fn new(
    uid: &str,
    email: &str,
    display_name: &str,
    partner_name: &str,
  ) -> Result<Self> {
    let uid = uid.trim();
    if uid.is_empty() {
      return Err(Error::EmptyUid);
    }
    let display_name = display_name.trim();
    if display_name.is_empty() {
      return Err(Error::EmptyDisplayName);
    }
    Ok(Self {
      uid: uid.to_owned(),
      email: email.trim().to_owned(),
      display_name: display_name.to_owned(),
      partner_name: partner_name.trim().to_owned(),
    })
  }

  pub fn uid(&self) -> &str { &self.uid }

  pub fn email(&self) -> &str { &self.email }

  pub fn display_name(&self) -> &str { &self.display_name }

  pub fn partner_name(&self) -> &str { &self.partner_name }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn upsert_requires_uid_and_display_name() {
    assert_eq!(
      ProfileUpsert::new("", "a@b.c", "Ana", "Bea").unwrap_err(),
      Error::EmptyUid
    );
    assert_eq!(
      ProfileUpsert::new("uid-1", "a@b.c", " ", "Bea").unwrap_err(),
      Error::EmptyDisplayName
    );
    let upsert = ProfileUpsert::new(" uid-1 ", "a@b.c", "Ana", "Bea").unwrap();
    assert_eq!(upsert.uid(), "uid-1");
  }
}
