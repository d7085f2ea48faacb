//! Thing — a planned or completed shared activity.
//!
//! Things are created in `planned` state and transition once, monotonically,
//! to `done`. There is no deletion path; after `done` the only further
//! mutation is a photo-URL backfill.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThingStatus {
  Planned,
  Done,
}

impl ThingStatus {
  pub fn is_done(self) -> bool { matches!(self, Self::Done) }
}

// ─── Entity ──────────────────────────────────────────────────────────────────

/// A shared activity as read back from the record store.
///
/// Invariant (enforced by the store, relied on here): `done_at` is present
/// if and only if `status` is [`ThingStatus::Done`]. `photo_url` is only
/// meaningful on done things.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thing {
  /// Opaque id assigned by the record store on creation; immutable.
  pub id:         String,
  pub title:      String,
  pub notes:      Option<String>,
  pub status:     ThingStatus,
  /// Server-assigned creation time; immutable.
  pub created_at: DateTime<Utc>,
  pub done_at:    Option<DateTime<Utc>>,
  pub photo_url:  Option<String>,
  /// Display name of the user who created the thing; immutable.
  pub added_by:   String,
}

impl Thing {
  pub fn is_done(&self) -> bool { self.status.is_done() }
}

// ─── Creation input ──────────────────────────────────────────────────────────

/// Validated input for creating a thing. Construction trims whitespace and
/// rejects empty required fields, so no store round-trip is wasted on input
/// the backend would refuse.
#[derive(Debug, Clone)]
pub struct NewThing {
  title:    String,
  added_by: String,
  notes:    Option<String>,
}

impl NewThing {
  pub fn new(title: &str, added_by: &str, notes: Option<&str>) -> Result<Self> {
    let title = title.trim();
    if title.is_empty() {
      return Err(Error::EmptyTitle);
    }
    let added_by = added_by.trim();
    if added_by.is_empty() {
      return Err(Error::EmptyDisplayName);
    }
    let notes = notes
      .map(str::trim)
      .filter(|n| !n.is_empty())
      .map(str::to_owned);
    Ok(Self {
      title: title.to_owned(),
      added_by: added_by.to_owned(),
      notes,
    })
  }

  pub fn title(&self) -> &str { &self.title }

  pub fn added_by(&self) -> &str { &self.added_by }

  pub fn notes(&self) -> Option<&str> { self.notes.as_deref() }
}

// ─── Completion policy ───────────────────────────────────────────────────────

/// What a repeated mark-done call should do.
///
/// The backend re-stamps `done_at` on every done-transition write, so calling
/// twice under [`DonePolicy::Redo`] moves the completion time.
/// [`DonePolicy::KeepFirst`] reads before writing and skips the photo-less
/// write when the thing is already done. Which of the two is intended is an
/// open product question; both are kept available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DonePolicy {
  #[default]
  Redo,
  KeepFirst,
}

// ─── Tests ───────────────────────────────────────────────────────────────────
