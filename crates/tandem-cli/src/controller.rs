//! Per-screen view-state controllers.
//!
//! Each screen owns a small state machine: `Idle → Loading → Ready | Failed`,
//! re-entering `Loading` whenever its trigger condition changes. Fetches are
//! correlated by a generation token captured at fetch start; a completion
//! whose token no longer matches the controller's current generation belongs
//! to a superseded fetch and is discarded, so a late completion can never
//! overwrite a newer result.

use tandem_core::{
  Error as ValidationError,
  session::SessionState,
  thing::{NewThing, Thing},
};

// ─── Fetch state ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
  Idle,
  Loading,
  Ready(T),
  Failed(String),
}

impl<T> Default for FetchState<T> {
  fn default() -> Self { Self::Idle }
}

impl<T> FetchState<T> {
  pub fn is_loading(&self) -> bool { matches!(self, Self::Loading) }

  pub fn data(&self) -> Option<&T> {
    match self {
      Self::Ready(data) => Some(data),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&str> {
    match self {
      Self::Failed(message) => Some(message),
      _ => None,
    }
  }
}

/// Which list controllers a mutation invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
  Planned,
  Done,
}

// ─── List controller ─────────────────────────────────────────────────────────

/// State machine for the planned and done list screens. Owns its fetched
/// collection privately — another controller's writes become visible only
/// through an invalidation-triggered refetch.
#[derive(Debug, Default)]
pub struct ListController {
  pub state:  FetchState<Vec<Thing>>,
  pub cursor: usize,
  generation: u64,
  dirty:      bool,
}

impl ListController {
  pub fn new() -> Self { Self::default() }

  /// Start a fetch: enters `Loading` and returns the token the completion
  /// must present.
  pub fn begin(&mut self) -> u64 {
    self.generation += 1;
    self.dirty = false;
    self.state = FetchState::Loading;
    self.generation
  }

  /// Apply a fetch completion. Returns `false` (and changes nothing) when
  /// the token is stale.
  pub fn complete(
    &mut self,
    token: u64,
    result: Result<Vec<Thing>, String>,
  ) -> bool {
    if token != self.generation {
      return false;
    }
    self.state = match result {
      Ok(things) => {
        self.cursor = self.cursor.min(things.len().saturating_sub(1));
        FetchState::Ready(things)
      }
      Err(message) => FetchState::Failed(message),
    };
    true
  }

  /// Mark the cached collection stale; the owner refetches when (or while)
  /// this list's screen is active.
  pub fn invalidate(&mut self) { self.dirty = true; }

  pub fn needs_fetch(&self) -> bool {
    self.dirty || matches!(self.state, FetchState::Idle)
  }

  /// Supersede any in-flight fetch and forget the collection. Used when the
  /// session becomes unauthenticated: a completion that started under the
  /// old session must not land.
  pub fn reset(&mut self) {
    self.generation += 1;
    self.dirty = false;
    self.cursor = 0;
    self.state = FetchState::Idle;
  }

  pub fn things(&self) -> &[Thing] {
    self.state.data().map(Vec::as_slice).unwrap_or_default()
  }

  pub fn selected(&self) -> Option<&Thing> { self.things().get(self.cursor) }

  pub fn cursor_down(&mut self) {
    let len = self.things().len();
    if len > 0 && self.cursor + 1 < len {
      self.cursor += 1;
    }
  }

  pub fn cursor_up(&mut self) {
    if self.cursor > 0 {
      self.cursor -= 1;
    }
  }
}

// ─── Detail controller ───────────────────────────────────────────────────────

/// State machine for the detail modal / memory detail screen.
///
/// `Ready(None)` is the not-found presentation: a lookup for a missing id —
/// or, when `require_done` is set, for a thing that is still planned — is
/// absence, not a store error.
#[derive(Debug, Default)]
pub struct DetailController {
  pub thing_id:     Option<String>,
  pub require_done: bool,
  pub state:        FetchState<Option<Thing>>,
  /// A mark-done write is in flight; blocks a second trigger.
  pub marking:      bool,
  /// Buffer for the photo-URL entry overlay; `Some` while it is open.
  pub photo_entry:  Option<String>,
  generation:       u64,
}

impl DetailController {
  /// Point the controller at a thing and enter `Loading`.
  pub fn open(&mut self, id: String, require_done: bool) -> u64 {
    self.thing_id = Some(id);
    self.require_done = require_done;
    self.marking = false;
    self.photo_entry = None;
    self.begin()
  }

  /// Re-enter `Loading` for the current id (retry, post-mutation refresh).
  pub fn begin(&mut self) -> u64 {
    self.generation += 1;
    self.state = FetchState::Loading;
    self.generation
  }

  pub fn complete(
    &mut self,
    token: u64,
    result: Result<Option<Thing>, String>,
  ) -> bool {
    if token != self.generation {
      return false;
    }
    self.state = match result {
      Ok(Some(thing)) if self.require_done && !thing.is_done() => {
        FetchState::Ready(None)
      }
      Ok(found) => FetchState::Ready(found),
      Err(message) => FetchState::Failed(message),
    };
    true
  }

  /// Close the screen; supersedes any in-flight fetch so it cannot write
  /// into a reopened detail.
  pub fn close(&mut self) {
    self.generation += 1;
    self.thing_id = None;
    self.marking = false;
    self.photo_entry = None;
    self.state = FetchState::Idle;
  }

  pub fn thing(&self) -> Option<&Thing> {
    self.state.data().and_then(Option::as_ref)
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self.state, FetchState::Ready(None))
  }
}

// ─── Create-form controller ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreateField {
  #[default]
  Title,
  Notes,
}

/// State for the add-thing form.
#[derive(Debug, Default)]
pub struct CreateController {
  pub title:      String,
  pub notes:      String,
  pub field:      CreateField,
  /// A submission is in flight; re-submission is disabled until it lands.
  pub submitting: bool,
  pub error:      Option<String>,
}

impl CreateController {
  pub fn reset(&mut self) { *self = Self::default(); }

  pub fn toggle_field(&mut self) {
    self.field = match self.field {
      CreateField::Title => CreateField::Notes,
      CreateField::Notes => CreateField::Title,
    };
  }

  pub fn input(&mut self, c: char) {
    match self.field {
      CreateField::Title => self.title.push(c),
      CreateField::Notes => self.notes.push(c),
    }
  }

  pub fn backspace(&mut self) {
    match self.field {
      CreateField::Title => self.title.pop(),
      CreateField::Notes => self.notes.pop(),
    };
  }

  /// Submission is disabled until the signed-in user's profile resolves
  /// (the display name becomes `added_by`) and while a submission is in
  /// flight.
  pub fn can_submit(&self, session: &SessionState) -> bool {
    !self.submitting && session.display_name().is_some()
  }

  /// Validate locally — an invalid form never costs a store round-trip.
  pub fn validate(&self, session: &SessionState) -> Result<NewThing, String> {
    let Some(display_name) = session.display_name() else {
      return Err("Your profile has not loaded yet.".into());
    };
    NewThing::new(&self.title, display_name, Some(self.notes.as_str())).map_err(
      |e| match e {
        ValidationError::EmptyTitle => "You need to type something!".into(),
        other => other.to_string(),
      },
    )
  }
}

// ─── Sign-in controller ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignInField {
  #[default]
  Email,
  Password,
}

/// State for the sign-in form.
#[derive(Debug, Default)]
pub struct SignInController {
  pub email:      String,
  pub password:   String,
  pub field:      SignInField,
  pub submitting: bool,
  pub error:      Option<String>,
}

impl SignInController {
  pub fn toggle_field(&mut self) {
    self.field = match self.field {
      SignInField::Email => SignInField::Password,
      SignInField::Password => SignInField::Email,
    };
  }

  pub fn input(&mut self, c: char) {
    match self.field {
      SignInField::Email => self.email.push(c),
      SignInField::Password => self.password.push(c),
    }
  }

  pub fn backspace(&mut self) {
    match self.field {
      SignInField::Email => self.email.pop(),
      SignInField::Password => self.password.pop(),
    };
  }

  /// Both fields are required before any provider round-trip.
  pub fn validate(&self) -> Result<(String, String), String> {
    let email = self.email.trim();
    let password = self.password.trim();
    if email.is_empty() || password.is_empty() {
      return Err("Please enter both email and password.".into());
    }
    Ok((email.to_owned(), password.to_owned()))
  }
}
