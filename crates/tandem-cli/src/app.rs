//! Application state machine and event dispatcher.
//!
//! The terminal loop feeds two inputs here: key events, and [`AppEvent`]s
//! produced by spawned I/O tasks (fetch completions, mutation results,
//! session snapshots). All state transitions happen on the loop; tasks only
//! report back through the event channel, so completions of superseded
//! fetches are rejected by token before they can touch any state.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tandem_client::Authenticator;
use tandem_core::{session::SessionState, store::RecordStore, thing::Thing};
use tokio::sync::mpsc;

use crate::controller::{
  CreateController, DetailController, ListController, Scope, SignInController,
};

// ─── Routes & guard ───────────────────────────────────────────────────────────

/// The addressable screens. Detail and create render as modals over the list
/// they were opened from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
  SignIn,
  /// The root screen: the planned list ("to-do").
  Planned,
  /// The memories gallery.
  Done,
  /// Planned-item detail modal, over the planned list.
  ThingDetail(String),
  /// Memory detail.
  DoneDetail(String),
  /// The create form, over the planned list.
  AddThing,
}

impl Route {
  /// Screens that keep the planned list visible (and therefore current).
  pub fn shows_planned(&self) -> bool {
    matches!(self, Self::Planned | Self::ThingDetail(_) | Self::AddThing)
  }

  pub fn shows_done(&self) -> bool {
    matches!(self, Self::Done | Self::DoneDetail(_))
  }
}

/// Outcome of the auth guard, evaluated before a screen's controller runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
  Proceed,
  RedirectSignIn,
  RedirectHome,
  /// Session still loading — hold all fetches until it settles.
  Wait,
}

pub fn gate(route: &Route, session: &SessionState) -> Gate {
  if session.loading {
    return Gate::Wait;
  }
  match (session.is_authenticated(), route) {
    (false, Route::SignIn) => Gate::Proceed,
    (false, _) => Gate::RedirectSignIn,
    (true, Route::SignIn) => Gate::RedirectHome,
    (true, _) => Gate::Proceed,
  }
}

// ─── Events ───────────────────────────────────────────────────────────────────

/// Everything the spawned tasks report back to the loop.
#[derive(Debug)]
pub enum AppEvent {
  Session(SessionState),
  PlannedLoaded {
    token:  u64,
    result: Result<Vec<Thing>, String>,
  },
  DoneLoaded {
    token:  u64,
    result: Result<Vec<Thing>, String>,
  },
  DetailLoaded {
    token:  u64,
    result: Result<Option<Thing>, String>,
  },
  Created {
    result: Result<(), String>,
  },
  MarkedDone {
    id:     String,
    result: Result<(), String>,
  },
  SignedIn {
    result: Result<(), String>,
  },
  SignedOut {
    result: Result<(), String>,
  },
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<S, A> {
  pub route:       Route,
  /// Latest session snapshot; written only from [`AppEvent::Session`].
  pub session:     SessionState,
  pub planned:     ListController,
  pub done:        ListController,
  pub detail:      DetailController,
  pub create:      CreateController,
  pub sign_in:     SignInController,
  /// One-line transient message shown in the status bar.
  pub status_msg:  String,
  pub should_quit: bool,

  store:     Arc<S>,
  auth:      Arc<A>,
  events_tx: mpsc::UnboundedSender<AppEvent>,
}

impl<S, A> App<S, A>
where
  S: RecordStore + 'static,
  A: Authenticator + 'static,
{
  pub fn new(
    store: Arc<S>,
    auth: Arc<A>,
    events_tx: mpsc::UnboundedSender<AppEvent>,
  ) -> Self {
    Self {
      route: Route::SignIn,
      session: SessionState::initial(),
      planned: ListController::new(),
      done: ListController::new(),
      detail: DetailController::default(),
      create: CreateController::default(),
      sign_in: SignInController::default(),
      status_msg: String::new(),
      should_quit: false,
      store,
      auth,
      events_tx,
    }
  }

  fn session_ready(&self) -> bool {
    !self.session.loading && self.session.is_authenticated()
  }

  // ── Event dispatch ────────────────────────────────────────────────────────

  pub fn handle_event(&mut self, event: AppEvent) {
    match event {
      AppEvent::Session(state) => {
        self.session = state;
        self.apply_gate();
      }

      AppEvent::PlannedLoaded { token, result } => {
        self.planned.complete(token, result);
      }
      AppEvent::DoneLoaded { token, result } => {
        self.done.complete(token, result);
      }
      AppEvent::DetailLoaded { token, result } => {
        self.detail.complete(token, result);
      }

      AppEvent::Created { result } => {
        self.create.submitting = false;
        match result {
          Ok(()) => {
            self.create.reset();
            self.status_msg = "Thing added!".into();
            self.go_planned();
            self.invalidate(Scope::Planned);
          }
          Err(message) => self.create.error = Some(message),
        }
      }

      AppEvent::MarkedDone { id, result } => {
        self.detail.marking = false;
        match result {
          Ok(()) => {
            self.detail.photo_entry = None;
            self.invalidate(Scope::Planned);
            self.invalidate(Scope::Done);
            // Refresh the open detail so the modal reflects the transition.
            if self.detail.thing_id.as_deref() == Some(id.as_str()) {
              self.spawn_detail_fetch();
            }
          }
          Err(message) => self.status_msg = message,
        }
      }

      AppEvent::SignedIn { result } => {
        self.sign_in.submitting = false;
        if let Err(message) = result {
          self.sign_in.error = Some(message);
        }
        // On success the auth-state stream updates the session, and the
        // gate redirects away from the sign-in screen.
      }

      AppEvent::SignedOut { result } => {
        if let Err(message) = result {
          self.status_msg = message;
        }
      }
    }
  }

  /// Re-evaluate the auth guard for the current route.
  fn apply_gate(&mut self) {
    match gate(&self.route, &self.session) {
      Gate::Wait => {}
      Gate::Proceed => self.ensure_fetches(),
      Gate::RedirectHome => {
        self.route = Route::Planned;
        self.ensure_fetches();
      }
      Gate::RedirectSignIn => {
        // Terminal redirect: supersede all in-flight fetches so none of
        // their completions can land, and drop cached collections.
        self.planned.reset();
        self.done.reset();
        self.detail.close();
        self.create.reset();
        self.route = Route::SignIn;
      }
    }
  }

  /// Kick off any fetch the visible screens still need.
  fn ensure_fetches(&mut self) {
    if self.route.shows_planned() && self.planned.needs_fetch() {
      self.spawn_planned_fetch();
    }
    if self.route.shows_done() && self.done.needs_fetch() {
      self.spawn_done_fetch();
    }
  }

  /// Mark a list stale. A visible list refetches immediately; a hidden one
  /// refetches when its screen next becomes active.
  pub fn invalidate(&mut self, scope: Scope) {
    match scope {
      Scope::Planned => {
        self.planned.invalidate();
        if self.route.shows_planned() {
          self.spawn_planned_fetch();
        }
      }
      Scope::Done => {
        self.done.invalidate();
        if self.route.shows_done() {
          self.spawn_done_fetch();
        }
      }
    }
  }

  // ── Navigation ────────────────────────────────────────────────────────────

  pub fn go_planned(&mut self) {
    self.route = Route::Planned;
    self.ensure_fetches();
  }

  pub fn go_done(&mut self) {
    self.route = Route::Done;
    self.ensure_fetches();
  }

  pub fn open_create(&mut self) {
    self.create.reset();
    self.route = Route::AddThing;
  }

  pub fn open_thing_detail(&mut self, id: String) {
    self.route = Route::ThingDetail(id.clone());
    self.detail.open(id, false);
    self.spawn_detail_fetch();
  }

  pub fn open_done_detail(&mut self, id: String) {
    self.route = Route::DoneDetail(id.clone());
    self.detail.open(id, true);
    self.spawn_detail_fetch();
  }

  pub fn close_detail(&mut self) {
    let back = if self.detail.require_done {
      Route::Done
    } else {
      Route::Planned
    };
    self.detail.close();
    self.route = back;
    self.ensure_fetches();
  }

  // ── I/O tasks ─────────────────────────────────────────────────────────────

  fn spawn_planned_fetch(&mut self) {
    if !self.session_ready() {
      return;
    }
    let token = self.planned.begin();
    let store = Arc::clone(&self.store);
    let tx = self.events_tx.clone();
    tokio::spawn(async move {
      let result = store.list_planned().await.map_err(|error| {
        tracing::error!(%error, "failed to load planned things");
        "Failed to load things. Please try again.".to_string()
      });
      let _ = tx.send(AppEvent::PlannedLoaded { token, result });
    });
  }

  fn spawn_done_fetch(&mut self) {
    if !self.session_ready() {
      return;
    }
    let token = self.done.begin();
    let store = Arc::clone(&self.store);
    let tx = self.events_tx.clone();
    tokio::spawn(async move {
      let result = store.list_done().await.map_err(|error| {
        tracing::error!(%error, "failed to load done things");
        "Failed to load memories. Please try again.".to_string()
      });
      let _ = tx.send(AppEvent::DoneLoaded { token, result });
    });
  }

  fn spawn_detail_fetch(&mut self) {
    if !self.session_ready() {
      return;
    }
    let Some(id) = self.detail.thing_id.clone() else {
      return;
    };
    let token = self.detail.begin();
    let message = if self.detail.require_done {
      "Failed to load memory details."
    } else {
      "Failed to load thing details."
    };
    let store = Arc::clone(&self.store);
    let tx = self.events_tx.clone();
    tokio::spawn(async move {
      let result = store.get_thing(&id).await.map_err(|error| {
        tracing::error!(%error, %id, "failed to load thing");
        message.to_string()
      });
      let _ = tx.send(AppEvent::DetailLoaded { token, result });
    });
  }

  pub fn submit_create(&mut self) {
    if !self.create.can_submit(&self.session) {
      if !self.create.submitting {
        self.create.error = Some("Your profile has not loaded yet.".into());
      }
      return;
    }
    match self.create.validate(&self.session) {
      Err(message) => self.create.error = Some(message),
      Ok(input) => {
        self.create.error = None;
        self.create.submitting = true;
        let store = Arc::clone(&self.store);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
          let result = store.create_thing(&input).await.map(|_| ()).map_err(|error| {
            tracing::error!(%error, "failed to add thing");
            "Failed to add thing. Please try again.".to_string()
          });
          let _ = tx.send(AppEvent::Created { result });
        });
      }
    }
  }

  /// Mark the thing in the open detail modal as done, photo-less (the
  /// primary completion path).
  pub fn mark_selected_done(&mut self) {
    if self.detail.marking {
      return;
    }
    let Some(thing) = self.detail.thing() else {
      return;
    };
    if thing.is_done() {
      return;
    }
    let id = thing.id.clone();
    self.detail.marking = true;
    self.spawn_mark_done(id, None);
  }

  /// Submit the photo-URL entry overlay: backfill a photo onto a memory.
  pub fn submit_photo(&mut self) {
    if self.detail.marking {
      return;
    }
    let Some(buffer) = self.detail.photo_entry.as_ref() else {
      return;
    };
    let url = buffer.trim().to_owned();
    if url.is_empty() {
      return;
    }
    let Some(id) = self.detail.thing_id.clone() else {
      return;
    };
    self.detail.marking = true;
    self.spawn_mark_done(id, Some(url));
  }

  fn spawn_mark_done(&mut self, id: String, photo_url: Option<String>) {
    let store = Arc::clone(&self.store);
    let tx = self.events_tx.clone();
    tokio::spawn(async move {
      let result = store
        .mark_done(&id, photo_url.as_deref())
        .await
        .map_err(|error| {
          tracing::error!(%error, %id, "failed to mark thing as done");
          "Failed to mark thing as done. Please try again.".to_string()
        });
      let _ = tx.send(AppEvent::MarkedDone { id, result });
    });
  }

  pub fn submit_sign_in(&mut self) {
    if self.sign_in.submitting {
      return;
    }
    match self.sign_in.validate() {
      Err(message) => self.sign_in.error = Some(message),
      Ok((email, password)) => {
        self.sign_in.error = None;
        self.sign_in.submitting = true;
        let auth = Arc::clone(&self.auth);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
          let result = auth
            .sign_in(&email, &password)
            .await
            .map(|_| ())
            .map_err(|error| {
              tracing::warn!(%error, "sign-in failed");
              error.user_message().to_string()
            });
          let _ = tx.send(AppEvent::SignedIn { result });
        });
      }
    }
  }

  pub fn request_sign_out(&mut self) {
    let auth = Arc::clone(&self.auth);
    let tx = self.events_tx.clone();
    tokio::spawn(async move {
      let result = auth.sign_out().await.map_err(|error| {
        tracing::warn!(%error, "sign-out failed");
        "Sign out failed. Please try again.".to_string()
      });
      let _ = tx.send(AppEvent::SignedOut { result });
    });
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  pub fn handle_key(&mut self, key: KeyEvent) {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
    {
      self.should_quit = true;
      return;
    }
    self.status_msg.clear();

    let route = self.route.clone();
    match route {
      Route::SignIn => self.handle_sign_in_key(key),
      Route::Planned => self.handle_planned_key(key),
      Route::Done => self.handle_done_key(key),
      Route::ThingDetail(_) => self.handle_detail_key(key),
      Route::DoneDetail(_) => self.handle_memory_key(key),
      Route::AddThing => self.handle_create_key(key),
    }
  }

  fn handle_sign_in_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Tab => self.sign_in.toggle_field(),
      KeyCode::Enter => self.submit_sign_in(),
      KeyCode::Backspace => self.sign_in.backspace(),
      KeyCode::Esc => self.sign_in.error = None,
      KeyCode::Char(c) => self.sign_in.input(c),
      _ => {}
    }
  }

  fn handle_planned_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('q') => self.should_quit = true,
      KeyCode::Down | KeyCode::Char('j') => self.planned.cursor_down(),
      KeyCode::Up | KeyCode::Char('k') => self.planned.cursor_up(),
      KeyCode::Enter => {
        if let Some(id) = self.planned.selected().map(|t| t.id.clone()) {
          self.open_thing_detail(id);
        }
      }
      KeyCode::Char('a') => self.open_create(),
      KeyCode::Tab | KeyCode::Char('m') => self.go_done(),
      KeyCode::Char('r') => {
        if self.planned.state.error().is_some() {
          self.spawn_planned_fetch();
        }
      }
      KeyCode::Char('s') => self.request_sign_out(),
      _ => {}
    }
  }

  fn handle_done_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('q') => self.should_quit = true,
      KeyCode::Down | KeyCode::Char('j') => self.done.cursor_down(),
      KeyCode::Up | KeyCode::Char('k') => self.done.cursor_up(),
      KeyCode::Enter => {
        if let Some(id) = self.done.selected().map(|t| t.id.clone()) {
          self.open_done_detail(id);
        }
      }
      KeyCode::Char('a') => self.open_create(),
      KeyCode::Tab | KeyCode::Char('t') => self.go_planned(),
      KeyCode::Char('r') => {
        if self.done.state.error().is_some() {
          self.spawn_done_fetch();
        }
      }
      KeyCode::Char('s') => self.request_sign_out(),
      _ => {}
    }
  }

  fn handle_detail_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('q') => self.should_quit = true,
      KeyCode::Esc => self.close_detail(),
      KeyCode::Enter | KeyCode::Char('d') => self.mark_selected_done(),
      KeyCode::Char('r') => {
        if self.detail.state.error().is_some() {
          self.spawn_detail_fetch();
        }
      }
      _ => {}
    }
  }

  fn handle_memory_key(&mut self, key: KeyEvent) {
    // Photo-URL entry overlay captures all printable keys while open.
    if self.detail.photo_entry.is_some() {
      match key.code {
        KeyCode::Esc => self.detail.photo_entry = None,
        KeyCode::Enter => self.submit_photo(),
        KeyCode::Backspace => {
          if let Some(buffer) = self.detail.photo_entry.as_mut() {
            buffer.pop();
          }
        }
        KeyCode::Char(c) => {
          if let Some(buffer) = self.detail.photo_entry.as_mut() {
            buffer.push(c);
          }
        }
        _ => {}
      }
      return;
    }

    match key.code {
      KeyCode::Char('q') => self.should_quit = true,
      KeyCode::Esc | KeyCode::Backspace => self.close_detail(),
      KeyCode::Char('p') => {
        if let Some(thing) = self.detail.thing() {
          self.detail.photo_entry =
            Some(thing.photo_url.clone().unwrap_or_default());
        }
      }
      KeyCode::Char('r') => {
        if self.detail.state.error().is_some() {
          self.spawn_detail_fetch();
        }
      }
      _ => {}
    }
  }

  fn handle_create_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.create.reset();
        self.go_planned();
      }
      KeyCode::Tab => self.create.toggle_field(),
      KeyCode::Enter => self.submit_create(),
      KeyCode::Backspace => self.create.backspace(),
      KeyCode::Char(c) => {
        if !self.create.submitting {
          self.create.input(c);
        }
      }
      _ => {}
    }
  }
}
