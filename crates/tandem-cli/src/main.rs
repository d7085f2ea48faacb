//! `tandem` — terminal UI for a couple's shared things-to-do and memories.
//!
//! # Usage
//!
//! ```
//! tandem --store-url https://store.example --auth-url https://auth.example --api-key KEY
//! tandem --config ~/.config/tandem/config.toml
//! tandem --config config.toml provision --uid u1 --email a@b.c --name Alice --partner Bea
//! ```

mod app;
mod controller;
mod ui;

use std::{io, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use app::{App, AppEvent};
use clap::{Parser, Subcommand};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tandem_client::{AuthClient, AuthConfig, SessionContext, StoreClient, StoreConfig};
use tandem_core::{store::RecordStore, thing::DonePolicy};
use tokio::sync::mpsc;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "tandem", about = "Terminal UI for a couple's shared things and memories")]
struct Args {
  /// Path to a TOML config file (store_url, auth_url, api_key, keep_first).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the record store.
  #[arg(long, env = "TANDEM_STORE_URL")]
  store_url: Option<String>,

  /// Base URL of the identity provider.
  #[arg(long, env = "TANDEM_AUTH_URL")]
  auth_url: Option<String>,

  /// Project API key sent with every request.
  #[arg(long, env = "TANDEM_API_KEY")]
  api_key: Option<String>,

  /// Treat marking an already-done thing as a no-op instead of re-stamping it.
  #[arg(long)]
  keep_first: bool,

  /// Append tracing output to this file (the terminal is busy drawing).
  #[arg(long, value_name = "FILE", env = "TANDEM_LOG_FILE")]
  log_file: Option<std::path::PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create or update a user profile, then print it back.
  Provision {
    /// Identity-provider uid of the user.
    #[arg(long)]
    uid:     String,
    #[arg(long)]
    email:   String,
    /// Display name shown as `added_by` on new things.
    #[arg(long)]
    name:    String,
    /// What this user calls the other half of the couple.
    #[arg(long)]
    partner: String,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  store_url:  String,
  #[serde(default)]
  auth_url:   String,
  #[serde(default)]
  api_key:    String,
  #[serde(default)]
  keep_first: bool,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  if let Some(path) = &args.log_file {
    let file = std::fs::OpenOptions::new()
      .create(true)
      .append(true)
      .open(path)
      .with_context(|| format!("opening log file {}", path.display()))?;
    tracing_subscriber::fmt()
      .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
      .with_writer(std::sync::Mutex::new(file))
      .with_ansi(false)
      .init();
  }

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let store_url = args
    .store_url
    .clone()
    .or_else(|| (!file_cfg.store_url.is_empty()).then(|| file_cfg.store_url.clone()))
    .unwrap_or_else(|| "http://localhost:8080".to_string());
  let auth_url = args
    .auth_url
    .clone()
    .or_else(|| (!file_cfg.auth_url.is_empty()).then(|| file_cfg.auth_url.clone()))
    .unwrap_or_else(|| store_url.clone());
  let api_key = args
    .api_key
    .clone()
    .or_else(|| (!file_cfg.api_key.is_empty()).then(|| file_cfg.api_key.clone()))
    .unwrap_or_default();
  let done_policy = if args.keep_first || file_cfg.keep_first {
    DonePolicy::KeepFirst
  } else {
    DonePolicy::Redo
  };

  let store = StoreClient::new(StoreConfig {
    base_url: store_url,
    api_key: api_key.clone(),
    done_policy,
  })
  .context("building store client")?;

  if let Some(Command::Provision {
    uid,
    email,
    name,
    partner,
  }) = args.command
  {
    return provision(&store, &uid, &email, &name, &partner).await;
  }

  let auth = AuthClient::new(AuthConfig {
    base_url: auth_url,
    api_key,
  })
  .context("building auth client")?;

  let store = Arc::new(store);
  let auth = Arc::new(auth);

  // Session context resolves each auth-state change into a profile-bearing
  // session snapshot; a forward task turns those snapshots into app events.
  let session_ctx = SessionContext::start(auth.subscribe(), Arc::clone(&store));
  let (events_tx, mut events_rx) = mpsc::unbounded_channel();

  let mut session_rx = session_ctx.subscribe();
  let forward_tx = events_tx.clone();
  let forward = tokio::spawn(async move {
    loop {
      let snapshot = session_rx.borrow_and_update().clone();
      if forward_tx.send(AppEvent::Session(snapshot)).is_err() {
        break;
      }
      if session_rx.changed().await.is_err() {
        break;
      }
    }
  });

  let mut app = App::new(store, auth, events_tx);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app, &mut events_rx).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  forward.abort();
  session_ctx.teardown();

  run_result
}

// ─── Provision subcommand ─────────────────────────────────────────────────────

async fn provision(
  store: &StoreClient,
  uid: &str,
  email: &str,
  name: &str,
  partner: &str,
) -> Result<()> {
  let upsert = tandem_core::profile::ProfileUpsert::new(uid, email, name, partner)
    .context("invalid profile")?;
  let profile = store
    .upsert_profile(&upsert)
    .await
    .context("upserting profile")?;

  println!("provisioned {}", profile.uid);
  println!("  email:   {}", profile.email);
  println!("  name:    {}", profile.display_name);
  println!("  partner: {}", profile.partner_name);
  Ok(())
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<StoreClient, AuthClient>,
  events_rx: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
  loop {
    // Apply everything the background tasks reported since the last frame.
    while let Ok(event) = events_rx.try_recv() {
      app.handle_event(event);
    }

    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an input event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(evt) = maybe_event {
      match evt {
        Event::Key(key) => {
          app.handle_key(key);
          if app.should_quit {
            break;
          }
        }
        Event::Resize(_, _) => {
          // Terminal will redraw on next iteration.
        }
        _ => {}
      }
    }
  }

  Ok(())
}
