//! TUI rendering — orchestrates all screens.

pub mod add_thing;
pub mod done_list;
pub mod planned_list;
pub mod sign_in;
pub mod thing_detail;

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, Route};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<S, A>(f: &mut Frame, app: &App<S, A>) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header<S, A>(f: &mut Frame, area: Rect, app: &App<S, A>) {
  let left = Span::styled(
    " tandem",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );

  // Right side: who's signed in, and with whom.
  let who = match app.session.display_name() {
    Some(name) => format!("{} & {} ", name, app.session.partner_name()),
    None if app.session.loading => "… ".to_string(),
    None => String::new(),
  };
  let right = Span::styled(who, Style::default().fg(Color::Gray));

  let left_width = left.content.len() as u16;
  let right_width = right.content.chars().count() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body<S, A>(f: &mut Frame, area: Rect, app: &App<S, A>) {
  match &app.route {
    Route::SignIn => sign_in::draw(f, area, app),
    Route::Planned => planned_list::draw(f, area, app),
    Route::Done => done_list::draw(f, area, app),
    Route::ThingDetail(_) => {
      planned_list::draw(f, area, app);
      thing_detail::draw(f, area, app);
    }
    Route::DoneDetail(_) => {
      done_list::draw(f, area, app);
      thing_detail::draw(f, area, app);
    }
    Route::AddThing => {
      planned_list::draw(f, area, app);
      add_thing::draw(f, area, app);
    }
  }
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<S, A>(f: &mut Frame, area: Rect, app: &App<S, A>) {
  let (mode_label, hints) = match &app.route {
    Route::SignIn => ("SIGN IN", "Tab switch field  Enter sign in  Ctrl-C quit"),
    Route::Planned => (
      "THINGS",
      "↑↓/jk navigate  Enter detail  a add  Tab memories  r retry  s sign out  q quit",
    ),
    Route::Done => (
      "MEMORIES",
      "↑↓/jk navigate  Enter detail  a add  Tab things  r retry  s sign out  q quit",
    ),
    Route::ThingDetail(_) => ("DETAIL", "Enter/d mark done  Esc back  q quit"),
    Route::DoneDetail(_) if app.detail.photo_entry.is_some() => {
      ("PHOTO", "Type a URL  Enter save  Esc cancel")
    }
    Route::DoneDetail(_) => ("MEMORY", "p add photo  Esc back  q quit"),
    Route::AddThing => ("ADD", "Tab switch field  Enter save  Esc cancel"),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::DarkGray),
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// A rect centered in `area`, sized by percentages.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
  let vertical = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Percentage((100 - percent_y) / 2),
      Constraint::Percentage(percent_y),
      Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

  Layout::default()
    .direction(Direction::Horizontal)
    .constraints([
      Constraint::Percentage((100 - percent_x) / 2),
      Constraint::Percentage(percent_x),
      Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(vertical[1])[1]
}
