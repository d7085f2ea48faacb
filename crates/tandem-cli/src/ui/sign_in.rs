//! Sign-in screen — the only screen reachable without a session.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::{app::App, controller::SignInField};

pub fn draw<S, A>(f: &mut Frame, area: Rect, app: &App<S, A>) {
  let boxed = super::centered_rect(60, 50, area);

  let block = Block::default()
    .title(" Welcome back ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(boxed);
  f.render_widget(block, boxed);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // blurb
      Constraint::Length(1),
      Constraint::Length(1), // email
      Constraint::Length(1), // password
      Constraint::Length(1),
      Constraint::Length(1), // error / progress
    ])
    .split(inner);

  f.render_widget(
    Paragraph::new(Span::styled(
      "Sign in to your shared space.",
      Style::default().fg(Color::Gray),
    )),
    rows[0],
  );

  let masked: String = "•".repeat(app.sign_in.password.chars().count());
  f.render_widget(
    field_line("Email", &app.sign_in.email, app.sign_in.field == SignInField::Email),
    rows[2],
  );
  f.render_widget(
    field_line(
      "Password",
      &masked,
      app.sign_in.field == SignInField::Password,
    ),
    rows[3],
  );

  if app.sign_in.submitting {
    f.render_widget(
      Paragraph::new(Span::styled(
        "Signing in…",
        Style::default().fg(Color::Yellow),
      )),
      rows[5],
    );
  } else if let Some(error) = &app.sign_in.error {
    f.render_widget(
      Paragraph::new(Span::styled(
        error.clone(),
        Style::default().fg(Color::Red),
      )),
      rows[5],
    );
  }
}

fn field_line<'a>(label: &'a str, value: &str, active: bool) -> Paragraph<'a> {
  let label_style = if active {
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::Gray)
  };
  let cursor = if active { "_" } else { "" };
  Paragraph::new(Line::from(vec![
    Span::styled(format!("{label:>9}: "), label_style),
    Span::raw(format!("{value}{cursor}")),
  ]))
}
