//! Add-thing modal.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph},
};

use crate::{app::App, controller::CreateField};

pub fn draw<S, A>(f: &mut Frame, area: Rect, app: &App<S, A>) {
  let boxed = super::centered_rect(60, 50, area);
  f.render_widget(Clear, boxed);

  let block = Block::default()
    .title(" Add a thing ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(boxed);
  f.render_widget(block, boxed);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // title field
      Constraint::Length(1), // notes field
      Constraint::Length(1),
      Constraint::Length(1), // error / progress
    ])
    .split(inner);

  f.render_widget(
    field_line(
      "Title",
      &app.create.title,
      app.create.field == CreateField::Title,
    ),
    rows[0],
  );
  f.render_widget(
    field_line(
      "Notes",
      &app.create.notes,
      app.create.field == CreateField::Notes,
    ),
    rows[1],
  );

  if app.create.submitting {
    f.render_widget(
      Paragraph::new(Span::styled(
        "Adding…",
        Style::default().fg(Color::Yellow),
      )),
      rows[3],
    );
  } else if let Some(error) = &app.create.error {
    f.render_widget(
      Paragraph::new(Span::styled(
        error.clone(),
        Style::default().fg(Color::Red),
      )),
      rows[3],
    );
  } else if !app.create.can_submit(&app.session) {
    // Profile still resolving; the form is visible but submission waits.
    f.render_widget(
      Paragraph::new(Span::styled(
        "Loading your profile…",
        Style::default().fg(Color::Gray),
      )),
      rows[3],
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
    Span::styled(format!("{label:>6}: "), label_style),
    Span::raw(format!("{value}{cursor}")),
  ]))
}
