//! Detail modal — planned-thing detail and memory detail share this pane.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::App;

pub fn draw<S, A>(f: &mut Frame, area: Rect, app: &App<S, A>) {
  let boxed = super::centered_rect(70, 70, area);
  f.render_widget(Clear, boxed);

  let title = if app.detail.require_done {
    " Memory "
  } else {
    " Thing "
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(boxed);
  f.render_widget(block, boxed);

  if app.detail.state.is_loading() {
    f.render_widget(
      Paragraph::new(Span::styled("Loading…", Style::default().fg(Color::Gray))),
      inner,
    );
    return;
  }

  if let Some(error) = app.detail.state.error() {
    f.render_widget(
      Paragraph::new(vec![
        Line::from(Span::styled(
          error.to_string(),
          Style::default().fg(Color::Red),
        )),
        Line::from(Span::styled(
          "Press r to retry, Esc to go back.",
          Style::default().fg(Color::Gray),
        )),
      ]),
      inner,
    );
    return;
  }

  if app.detail.is_not_found() {
    let missing = if app.detail.require_done {
      "Memory not found."
    } else {
      "Thing not found."
    };
    f.render_widget(
      Paragraph::new(Span::styled(missing, Style::default().fg(Color::Gray))),
      inner,
    );
    return;
  }

  let Some(thing) = app.detail.thing() else {
    return;
  };

  let mut lines = vec![
    Line::from(Span::styled(
      thing.title.clone(),
      Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    )),
    Line::raw(""),
  ];

  if let Some(notes) = &thing.notes {
    lines.push(Line::from(Span::raw(notes.clone())));
    lines.push(Line::raw(""));
  }

  lines.push(meta_line("Added by", &thing.added_by));
  lines.push(meta_line(
    "Planned",
    &thing.created_at.format("%Y-%m-%d").to_string(),
  ));
  if let Some(done_at) = thing.done_at {
    lines.push(meta_line("Done", &done_at.format("%Y-%m-%d").to_string()));
  }
  if let Some(photo_url) = &thing.photo_url {
    lines.push(meta_line("Photo", photo_url));
  }

  if app.detail.marking {
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
      "Saving…",
      Style::default().fg(Color::Yellow),
    )));
  }

  if let Some(buffer) = &app.detail.photo_entry {
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
      Span::styled(
        "Photo URL: ",
        Style::default()
          .fg(Color::Cyan)
          .add_modifier(Modifier::BOLD),
      ),
      Span::raw(format!("{buffer}_")),
    ]));
  }

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn meta_line<'a>(label: &'a str, value: &str) -> Line<'a> {
  Line::from(vec![
    Span::styled(format!("{label}: "), Style::default().fg(Color::Gray)),
    Span::raw(value.to_string()),
  ])
}
