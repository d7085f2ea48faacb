//! Planned list — the root screen.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::App;

pub fn draw<S, A>(f: &mut Frame, area: Rect, app: &App<S, A>) {
  let things = app.planned.things();

  let title = if app.planned.state.data().is_some() {
    format!(" Things to do ({}) ", things.len())
  } else {
    " Things to do ".to_string()
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  if app.planned.state.is_loading() {
    f.render_widget(
      Paragraph::new(Span::styled(
        "Loading your shared things…",
        Style::default().fg(Color::Gray),
      )),
      inner,
    );
    return;
  }

  if let Some(error) = app.planned.state.error() {
    f.render_widget(
      Paragraph::new(vec![
        Line::from(Span::styled(
          error.to_string(),
          Style::default().fg(Color::Red),
        )),
        Line::from(Span::styled(
          "Press r to retry.",
          Style::default().fg(Color::Gray),
        )),
      ]),
      inner,
    );
    return;
  }

  if things.is_empty() {
    f.render_widget(
      Paragraph::new(Span::styled(
        "Nothing planned yet. Press a to add your first thing!",
        Style::default().fg(Color::Gray),
      )),
      inner,
    );
    return;
  }

  let items: Vec<ListItem> = things
    .iter()
    .enumerate()
    .map(|(i, thing)| {
      let style = if i == app.planned.cursor {
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD)
      } else {
        Style::default()
      };
      let meta = format!(
        "  ({} · {})",
        thing.added_by,
        thing.created_at.format("%Y-%m-%d"),
      );
      ListItem::new(Line::from(vec![
        Span::styled(thing.title.clone(), style),
        Span::styled(meta, style.fg(Color::Gray)),
      ]))
    })
    .collect();

  let mut state = ListState::default();
  state.select(Some(app.planned.cursor));

  f.render_stateful_widget(
    List::new(items)
      .highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol(""),
    inner,
    &mut state,
  );
}
