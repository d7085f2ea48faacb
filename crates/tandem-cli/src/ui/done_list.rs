//! Memories gallery — everything the couple has already done.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::App;

pub fn draw<S, A>(f: &mut Frame, area: Rect, app: &App<S, A>) {
  let things = app.done.things();

  let title = if app.done.state.data().is_some() {
    format!(" Memories ({}) ", things.len())
  } else {
    " Memories ".to_string()
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  if app.done.state.is_loading() {
    f.render_widget(
      Paragraph::new(Span::styled(
        "Loading your memories…",
        Style::default().fg(Color::Gray),
      )),
      inner,
    );
    return;
  }

  if let Some(error) = app.done.state.error() {
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
        "No memories yet. Mark a thing as done to make one!",
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
      let style = if i == app.done.cursor {
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD)
      } else {
        Style::default()
      };
      let photo = if thing.photo_url.is_some() { "📷 " } else { "" };
      let done = thing
        .done_at
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
      ListItem::new(Line::from(vec![
        Span::styled(format!("{photo}{}", thing.title), style),
        Span::styled(format!("  ({done})"), style.fg(Color::Gray)),
      ]))
    })
    .collect();

  let mut state = ListState::default();
  state.select(Some(app.done.cursor));

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
