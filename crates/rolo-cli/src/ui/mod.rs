//! TUI rendering: orchestrates all panes.

pub mod contact_detail;
pub mod contact_form;
pub mod contact_list;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{App, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
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

  match app.screen {
    Screen::Form => contact_form::draw(f, rows[1], app),
    Screen::ConfirmDelete => {
      let name = app
        .delete_target
        .as_ref()
        .map(|c| c.full_name())
        .unwrap_or_default();
      draw_confirm(f, rows[1], " Delete ", &format!("Delete {name}?"));
    }
    _ => {}
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " rolo  [/] search  [c] category  [n] new  [x] export  [q] quit",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("category: {}  {date} ", app.filter.category),
    Style::default().fg(Color::Gray),
  );

  // Simple left-right header: pad the middle.
  let left_width = left.content.chars().count() as u16;
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

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  if app.detail.is_none() {
    contact_list::draw(f, area, app);
    return;
  }

  // Table on the left (60%), detail on the right (40%).
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
    .split(area);

  contact_list::draw(f, cols[0], app);
  contact_detail::draw(f, cols[1], app);
}

// ─── Popups ───────────────────────────────────────────────────────────────────

/// A `width` x `height` rectangle centred in `area`.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let [row] = Layout::vertical([Constraint::Length(height)])
    .flex(Flex::Center)
    .areas(area);
  let [cell] = Layout::horizontal([Constraint::Length(width)])
    .flex(Flex::Center)
    .areas(row);
  cell
}

/// Yes/no prompt over `area`.
pub fn draw_confirm(f: &mut Frame, area: Rect, title: &str, question: &str) {
  let popup = centered(area, 44, 5);
  f.render_widget(Clear, popup);

  let block = Block::default()
    .title(title.to_string())
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Yellow));
  let inner = block.inner(popup);
  f.render_widget(block, popup);

  let lines = vec![
    Line::from(question.to_string()),
    Line::from(""),
    Line::from(Span::styled(
      "[y] yes   [n] no",
      Style::default().fg(Color::DarkGray),
    )),
  ];
  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match &app.screen {
    Screen::ContactList if app.filter_active => (
      "SEARCH",
      "Type to filter  Esc clear  Enter done",
    ),
    Screen::ContactList => (
      "NORMAL",
      "↑↓/jk navigate  Enter detail  e edit  d delete  r reload  q quit",
    ),
    Screen::ContactDetail => (
      "DETAIL",
      "↑↓/jk prev/next  e edit  d delete  Esc back  q quit",
    ),
    Screen::Form if app.submitting => ("SAVING", "Waiting for the server…"),
    Screen::Form => (
      "FORM",
      "Tab/↑↓ field  ←→ choose  Enter save  Esc cancel",
    ),
    Screen::ConfirmDelete => ("DELETE", "y confirm  n cancel"),
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
  let status_style = if app.status_msg.starts_with("Error") {
    Style::default().fg(Color::Red)
  } else {
    Style::default().fg(Color::Gray)
  };
  let hint_span = Span::styled(format!("  {status}"), status_style);

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
