//! Contact table pane.

use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::app::App;

const HEADER: [&str; 7] = ["", "First", "Last", "Email", "Phone", "Gender", "Category"];

/// Render the contact table into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let filtered = app.filtered_contacts();
  let total = app.contacts.len();

  // Title with count.
  let title = if filtered.len() == total {
    format!(" Contacts ({total}) ")
  } else {
    format!(" Contacts ({}/{total}) ", filtered.len())
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let rows: Vec<Row> = filtered
    .iter()
    .map(|c| {
      // Image marker stands in for the avatar.
      let marker = if c.image_url.is_some() { "◉" } else { "·" };
      Row::new(vec![
        Cell::from(marker),
        Cell::from(c.first_name.clone()),
        Cell::from(c.last_name.clone()),
        Cell::from(c.email.clone()),
        Cell::from(c.phone_number.clone()),
        Cell::from(c.gender.map(|g| g.to_string()).unwrap_or_else(|| "—".into())),
        Cell::from(c.category.to_string()),
      ])
    })
    .collect();

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  // Search bar at the bottom of the pane while a query is set.
  if (app.filter_active || !app.filter.text.is_empty()) && inner_area.height > 2 {
    let filter_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let filter_text = if app.filter_active {
      format!("/{}_", app.filter.text)
    } else {
      format!("/{}", app.filter.text)
    };
    f.render_widget(
      Paragraph::new(filter_text).style(Style::default().fg(Color::Yellow)),
      filter_area,
    );
  }

  if filtered.is_empty() {
    let hint = if total == 0 {
      "No contacts yet. Press n to add one."
    } else {
      "No contacts match the current filters."
    };
    f.render_widget(
      Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
      inner_area,
    );
    return;
  }

  let header = Row::new(HEADER.to_vec()).style(
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );

  let widths = [
    Constraint::Length(1),
    Constraint::Percentage(14),
    Constraint::Percentage(14),
    Constraint::Percentage(28),
    Constraint::Percentage(16),
    Constraint::Percentage(9),
    Constraint::Percentage(19),
  ];

  // Scrollable table with cursor tracking.
  let mut state = TableState::default();
  state.select(Some(app.list_cursor));

  f.render_stateful_widget(
    Table::new(rows, widths)
      .header(header)
      .column_spacing(1)
      .row_highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      ),
    inner_area,
    &mut state,
  );
}
