//! Contact detail pane: right panel, read-only.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};
use rolo_core::contact::Contact;

use crate::app::App;

/// Render the detail pane into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(contact) = &app.detail else {
    return;
  };

  let block = Block::default()
    .title(format!(" {} ", contact.full_name()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let inner = block.inner(area);
  f.render_widget(block, area);

  let image = contact
    .image_url
    .as_deref()
    .map(|url| app.client.image_url(url));

  let lines: Vec<Line> = rows(contact, image)
    .into_iter()
    .map(|(label, value)| {
      let value = match value {
        Some(v) => Span::raw(v),
        None => Span::styled("—", Style::default().fg(Color::DarkGray)),
      };
      Line::from(vec![
        Span::styled(
          format!("{label:<12}"),
          Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        ),
        value,
      ])
    })
    .collect();

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

/// `(label, value)` for every field, `None` where unset.
fn rows(contact: &Contact, image: Option<String>) -> Vec<(&'static str, Option<String>)> {
  vec![
    ("First name", Some(contact.first_name.clone())),
    ("Last name", Some(contact.last_name.clone())),
    ("Email", Some(contact.email.clone())),
    ("Phone", Some(contact.phone_number.clone())),
    (
      "Birthday",
      contact.birthday.map(|d| d.format("%Y-%m-%d").to_string()),
    ),
    ("Address", contact.address.clone()),
    ("Notes", contact.notes.clone()),
    ("Gender", contact.gender.map(|g| g.to_string())),
    ("Category", Some(contact.category.to_string())),
    ("Image", image),
  ]
}
