//! Create/edit form popup.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph},
};

use crate::{
  app::App,
  form::{Draft, Field},
  ui::{centered, draw_confirm},
};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(draft) = &app.draft else {
    return;
  };

  let title = if draft.editing.is_some() {
    " Edit contact "
  } else {
    " New contact "
  };
  let fields = Draft::fields();
  let popup = centered(area, 64, fields.len() as u16 + 4);
  f.render_widget(Clear, popup);

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(popup);
  f.render_widget(block, popup);

  let focused = draft.focused();
  let mut lines: Vec<Line> = fields
    .iter()
    .map(|&field| {
      let is_focus = field == focused && !app.confirm_submit;
      let marker = if field.is_required() { "*" } else { " " };
      let label_style = if is_focus {
        Style::default()
          .fg(Color::Black)
          .bg(Color::Cyan)
          .add_modifier(Modifier::BOLD)
      } else {
        Style::default().fg(Color::Cyan)
      };

      let value = draft.display(field);
      let value = match (field.is_choice(), is_focus) {
        (true, true) => format!("‹ {value} ›"),
        (false, true) => format!("{value}_"),
        _ => value,
      };

      Line::from(vec![
        Span::styled(format!("{marker}{:<11}", field.label()), label_style),
        Span::raw(" "),
        Span::raw(value),
      ])
    })
    .collect();

  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    if field_hint(focused).is_empty() {
      "* required".to_string()
    } else {
      format!("* required   {}", field_hint(focused))
    },
    Style::default().fg(Color::DarkGray),
  )));

  f.render_widget(Paragraph::new(lines), inner);

  if app.confirm_submit {
    let question = if app.submitting {
      "Saving…"
    } else {
      "Save this contact?"
    };
    draw_confirm(f, popup, " Confirm ", question);
  }
}

fn field_hint(field: Field) -> &'static str {
  match field {
    Field::Birthday => "YYYY-MM-DD",
    Field::Image => "path to a local image file",
    Field::Gender | Field::Category => "←→ to choose",
    _ => "",
  }
}
