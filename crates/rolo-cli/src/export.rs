//! PDF export of the visible contact rows.
//!
//! One table (First Name, Last Name, Email, Phone Number, Gender, Category)
//! laid out on A4 pages with the header row repeated on each page. Text is
//! set in the built-in Helvetica faces, so no font files are embedded.

use std::path::Path;

use anyhow::{Context, Result};
use lopdf::{
  Dictionary, Document, Object, ObjectId, Stream, StringFormat,
  content::{Content, Operation},
  dictionary,
};
use rolo_core::contact::Contact;

// A4 in points.
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 36;
const TITLE_SIZE: i64 = 14;
const FONT_SIZE: i64 = 9;
const ROW_HEIGHT: i64 = 16;
/// Rough Helvetica advance at `FONT_SIZE`, used to clip cells.
const CHAR_WIDTH: i64 = 5;

/// Column titles and widths in points.
pub const COLUMNS: [(&str, i64); 6] = [
  ("First Name", 80),
  ("Last Name", 80),
  ("Email", 150),
  ("Phone Number", 85),
  ("Gender", 50),
  ("Category", 78),
];

/// Body rows that fit on one page below the title and header.
pub const ROWS_PER_PAGE: usize =
  ((PAGE_HEIGHT - 2 * MARGIN - 2 * ROW_HEIGHT) / ROW_HEIGHT - 1) as usize;

pub type Row = [String; 6];

fn row(contact: &Contact) -> Row {
  [
    contact.first_name.clone(),
    contact.last_name.clone(),
    contact.email.clone(),
    contact.phone_number.clone(),
    contact.gender.map(|g| g.to_string()).unwrap_or_default(),
    contact.category.to_string(),
  ]
}

/// Split rows into pages. An empty export is still one (header-only) page.
pub fn paginate(contacts: &[&Contact]) -> Vec<Vec<Row>> {
  if contacts.is_empty() {
    return vec![Vec::new()];
  }
  contacts
    .chunks(ROWS_PER_PAGE)
    .map(|chunk| chunk.iter().map(|c| row(c)).collect())
    .collect()
}

/// Shorten `text` to what fits in a `width` pt column.
pub fn clip(text: &str, width: i64) -> String {
  let max = ((width - 4) / CHAR_WIDTH).max(1) as usize;
  if text.chars().count() <= max {
    return text.to_string();
  }
  let mut out: String = text.chars().take(max.saturating_sub(3)).collect();
  out.push_str("...");
  out
}

/// WinAnsi bytes for `text`; characters outside Latin-1 become `?`.
fn pdf_string(text: &str) -> Object {
  let bytes = text
    .chars()
    .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
    .collect();
  Object::String(bytes, StringFormat::Literal)
}

fn text(ops: &mut Vec<Operation>, font: &str, size: i64, x: i64, y: i64, s: &str) {
  ops.push(Operation::new("BT", vec![]));
  ops.push(Operation::new("Tf", vec![
    Object::Name(font.as_bytes().to_vec()),
    Object::Integer(size),
  ]));
  ops.push(Operation::new("Td", vec![
    Object::Integer(x),
    Object::Integer(y),
  ]));
  ops.push(Operation::new("Tj", vec![pdf_string(s)]));
  ops.push(Operation::new("ET", vec![]));
}

fn draw_row(ops: &mut Vec<Operation>, font: &str, cells: &[String], y: i64) {
  let mut x = MARGIN;
  for (cell, (_, width)) in cells.iter().zip(COLUMNS) {
    text(ops, font, FONT_SIZE, x, y, &clip(cell, width));
    x += width;
  }
}

fn font(doc: &mut Document, base: &str) -> ObjectId {
  doc.add_object(dictionary! {
    "Type" => "Font",
    "Subtype" => "Type1",
    "BaseFont" => base,
    "Encoding" => "WinAnsiEncoding",
  })
}

/// Render `contacts` as PDF bytes.
pub fn render(contacts: &[&Contact]) -> Result<Vec<u8>> {
  let mut doc = Document::with_version("1.5");
  let pages_id = doc.new_object_id();

  let regular = font(&mut doc, "Helvetica");
  let bold = font(&mut doc, "Helvetica-Bold");
  let resources_id = doc.add_object(dictionary! {
    "Font" => dictionary! { "F1" => regular, "F2" => bold },
  });

  let header: Vec<String> = COLUMNS.iter().map(|(t, _)| t.to_string()).collect();
  let mut kids = Vec::new();

  for (i, page_rows) in paginate(contacts).iter().enumerate() {
    let mut ops = Vec::new();
    let mut y = PAGE_HEIGHT - MARGIN;
    if i == 0 {
      text(&mut ops, "F2", TITLE_SIZE, MARGIN, y, "Contacts");
    }
    y -= 2 * ROW_HEIGHT;
    draw_row(&mut ops, "F2", &header, y);

    for cells in page_rows {
      y -= ROW_HEIGHT;
      draw_row(&mut ops, "F1", cells, y);
    }

    let content = Content { operations: ops }
      .encode()
      .context("encoding page content")?;
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content));
    let page_id = doc.add_object(dictionary! {
      "Type" => "Page",
      "Parent" => pages_id,
      "Contents" => content_id,
    });
    kids.push(Object::Reference(page_id));
  }

  let count = kids.len() as i64;
  doc.objects.insert(
    pages_id,
    Object::Dictionary(dictionary! {
      "Type" => "Pages",
      "Kids" => kids,
      "Count" => count,
      "Resources" => resources_id,
      "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    }),
  );
  let catalog_id = doc.add_object(dictionary! {
    "Type" => "Catalog",
    "Pages" => pages_id,
  });
  doc.trailer.set("Root", catalog_id);
  doc.compress();

  let mut bytes = Vec::new();
  doc.save_to(&mut bytes).context("encoding PDF")?;
  Ok(bytes)
}

/// Render and write to `path`, replacing any existing file.
pub fn write(contacts: &[&Contact], path: &Path) -> Result<()> {
  let bytes = render(contacts)?;
  std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
  tracing::info!(path = %path.display(), rows = contacts.len(), "exported contacts");
  Ok(())
}
