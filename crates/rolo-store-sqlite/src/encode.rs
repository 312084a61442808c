//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD`. Enumerations are stored by their wire
//! names. UUIDs are stored as hyphenated lowercase strings.

use chrono::NaiveDate;
use rolo_core::contact::{Category, Contact, ContactPatch, Gender, NewContact};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── NaiveDate ────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Enumerations ─────────────────────────────────────────────────────────────

pub fn encode_gender(g: Gender) -> &'static str { g.into() }

pub fn decode_gender(s: &str) -> Result<Gender> {
  s.parse().map_err(|_| Error::Decode {
    column: "gender",
    value:  s.to_owned(),
  })
}

pub fn encode_category(c: Category) -> &'static str { c.into() }

pub fn decode_category(s: &str) -> Result<Category> {
  s.parse().map_err(|_| Error::Decode {
    column: "category",
    value:  s.to_owned(),
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `contacts` row, in
/// [`crate::schema::CONTACT_COLUMNS`] order.
pub struct RawContact {
  pub contact_id:   String,
  pub first_name:   String,
  pub last_name:    String,
  pub email:        String,
  pub phone_number: String,
  pub birthday:     Option<String>,
  pub address:      Option<String>,
  pub notes:        Option<String>,
  pub gender:       Option<String>,
  pub category:     String,
  pub image_url:    Option<String>,
}

impl RawContact {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      contact_id:   row.get(0)?,
      first_name:   row.get(1)?,
      last_name:    row.get(2)?,
      email:        row.get(3)?,
      phone_number: row.get(4)?,
      birthday:     row.get(5)?,
      address:      row.get(6)?,
      notes:        row.get(7)?,
      gender:       row.get(8)?,
      category:     row.get(9)?,
      image_url:    row.get(10)?,
    })
  }

  /// Encode a freshly-identified contact for `INSERT`.
  pub fn from_new(id: Uuid, c: NewContact) -> Self {
    Self {
      contact_id:   encode_uuid(id),
      first_name:   c.first_name,
      last_name:    c.last_name,
      email:        c.email,
      phone_number: c.phone_number,
      birthday:     c.birthday.map(encode_date),
      address:      c.address,
      notes:        c.notes,
      gender:       c.gender.map(encode_gender).map(str::to_owned),
      category:     encode_category(c.category).to_owned(),
      image_url:    c.image_url,
    }
  }

  pub fn into_contact(self) -> Result<Contact> {
    Ok(Contact {
      id:           decode_uuid(&self.contact_id)?,
      first_name:   self.first_name,
      last_name:    self.last_name,
      email:        self.email,
      phone_number: self.phone_number,
      birthday:     self.birthday.as_deref().map(decode_date).transpose()?,
      address:      self.address,
      notes:        self.notes,
      gender:       self.gender.as_deref().map(decode_gender).transpose()?,
      category:     decode_category(&self.category)?,
      image_url:    self.image_url,
    })
  }
}

/// `(column, value)` assignments for an `UPDATE ... SET`, one per field
/// present in the patch. `None` values write SQL `NULL`.
pub fn encode_patch(p: ContactPatch) -> Vec<(&'static str, Option<String>)> {
  let mut sets = Vec::new();
  if let Some(v) = p.first_name {
    sets.push(("first_name", Some(v)));
  }
  if let Some(v) = p.last_name {
    sets.push(("last_name", Some(v)));
  }
  if let Some(v) = p.email {
    sets.push(("email", Some(v)));
  }
  if let Some(v) = p.phone_number {
    sets.push(("phone_number", Some(v)));
  }
  if let Some(v) = p.birthday {
    sets.push(("birthday", v.map(encode_date)));
  }
  if let Some(v) = p.address {
    sets.push(("address", v));
  }
  if let Some(v) = p.notes {
    sets.push(("notes", v));
  }
  if let Some(v) = p.gender {
    sets.push(("gender", v.map(encode_gender).map(str::to_owned)));
  }
  if let Some(v) = p.category {
    sets.push(("category", Some(encode_category(v).to_owned())));
  }
  if let Some(v) = p.image_url {
    sets.push(("image_url", Some(v)));
  }
  sets
}
