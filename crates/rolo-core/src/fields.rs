//! Raw, untyped contact fields as they arrive in a form submission.
//!
//! [`ContactFields`] collects `name=value` pairs keyed by the JSON field names
//! (`firstName`, `phoneNumber`, ...) and turns them into a validated
//! [`NewContact`] or [`ContactPatch`].

use std::str::FromStr;

use chrono::{DateTime, NaiveDate};

use crate::{
  Error, Result,
  contact::{Category, ContactPatch, Gender, NewContact},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
  pub first_name:   Option<String>,
  pub last_name:    Option<String>,
  pub email:        Option<String>,
  pub phone_number: Option<String>,
  pub birthday:     Option<String>,
  pub address:      Option<String>,
  pub notes:        Option<String>,
  pub gender:       Option<String>,
  pub category:     Option<String>,
}

impl ContactFields {
  /// Record one submitted field. Returns `false` for names that are not
  /// contact fields (`id`, `imageUrl`, ...), which callers ignore.
  pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
    let slot = match name {
      "firstName" => &mut self.first_name,
      "lastName" => &mut self.last_name,
      "email" => &mut self.email,
      "phoneNumber" => &mut self.phone_number,
      "birthday" => &mut self.birthday,
      "address" => &mut self.address,
      "notes" => &mut self.notes,
      "gender" => &mut self.gender,
      "category" => &mut self.category,
      _ => return false,
    };
    *slot = Some(value.into().trim().to_owned());
    true
  }

  /// Validate as a complete record for creation.
  pub fn into_new_contact(self) -> Result<NewContact> {
    Ok(NewContact {
      first_name:   required("firstName", self.first_name)?,
      last_name:    required("lastName", self.last_name)?,
      email:        required("email", self.email)?,
      phone_number: required("phoneNumber", self.phone_number)?,
      birthday:     optional(self.birthday)
        .map(|s| parse_birthday(&s))
        .transpose()?,
      address:      optional(self.address),
      notes:        optional(self.notes),
      gender:       optional(self.gender)
        .map(|s| parse_enum::<Gender>("gender", s))
        .transpose()?,
      category:     parse_enum("category", required("category", self.category)?)?,
      image_url:    None,
    })
  }

  /// Validate as a partial update. Absent fields stay `None`.
  pub fn into_patch(self) -> Result<ContactPatch> {
    Ok(ContactPatch {
      first_name:   self
        .first_name
        .map(|v| required("firstName", Some(v)))
        .transpose()?,
      last_name:    self
        .last_name
        .map(|v| required("lastName", Some(v)))
        .transpose()?,
      email:        self.email.map(|v| required("email", Some(v))).transpose()?,
      phone_number: self
        .phone_number
        .map(|v| required("phoneNumber", Some(v)))
        .transpose()?,
      birthday:     self
        .birthday
        .map(|v| optional(Some(v)).map(|s| parse_birthday(&s)).transpose())
        .transpose()?,
      address:      self.address.map(|v| optional(Some(v))),
      notes:        self.notes.map(|v| optional(Some(v))),
      gender:       self
        .gender
        .map(|v| {
          optional(Some(v))
            .map(|s| parse_enum::<Gender>("gender", s))
            .transpose()
        })
        .transpose()?,
      category:     self
        .category
        .map(|v| parse_enum("category", required("category", Some(v))?))
        .transpose()?,
      image_url:    None,
    })
  }
}

fn required(field: &'static str, value: Option<String>) -> Result<String> {
  optional(value).ok_or(Error::MissingField(field))
}

/// Empty submissions (and the literal `undefined`/`null` some browser form
/// libraries emit for unset inputs) count as absent.
fn optional(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.is_empty() && v != "undefined" && v != "null")
}

fn parse_enum<T: FromStr>(field: &'static str, value: String) -> Result<T> {
  value
    .parse()
    .map_err(|_| Error::InvalidField { field, value })
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (date part kept).
pub fn parse_birthday(value: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(value, "%Y-%m-%d")
    .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
    .map_err(|_| Error::InvalidField {
      field: "birthday",
      value: value.to_owned(),
    })
}
