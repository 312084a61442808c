//! Contact types: the single entity managed by Rolo.
//!
//! A [`Contact`] is what the store persists and the API returns. Writes go in
//! through [`NewContact`] (create) and [`ContactPatch`] (partial update); both
//! are built from raw request fields by [`crate::fields::ContactFields`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

// ─── Enumerations ────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
pub enum Gender {
  Male,
  Female,
  Other,
}

/// The fixed, closed set of groups a contact can belong to.
///
/// The wire spelling is the variant name, except for `Service Providers`.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
pub enum Category {
  Family,
  Friends,
  Work,
  Business,
  Colleagues,
  Clients,
  Freelancers,
  Vendors,
  Investors,
  Partners,
  Mentors,
  Consultants,
  #[serde(rename = "Service Providers")]
  #[strum(serialize = "Service Providers")]
  ServiceProviders,
  Healthcare,
  Other,
}

// ─── Contact ─────────────────────────────────────────────────────────────────

/// A persisted contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
  /// Store-assigned; never changes after creation.
  pub id:           Uuid,
  pub first_name:   String,
  pub last_name:    String,
  /// Unique across all contacts.
  pub email:        String,
  /// Unique across all contacts.
  pub phone_number: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub birthday:     Option<NaiveDate>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes:        Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub gender:       Option<Gender>,
  pub category:     Category,
  /// Public path of an uploaded image, e.g. `/uploads/1700000000000.png`.
  /// Nothing guarantees the file still exists.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image_url:    Option<String>,
}

impl Contact {
  /// `"first last"`, the string the name search runs over.
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}

// ─── NewContact ──────────────────────────────────────────────────────────────

/// Input to [`crate::store::ContactStore::create`].
/// `id` is always assigned by the store; it is not accepted from callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
  pub first_name:   String,
  pub last_name:    String,
  pub email:        String,
  pub phone_number: String,
  pub birthday:     Option<NaiveDate>,
  pub address:      Option<String>,
  pub notes:        Option<String>,
  pub gender:       Option<Gender>,
  pub category:     Category,
  pub image_url:    Option<String>,
}

impl NewContact {
  /// Convenience constructor with all optional fields empty.
  pub fn new(
    first_name: impl Into<String>,
    last_name: impl Into<String>,
    email: impl Into<String>,
    phone_number: impl Into<String>,
    category: Category,
  ) -> Self {
    Self {
      first_name: first_name.into(),
      last_name: last_name.into(),
      email: email.into(),
      phone_number: phone_number.into(),
      birthday: None,
      address: None,
      notes: None,
      gender: None,
      category,
      image_url: None,
    }
  }

  /// Attach the store-assigned id.
  pub fn into_contact(self, id: Uuid) -> Contact {
    Contact {
      id,
      first_name: self.first_name,
      last_name: self.last_name,
      email: self.email,
      phone_number: self.phone_number,
      birthday: self.birthday,
      address: self.address,
      notes: self.notes,
      gender: self.gender,
      category: self.category,
      image_url: self.image_url,
    }
  }
}

// ─── ContactPatch ────────────────────────────────────────────────────────────

/// A partial update. `None` leaves the stored value alone.
///
/// Optional fields use a nested `Option`: `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPatch {
  pub first_name:   Option<String>,
  pub last_name:    Option<String>,
  pub email:        Option<String>,
  pub phone_number: Option<String>,
  pub birthday:     Option<Option<NaiveDate>>,
  pub address:      Option<Option<String>>,
  pub notes:        Option<Option<String>>,
  pub gender:       Option<Option<Gender>>,
  pub category:     Option<Category>,
  pub image_url:    Option<String>,
}

impl ContactPatch {
  pub fn is_empty(&self) -> bool { *self == Self::default() }

  /// Merge the patch over `contact` in place.
  pub fn apply(self, contact: &mut Contact) {
    if let Some(v) = self.first_name {
      contact.first_name = v;
    }
    if let Some(v) = self.last_name {
      contact.last_name = v;
    }
    if let Some(v) = self.email {
      contact.email = v;
    }
    if let Some(v) = self.phone_number {
      contact.phone_number = v;
    }
    if let Some(v) = self.birthday {
      contact.birthday = v;
    }
    if let Some(v) = self.address {
      contact.address = v;
    }
    if let Some(v) = self.notes {
      contact.notes = v;
    }
    if let Some(v) = self.gender {
      contact.gender = v;
    }
    if let Some(v) = self.category {
      contact.category = v;
    }
    if let Some(v) = self.image_url {
      contact.image_url = Some(v);
    }
  }
}
