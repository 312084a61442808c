//! Create/edit form state and client-side validation.
//!
//! The service is authoritative for required fields and uniqueness; the
//! checks here exist so the user sees a clear message before a round-trip.

use std::path::PathBuf;

use chrono::NaiveDate;
use rolo_core::{
  contact::{Category, Contact, Gender},
  fields::parse_birthday,
};
use strum::IntoEnumIterator as _;
use thiserror::Error;
use uuid::Uuid;

/// Characters a first or last name may not contain (besides digits).
const NAME_FORBIDDEN: &str = "!@#$%^&*(),.?\":{}|<>";

// ─── Fields ───────────────────────────────────────────────────────────────────

/// Form rows, in display and tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIter)]
pub enum Field {
  FirstName,
  LastName,
  Email,
  PhoneNumber,
  Birthday,
  Address,
  Notes,
  Gender,
  Category,
  Image,
}

impl Field {
  pub fn label(self) -> &'static str {
    match self {
      Field::FirstName => "First name",
      Field::LastName => "Last name",
      Field::Email => "Email",
      Field::PhoneNumber => "Phone",
      Field::Birthday => "Birthday",
      Field::Address => "Address",
      Field::Notes => "Notes",
      Field::Gender => "Gender",
      Field::Category => "Category",
      Field::Image => "Image file",
    }
  }

  /// Chosen from a fixed list rather than typed.
  pub fn is_choice(self) -> bool { matches!(self, Field::Gender | Field::Category) }

  pub fn is_required(self) -> bool {
    matches!(
      self,
      Field::FirstName | Field::LastName | Field::Email | Field::PhoneNumber | Field::Category
    )
  }
}

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
  #[error("{} is required", .0.label())]
  Required(Field),

  #[error("{} may not contain digits or special characters", .0.label())]
  InvalidName(Field),

  #[error("{0:?} is not a valid email address")]
  InvalidEmail(String),

  #[error("birthday must be YYYY-MM-DD")]
  InvalidBirthday,

  #[error("birthday cannot be in the future")]
  FutureBirthday,

  #[error("phone number {0} is already used by {1}")]
  DuplicatePhone(String, String),

  #[error("image file {0} does not exist")]
  MissingImage(PathBuf),
}

// ─── Draft ────────────────────────────────────────────────────────────────────

/// A contact being created or edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
  /// `Some` when editing an existing contact.
  pub editing:      Option<Uuid>,
  pub first_name:   String,
  pub last_name:    String,
  pub email:        String,
  pub phone_number: String,
  pub birthday:     String,
  pub address:      String,
  pub notes:        String,
  pub gender:       Option<Gender>,
  pub category:     Option<Category>,
  /// Local path of an image to upload; empty for none.
  pub image_path:   String,
  pub focus:        usize,
}

/// A validated form, ready to send as multipart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
  /// `(wire name, value)` pairs. An empty value clears the field on update.
  pub fields: Vec<(&'static str, String)>,
  pub image:  Option<PathBuf>,
}

impl Draft {
  pub fn new() -> Self { Self::default() }

  /// Prefill from an existing contact.
  pub fn edit(contact: &Contact) -> Self {
    Self {
      editing:      Some(contact.id),
      first_name:   contact.first_name.clone(),
      last_name:    contact.last_name.clone(),
      email:        contact.email.clone(),
      phone_number: contact.phone_number.clone(),
      birthday:     contact
        .birthday
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default(),
      address:      contact.address.clone().unwrap_or_default(),
      notes:        contact.notes.clone().unwrap_or_default(),
      gender:       contact.gender,
      category:     Some(contact.category),
      image_path:   String::new(),
      focus:        0,
    }
  }

  pub fn fields() -> Vec<Field> { Field::iter().collect() }

  pub fn focused(&self) -> Field {
    Self::fields()
      .get(self.focus)
      .copied()
      .unwrap_or(Field::FirstName)
  }

  pub fn focus_next(&mut self) { self.focus = (self.focus + 1) % Self::fields().len(); }

  pub fn focus_prev(&mut self) {
    let n = Self::fields().len();
    self.focus = (self.focus + n - 1) % n;
  }

  fn text_mut(&mut self, field: Field) -> Option<&mut String> {
    match field {
      Field::FirstName => Some(&mut self.first_name),
      Field::LastName => Some(&mut self.last_name),
      Field::Email => Some(&mut self.email),
      Field::PhoneNumber => Some(&mut self.phone_number),
      Field::Birthday => Some(&mut self.birthday),
      Field::Address => Some(&mut self.address),
      Field::Notes => Some(&mut self.notes),
      Field::Image => Some(&mut self.image_path),
      Field::Gender | Field::Category => None,
    }
  }

  pub fn push_char(&mut self, c: char) {
    let field = self.focused();
    if let Some(text) = self.text_mut(field) {
      text.push(c);
    }
  }

  pub fn pop_char(&mut self) {
    let field = self.focused();
    match self.text_mut(field) {
      Some(text) => {
        text.pop();
      }
      None if field == Field::Gender => self.gender = None,
      None => {}
    }
  }

  /// Step the focused choice field through its options. Gender may be
  /// unset; category, once chosen, always has a value.
  pub fn cycle(&mut self, forward: bool) {
    match self.focused() {
      Field::Gender => {
        let mut options: Vec<Option<Gender>> = vec![None];
        options.extend(Gender::iter().map(Some));
        self.gender = step(&options, &self.gender, forward);
      }
      Field::Category => {
        let options: Vec<Category> = Category::iter().collect();
        self.category = match self.category {
          None if forward => options.first().copied(),
          None => options.last().copied(),
          Some(current) => Some(step(&options, &current, forward)),
        };
      }
      _ => {}
    }
  }

  /// Display value for a row.
  pub fn display(&self, field: Field) -> String {
    match field {
      Field::FirstName => self.first_name.clone(),
      Field::LastName => self.last_name.clone(),
      Field::Email => self.email.clone(),
      Field::PhoneNumber => self.phone_number.clone(),
      Field::Birthday => self.birthday.clone(),
      Field::Address => self.address.clone(),
      Field::Notes => self.notes.clone(),
      Field::Gender => self.gender.map(|g| g.to_string()).unwrap_or_default(),
      Field::Category => self.category.map(|c| c.to_string()).unwrap_or_default(),
      Field::Image => self.image_path.clone(),
    }
  }

  /// Check the draft against the rules the service and the user expect.
  ///
  /// `existing` is a freshly fetched contact list, used to spot a phone
  /// number already held by another contact. `today` bounds the birthday.
  pub fn validate(&self, existing: &[Contact], today: NaiveDate) -> Result<Submission, FormError> {
    let first_name = self.first_name.trim();
    let last_name = self.last_name.trim();
    let email = self.email.trim();
    let phone = self.phone_number.trim();

    for (field, value) in [
      (Field::FirstName, first_name),
      (Field::LastName, last_name),
      (Field::Email, email),
      (Field::PhoneNumber, phone),
    ] {
      if value.is_empty() {
        return Err(FormError::Required(field));
      }
    }
    let Some(category) = self.category else {
      return Err(FormError::Required(Field::Category));
    };

    for (field, value) in [(Field::FirstName, first_name), (Field::LastName, last_name)] {
      if !is_valid_name(value) {
        return Err(FormError::InvalidName(field));
      }
    }

    if !is_valid_email(email) {
      return Err(FormError::InvalidEmail(email.to_owned()));
    }

    let birthday = match self.birthday.trim() {
      "" => None,
      raw => {
        let date = parse_birthday(raw).map_err(|_| FormError::InvalidBirthday)?;
        if date > today {
          return Err(FormError::FutureBirthday);
        }
        Some(date)
      }
    };

    if let Some(other) = existing
      .iter()
      .find(|c| c.phone_number == phone && Some(c.id) != self.editing)
    {
      return Err(FormError::DuplicatePhone(
        phone.to_owned(),
        other.full_name(),
      ));
    }

    let image = match self.image_path.trim() {
      "" => None,
      raw => {
        let path = PathBuf::from(raw);
        if !path.is_file() {
          return Err(FormError::MissingImage(path));
        }
        Some(path)
      }
    };

    let mut fields = vec![
      ("firstName", first_name.to_owned()),
      ("lastName", last_name.to_owned()),
      ("email", email.to_owned()),
      ("phoneNumber", phone.to_owned()),
      ("category", category.to_string()),
    ];
    let optional = [
      (
        "birthday",
        birthday
          .map(|d| d.format("%Y-%m-%d").to_string())
          .unwrap_or_default(),
      ),
      ("address", self.address.trim().to_owned()),
      ("notes", self.notes.trim().to_owned()),
      (
        "gender",
        self.gender.map(|g| g.to_string()).unwrap_or_default(),
      ),
    ];
    // On create an empty optional is simply left out; on edit it is sent
    // empty so the stored value is cleared.
    for (name, value) in optional {
      if !value.is_empty() || self.editing.is_some() {
        fields.push((name, value));
      }
    }

    Ok(Submission { fields, image })
  }
}

fn step<T: Clone + PartialEq>(options: &[T], current: &T, forward: bool) -> T {
  let n = options.len();
  let i = options.iter().position(|o| o == current).unwrap_or(0);
  let next = if forward { (i + 1) % n } else { (i + n - 1) % n };
  options[next].clone()
}

pub fn is_valid_name(name: &str) -> bool {
  !name
    .chars()
    .any(|c| c.is_ascii_digit() || NAME_FORBIDDEN.contains(c))
}

/// `local@domain.tld`, no whitespace, exactly one `@`.
pub fn is_valid_email(email: &str) -> bool {
  let Some((local, domain)) = email.split_once('@') else {
    return false;
  };
  !local.is_empty()
    && !domain.contains('@')
    && !email.chars().any(char::is_whitespace)
    && domain.split('.').count() >= 2
    && domain.split('.').all(|part| !part.is_empty())
}

#[cfg(test)]
mod tests {
  use rolo_core::contact::NewContact;

  use super::*;

  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 6, 1).unwrap() }

  fn filled() -> Draft {
    Draft {
      first_name: "Ann".into(),
      last_name: "Lee".into(),
      email: "ann@example.com".into(),
      phone_number: "555-0001".into(),
      category: Some(Category::Family),
      ..Draft::new()
    }
  }

  fn existing(phone: &str) -> Contact {
    NewContact::new("Bob", "Stone", "bob@example.com", phone, Category::Work)
      .into_contact(Uuid::new_v4())
  }

  #[test]
  fn complete_draft_produces_required_fields_only() {
    let sub = filled().validate(&[], today()).unwrap();
    let names: Vec<_> = sub.fields.iter().map(|(n, _)| *n).collect();
    assert_eq!(names, [
      "firstName",
      "lastName",
      "email",
      "phoneNumber",
      "category"
    ]);
    assert_eq!(sub.image, None);
  }

  #[test]
  fn editing_sends_empty_optionals_to_clear_them() {
    let mut d = filled();
    d.editing = Some(Uuid::new_v4());
    let sub = d.validate(&[], today()).unwrap();
    assert!(sub.fields.contains(&("address", String::new())));
    assert!(sub.fields.contains(&("gender", String::new())));
  }

  #[test]
  fn each_required_field_is_checked() {
    let mut d = filled();
    d.email = "  ".into();
    assert_eq!(
      d.validate(&[], today()),
      Err(FormError::Required(Field::Email))
    );

    let mut d = filled();
    d.category = None;
    assert_eq!(
      d.validate(&[], today()),
      Err(FormError::Required(Field::Category))
    );
  }

  #[test]
  fn names_reject_digits_and_symbols() {
    assert!(is_valid_name("Mary Ann"));
    assert!(is_valid_name("O'Brien"));
    assert!(!is_valid_name("R2D2"));
    assert!(!is_valid_name("Ann!"));
    assert!(!is_valid_name("Lee, Jr"));

    let mut d = filled();
    d.last_name = "Lee.".into();
    assert_eq!(
      d.validate(&[], today()),
      Err(FormError::InvalidName(Field::LastName))
    );
  }

  #[test]
  fn email_shape() {
    assert!(is_valid_email("a@b.co"));
    assert!(!is_valid_email("a@b"));
    assert!(!is_valid_email("@b.co"));
    assert!(!is_valid_email("a b@c.co"));
    assert!(!is_valid_email("a@@b.co"));
    assert!(!is_valid_email("a@b..co"));
  }

  #[test]
  fn birthday_must_parse_and_not_be_future() {
    let mut d = filled();
    d.birthday = "1990-04-12".into();
    let sub = d.validate(&[], today()).unwrap();
    assert!(sub.fields.contains(&("birthday", "1990-04-12".into())));

    d.birthday = "12/04/1990".into();
    assert_eq!(d.validate(&[], today()), Err(FormError::InvalidBirthday));

    d.birthday = "2024-06-02".into();
    assert_eq!(d.validate(&[], today()), Err(FormError::FutureBirthday));

    d.birthday = "2024-06-01".into();
    assert!(d.validate(&[], today()).is_ok());
  }

  #[test]
  fn duplicate_phone_is_reported_with_holder() {
    let others = [existing("555-0001")];
    assert_eq!(
      filled().validate(&others, today()),
      Err(FormError::DuplicatePhone(
        "555-0001".into(),
        "Bob Stone".into()
      ))
    );
  }

  #[test]
  fn editing_contact_may_keep_its_own_phone() {
    let me = existing("555-0001");
    let mut d = Draft::edit(&me);
    d.notes = "still me".into();
    assert!(d.validate(&[me], today()).is_ok());
  }

  #[test]
  fn missing_image_file_is_rejected() {
    let mut d = filled();
    d.image_path = "/definitely/not/here.png".into();
    assert!(matches!(
      d.validate(&[], today()),
      Err(FormError::MissingImage(_))
    ));

    let file = tempfile::NamedTempFile::new().unwrap();
    d.image_path = file.path().display().to_string();
    let sub = d.validate(&[], today()).unwrap();
    assert_eq!(sub.image.as_deref(), Some(file.path()));
  }

  #[test]
  fn typing_and_cycling() {
    let mut d = Draft::new();
    d.push_char('A');
    d.push_char('n');
    assert_eq!(d.first_name, "An");
    d.pop_char();
    assert_eq!(d.first_name, "A");

    d.focus = Draft::fields()
      .iter()
      .position(|f| *f == Field::Gender)
      .unwrap();
    d.push_char('x');
    assert_eq!(d.gender, None);
    d.cycle(true);
    assert_eq!(d.gender, Some(Gender::Male));
    d.cycle(false);
    d.cycle(false);
    assert_eq!(d.gender, Some(Gender::Other));

    d.focus_next();
    assert_eq!(d.focused(), Field::Category);
    d.cycle(false);
    assert_eq!(d.category, Some(Category::Other));
    d.cycle(true);
    assert_eq!(d.category, Some(Category::Family));
  }

  #[test]
  fn focus_wraps() {
    let mut d = Draft::new();
    d.focus_prev();
    assert_eq!(d.focused(), Field::Image);
    d.focus_next();
    assert_eq!(d.focused(), Field::FirstName);
  }
}
