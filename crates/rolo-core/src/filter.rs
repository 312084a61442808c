//! Client-side list filtering over an already-fetched contact list.
//!
//! Two predicates, combined with AND: a case-insensitive substring match on
//! `"first last"`, and an exact category match where [`CategoryFilter::All`]
//! disables the category check.

use std::fmt;

use crate::contact::{Category, Contact};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
  #[default]
  All,
  Only(Category),
}

impl CategoryFilter {
  pub fn matches(self, category: Category) -> bool {
    match self {
      Self::All => true,
      Self::Only(c) => c == category,
    }
  }
}

impl fmt::Display for CategoryFilter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::All => f.write_str("all"),
      Self::Only(c) => write!(f, "{c}"),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
  pub text:     String,
  pub category: CategoryFilter,
}

impl ContactFilter {
  pub fn matches(&self, contact: &Contact) -> bool {
    let needle = self.text.to_lowercase();
    contact.full_name().to_lowercase().contains(&needle)
      && self.category.matches(contact.category)
  }

  /// The matching contacts, in their original order.
  pub fn apply<'a>(&self, contacts: &'a [Contact]) -> Vec<&'a Contact> {
    contacts.iter().filter(|c| self.matches(c)).collect()
  }
}

/// Distinct categories present in `contacts`, in first-seen order.
pub fn categories_present(contacts: &[Contact]) -> Vec<Category> {
  let mut seen = Vec::new();
  for c in contacts {
    if !seen.contains(&c.category) {
      seen.push(c.category);
    }
  }
  seen
}

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::*;
  use crate::contact::NewContact;

  fn contact(first: &str, last: &str, phone: &str, category: Category) -> Contact {
    NewContact::new(first, last, format!("{phone}@example.com"), phone, category)
      .into_contact(Uuid::new_v4())
  }

  fn ann_and_bob() -> Vec<Contact> {
    vec![
      contact("Ann", "Smith", "1", Category::Family),
      contact("Bob", "Jones", "2", Category::Work),
    ]
  }

  fn names(list: Vec<&Contact>) -> Vec<&str> {
    list.into_iter().map(|c| c.first_name.as_str()).collect()
  }

  #[test]
  fn text_is_case_insensitive_substring_of_full_name() {
    let contacts = ann_and_bob();
    let f = ContactFilter {
      text: "an".into(),
      ..Default::default()
    };
    assert_eq!(names(f.apply(&contacts)), ["Ann"]);

    let f = ContactFilter {
      text: "N SMI".into(),
      ..Default::default()
    };
    assert_eq!(names(f.apply(&contacts)), ["Ann"]);
  }

  #[test]
  fn category_filter_is_exact() {
    let contacts = ann_and_bob();
    let f = ContactFilter {
      category: CategoryFilter::Only(Category::Work),
      ..Default::default()
    };
    assert_eq!(names(f.apply(&contacts)), ["Bob"]);
  }

  #[test]
  fn all_sentinel_keeps_everything() {
    let contacts = ann_and_bob();
    let f = ContactFilter {
      category: CategoryFilter::All,
      ..Default::default()
    };
    assert_eq!(names(f.apply(&contacts)), ["Ann", "Bob"]);
  }

  #[test]
  fn filters_combine_with_and() {
    let contacts = ann_and_bob();
    let f = ContactFilter {
      text:     "bob".into(),
      category: CategoryFilter::Only(Category::Family),
    };
    assert!(f.apply(&contacts).is_empty());
  }

  #[test]
  fn category_filter_displays() {
    assert_eq!(CategoryFilter::All.to_string(), "all");
    assert_eq!(
      CategoryFilter::Only(Category::ServiceProviders).to_string(),
      "Service Providers"
    );
  }

  #[test]
  fn categories_present_are_distinct_in_first_seen_order() {
    let mut contacts = ann_and_bob();
    contacts.push(contact("Cy", "Doe", "3", Category::Family));
    assert_eq!(
      categories_present(&contacts),
      [Category::Family, Category::Work]
    );
  }
}
