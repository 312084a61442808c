//! Application state machine and event dispatcher.

use std::{path::PathBuf, sync::Arc};

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rolo_core::{
  contact::Contact,
  filter::{CategoryFilter, ContactFilter, categories_present},
};
use uuid::Uuid;

use crate::{
  client::ApiClient,
  export,
  form::{Draft, Submission},
};

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
  /// Focus on the contact table.
  ContactList,
  /// Read-only view of one contact beside the table.
  ContactDetail,
  /// Create/edit popup.
  Form,
  /// "Delete this contact?" popup.
  ConfirmDelete,
}

/// A write waiting to be sent once the "saving" frame has been drawn.
#[derive(Debug, Clone)]
pub enum Pending {
  Save {
    editing:    Option<Uuid>,
    submission: Submission,
  },
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Current screen / keyboard focus.
  pub screen: Screen,

  /// Every contact, as last fetched. Never patched locally.
  pub contacts: Vec<Contact>,

  /// Search text and category selection.
  pub filter: ContactFilter,

  /// Whether the user is typing a search query.
  pub filter_active: bool,

  /// Cursor position within the *filtered* contact list.
  pub list_cursor: usize,

  /// The contact shown in the detail pane.
  pub detail: Option<Contact>,

  /// The open create/edit form.
  pub draft: Option<Draft>,

  /// The form passed validation and awaits a y/n.
  pub confirm_submit: bool,

  /// A save request is in flight; form input is ignored.
  pub submitting: bool,

  pending: Option<Pending>,

  /// Contact awaiting delete confirmation.
  pub delete_target: Option<Contact>,

  /// Where `x` writes the PDF export.
  pub export_path: PathBuf,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,
}

impl App {
  pub fn new(client: ApiClient, export_path: PathBuf) -> Self {
    Self {
      screen: Screen::ContactList,
      contacts: Vec::new(),
      filter: ContactFilter::default(),
      filter_active: false,
      list_cursor: 0,
      detail: None,
      draft: None,
      confirm_submit: false,
      submitting: false,
      pending: None,
      delete_target: None,
      export_path,
      status_msg: String::new(),
      client: Arc::new(client),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch all contacts. On failure the previous list is kept.
  pub async fn load_contacts(&mut self) -> anyhow::Result<()> {
    match self.client.list_contacts().await {
      Ok(contacts) => {
        self.contacts = contacts;
        self.clamp_cursor();
        if let CategoryFilter::Only(c) = self.filter.category
          && !categories_present(&self.contacts).contains(&c)
        {
          self.filter.category = CategoryFilter::All;
        }
        Ok(())
      }
      Err(e) => {
        tracing::warn!(error = %e, "failed to load contacts");
        self.status_msg = format!("Error: {e}");
        Err(e)
      }
    }
  }

  async fn reload(&mut self) {
    // Errors already land in the status bar.
    let _ = self.load_contacts().await;
  }

  // ── Filtered list ─────────────────────────────────────────────────────────

  /// Contacts matching the current search and category.
  pub fn filtered_contacts(&self) -> Vec<&Contact> { self.filter.apply(&self.contacts) }

  /// The contact under the list cursor in the filtered view, if any.
  pub fn cursor_contact(&self) -> Option<&Contact> {
    self.filtered_contacts().get(self.list_cursor).copied()
  }

  /// `all` followed by the categories present, in first-seen order.
  pub fn category_options(&self) -> Vec<CategoryFilter> {
    let mut options = vec![CategoryFilter::All];
    options.extend(
      categories_present(&self.contacts)
        .into_iter()
        .map(CategoryFilter::Only),
    );
    options
  }

  fn cycle_category(&mut self) {
    let options = self.category_options();
    let i = options
      .iter()
      .position(|o| *o == self.filter.category)
      .unwrap_or(0);
    self.filter.category = options[(i + 1) % options.len()];
    self.list_cursor = 0;
  }

  fn clamp_cursor(&mut self) {
    let len = self.filtered_contacts().len();
    self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
  }

  // ── Pending writes ────────────────────────────────────────────────────────

  pub fn has_pending(&self) -> bool { self.pending.is_some() }

  /// Send the queued write, if any, then refresh the list.
  pub async fn run_pending(&mut self) {
    let Some(Pending::Save {
      editing,
      submission,
    }) = self.pending.take()
    else {
      return;
    };

    let result = match editing {
      Some(id) => self.client.update_contact(id, &submission).await,
      None => self.client.create_contact(&submission).await,
    };
    self.submitting = false;
    self.confirm_submit = false;

    match result {
      Ok(contact) => {
        tracing::info!(id = %contact.id, "contact saved");
        self.status_msg = format!("Saved {}", contact.full_name());
        self.draft = None;
        if self.detail.as_ref().is_some_and(|d| d.id == contact.id) {
          self.detail = Some(contact);
          self.screen = Screen::ContactDetail;
        } else {
          self.screen = Screen::ContactList;
        }
        self.reload().await;
      }
      Err(e) => {
        tracing::warn!(error = %e, "save failed");
        self.status_msg = format!("Error: {e}");
      }
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    // Filter input mode: all printable keys go into the search string.
    if self.filter_active {
      return Ok(self.handle_filter_key(key));
    }

    match self.screen {
      Screen::ContactList => self.handle_list_key(key).await,
      Screen::ContactDetail => self.handle_detail_key(key).await,
      Screen::Form => {
        self.handle_form_key(key).await;
        Ok(true)
      }
      Screen::ConfirmDelete => {
        self.handle_confirm_delete_key(key).await;
        Ok(true)
      }
    }
  }

  fn handle_filter_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.text.clear();
        self.list_cursor = 0;
      }
      KeyCode::Enter => {
        self.filter_active = false;
        self.list_cursor = 0;
      }
      KeyCode::Backspace => {
        self.filter.text.pop();
        self.list_cursor = 0;
      }
      KeyCode::Char(c) => {
        self.filter.text.push(c);
        self.list_cursor = 0;
      }
      _ => {}
    }
    true
  }

  async fn handle_list_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      // Quit
      KeyCode::Char('q') => return Ok(false),

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.filtered_contacts().len();
        if len > 0 && self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }

      // Open detail
      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(id) = self.cursor_contact().map(|c| c.id) {
          self.open_detail(id).await;
        }
      }

      // Filters
      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.text.clear();
        self.list_cursor = 0;
      }
      KeyCode::Char('c') => self.cycle_category(),

      // Mutations
      KeyCode::Char('n') => self.open_form(None),
      KeyCode::Char('e') => {
        if let Some(c) = self.cursor_contact().cloned() {
          self.open_form(Some(&c));
        }
      }
      KeyCode::Char('d') => {
        if let Some(c) = self.cursor_contact().cloned() {
          self.ask_delete(c);
        }
      }

      KeyCode::Char('x') => self.export(),
      KeyCode::Char('r') => {
        if self.load_contacts().await.is_ok() {
          self.status_msg = format!("Loaded {} contacts", self.contacts.len());
        }
      }

      _ => {}
    }
    Ok(true)
  }

  async fn handle_detail_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      // Quit
      KeyCode::Char('q') => return Ok(false),

      // Back to list
      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        self.screen = Screen::ContactList;
        self.detail = None;
      }

      KeyCode::Char('e') => {
        if let Some(c) = self.detail.clone() {
          self.open_form(Some(&c));
        }
      }
      KeyCode::Char('d') => {
        if let Some(c) = self.detail.clone() {
          self.ask_delete(c);
        }
      }

      // Navigate list from detail (for quick switching)
      KeyCode::Char(']') | KeyCode::PageDown | KeyCode::Down | KeyCode::Char('j') => {
        let len = self.filtered_contacts().len();
        if len > 0 && self.list_cursor + 1 < len {
          self.list_cursor += 1;
          if let Some(id) = self.cursor_contact().map(|c| c.id) {
            self.open_detail(id).await;
          }
        }
      }
      KeyCode::Char('[') | KeyCode::PageUp | KeyCode::Up | KeyCode::Char('k') => {
        if self.list_cursor > 0 {
          self.list_cursor -= 1;
          if let Some(id) = self.cursor_contact().map(|c| c.id) {
            self.open_detail(id).await;
          }
        }
      }

      _ => {}
    }
    Ok(true)
  }

  async fn handle_form_key(&mut self, key: KeyEvent) {
    if self.submitting {
      return;
    }

    if self.confirm_submit {
      match key.code {
        KeyCode::Char('y') | KeyCode::Enter => self.queue_save(),
        KeyCode::Char('n') | KeyCode::Esc => {
          self.confirm_submit = false;
          self.status_msg.clear();
        }
        _ => {}
      }
      return;
    }

    let Some(draft) = self.draft.as_mut() else {
      self.screen = Screen::ContactList;
      return;
    };

    match key.code {
      KeyCode::Esc => self.close_form(),
      KeyCode::Tab | KeyCode::Down => draft.focus_next(),
      KeyCode::BackTab | KeyCode::Up => draft.focus_prev(),
      KeyCode::Left => draft.cycle(false),
      KeyCode::Right => draft.cycle(true),
      KeyCode::Backspace => draft.pop_char(),
      KeyCode::Enter => self.validate_form().await,
      KeyCode::Char(c) => draft.push_char(c),
      _ => {}
    }
  }

  async fn handle_confirm_delete_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('y') | KeyCode::Enter => {
        if let Some(target) = self.delete_target.take() {
          self.delete(target).await;
        }
      }
      KeyCode::Char('n') | KeyCode::Esc => {
        self.delete_target = None;
        self.screen = self.back_screen();
      }
      _ => {}
    }
  }

  // ── Actions ───────────────────────────────────────────────────────────────

  fn back_screen(&self) -> Screen {
    if self.detail.is_some() {
      Screen::ContactDetail
    } else {
      Screen::ContactList
    }
  }

  /// Transition to `ContactDetail`, fetching a fresh copy of the contact.
  async fn open_detail(&mut self, id: Uuid) {
    match self.client.get_contact(id).await {
      Ok(contact) => {
        self.detail = Some(contact);
        self.screen = Screen::ContactDetail;
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  fn open_form(&mut self, contact: Option<&Contact>) {
    self.draft = Some(contact.map_or_else(Draft::new, Draft::edit));
    self.confirm_submit = false;
    self.status_msg.clear();
    self.screen = Screen::Form;
  }

  fn close_form(&mut self) {
    self.draft = None;
    self.confirm_submit = false;
    self.screen = self.back_screen();
  }

  /// Fetch the current list for the phone check, then validate.
  async fn validate_form(&mut self) {
    let existing = match self.client.list_contacts().await {
      Ok(list) => list,
      Err(e) => {
        self.status_msg = format!("Error: {e}");
        return;
      }
    };
    let Some(draft) = &self.draft else { return };

    match draft.validate(&existing, Local::now().date_naive()) {
      Ok(submission) => {
        self.pending = Some(Pending::Save {
          editing: draft.editing,
          submission,
        });
        self.confirm_submit = true;
        self.status_msg = "Save this contact? y/n".into();
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  fn queue_save(&mut self) {
    if self.pending.is_some() {
      self.submitting = true;
      self.status_msg = "Saving…".into();
    } else {
      self.confirm_submit = false;
    }
  }

  fn ask_delete(&mut self, contact: Contact) {
    self.status_msg = format!("Delete {}? y/n", contact.full_name());
    self.delete_target = Some(contact);
    self.screen = Screen::ConfirmDelete;
  }

  async fn delete(&mut self, target: Contact) {
    match self.client.delete_contact(target.id).await {
      Ok(()) => {
        tracing::info!(id = %target.id, "contact deleted");
        self.status_msg = format!("Deleted {}", target.full_name());
        if self.detail.as_ref().is_some_and(|d| d.id == target.id) {
          self.detail = None;
        }
        self.screen = self.back_screen();
        self.reload().await;
      }
      Err(e) => {
        self.status_msg = format!("Error: {e}");
        self.screen = self.back_screen();
      }
    }
  }

  fn export(&mut self) {
    let rows = self.filtered_contacts();
    let count = rows.len();
    self.status_msg = match export::write(&rows, &self.export_path) {
      Ok(()) => format!(
        "Exported {count} contacts to {}",
        self.export_path.display()
      ),
      Err(e) => format!("Error: {e:#}"),
    };
  }
}

#[cfg(test)]
mod tests {
  use crossterm::event::KeyEvent;
  use rolo_core::contact::{Category, NewContact};

  use super::*;
  use crate::client::ApiConfig;

  fn app() -> App {
    let client = ApiClient::new(ApiConfig {
      base_url: "http://127.0.0.1:9".into(),
    })
    .unwrap();
    let mut app = App::new(client, PathBuf::from("contacts.pdf"));
    app.contacts = vec![
      NewContact::new("Ann", "Smith", "a@x.io", "1", Category::Family)
        .into_contact(Uuid::new_v4()),
      NewContact::new("Bob", "Jones", "b@x.io", "2", Category::Work)
        .into_contact(Uuid::new_v4()),
      NewContact::new("Cat", "Ng", "c@x.io", "3", Category::Family)
        .into_contact(Uuid::new_v4()),
    ];
    app
  }

  fn press(c: char) -> KeyEvent { KeyEvent::from(KeyCode::Char(c)) }

  #[test]
  fn category_options_are_all_then_first_seen() {
    assert_eq!(app().category_options(), [
      CategoryFilter::All,
      CategoryFilter::Only(Category::Family),
      CategoryFilter::Only(Category::Work),
    ]);
  }

  #[tokio::test]
  async fn search_and_category_combine() {
    let mut app = app();
    app.handle_key(press('/')).await.unwrap();
    for c in "a".chars() {
      app.handle_key(press(c)).await.unwrap();
    }
    app.handle_key(KeyEvent::from(KeyCode::Enter)).await.unwrap();
    let names: Vec<_> = app
      .filtered_contacts()
      .iter()
      .map(|c| c.first_name.as_str())
      .collect();
    assert_eq!(names, ["Ann", "Cat"]);

    // all → Family → Work
    app.handle_key(press('c')).await.unwrap();
    app.handle_key(press('c')).await.unwrap();
    assert!(app.filtered_contacts().is_empty());

    app.handle_key(press('c')).await.unwrap();
    assert_eq!(app.filter.category, CategoryFilter::All);
    assert_eq!(app.filtered_contacts().len(), 2);
  }

  #[tokio::test]
  async fn cursor_stays_within_filtered_rows() {
    let mut app = app();
    for _ in 0..5 {
      app.handle_key(press('j')).await.unwrap();
    }
    assert_eq!(app.list_cursor, 2);
    app.handle_key(press('c')).await.unwrap();
    assert_eq!(app.list_cursor, 0);
  }

  #[tokio::test]
  async fn form_opens_prefilled_and_escape_closes_it() {
    let mut app = app();
    app.handle_key(press('j')).await.unwrap();
    app.handle_key(press('e')).await.unwrap();
    assert_eq!(app.screen, Screen::Form);
    assert_eq!(app.draft.as_ref().unwrap().first_name, "Bob");

    app.handle_key(press('!')).await.unwrap();
    assert_eq!(app.draft.as_ref().unwrap().first_name, "Bob!");

    app.handle_key(KeyEvent::from(KeyCode::Esc)).await.unwrap();
    assert_eq!(app.screen, Screen::ContactList);
    assert!(app.draft.is_none());
  }

  #[tokio::test]
  async fn delete_can_be_cancelled() {
    let mut app = app();
    app.handle_key(press('d')).await.unwrap();
    assert_eq!(app.screen, Screen::ConfirmDelete);
    assert_eq!(app.delete_target.as_ref().unwrap().first_name, "Ann");

    app.handle_key(press('n')).await.unwrap();
    assert_eq!(app.screen, Screen::ContactList);
    assert!(app.delete_target.is_none());
    assert_eq!(app.contacts.len(), 3);
  }

  #[tokio::test]
  async fn submitting_form_ignores_input() {
    let mut app = app();
    app.handle_key(press('n')).await.unwrap();
    app.submitting = true;
    app.handle_key(press('Z')).await.unwrap();
    assert_eq!(app.draft.as_ref().unwrap().first_name, "");
  }

  #[tokio::test]
  async fn failed_save_keeps_the_form_open() {
    let mut app = app();
    app.handle_key(press('n')).await.unwrap();
    app.pending = Some(Pending::Save {
      editing:    None,
      submission: Submission {
        fields: vec![("firstName", "Dee".into())],
        image:  None,
      },
    });
    app.confirm_submit = true;

    app.handle_key(press('y')).await.unwrap();
    assert!(app.submitting);
    app.run_pending().await;

    assert_eq!(app.screen, Screen::Form);
    assert!(app.draft.is_some());
    assert!(!app.submitting);
    assert!(!app.has_pending());
    assert!(app.status_msg.starts_with("Error"), "{}", app.status_msg);
    assert_eq!(app.contacts.len(), 3);
  }

  #[tokio::test]
  async fn failed_delete_keeps_contacts_and_detail() {
    let mut app = app();
    let before: Vec<Uuid> = app.contacts.iter().map(|c| c.id).collect();
    app.detail = Some(app.contacts[1].clone());
    app.screen = Screen::ContactDetail;

    app.handle_key(press('d')).await.unwrap();
    app.handle_key(press('y')).await.unwrap();

    assert_eq!(app.screen, Screen::ContactDetail);
    assert_eq!(app.detail.as_ref().unwrap().first_name, "Bob");
    assert!(app.delete_target.is_none());
    assert!(app.status_msg.starts_with("Error"), "{}", app.status_msg);
    let after: Vec<Uuid> = app.contacts.iter().map(|c| c.id).collect();
    assert_eq!(after, before);
  }

  #[test]
  fn export_writes_filtered_rows() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app();
    app.export_path = dir.path().join("out.pdf");
    app.filter.category = CategoryFilter::Only(Category::Work);

    app.export();

    assert!(app.status_msg.starts_with("Exported 1 contacts"));
    assert!(std::fs::read(&app.export_path).unwrap().starts_with(b"%PDF"));
  }
}
