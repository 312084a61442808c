//! [`SqliteStore`]: the SQLite implementation of [`ContactStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use rolo_core::{
  contact::{Contact, ContactPatch, NewContact},
  store::ContactStore,
};

use crate::{
  Error, Result,
  encode::{RawContact, encode_patch, encode_uuid},
  schema::{CONTACT_COLUMNS, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Rolo contact store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted. All
/// statements run on one connection thread, so each call below is serialised
/// against every other.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store: useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ContactStore impl ───────────────────────────────────────────────────────

impl ContactStore for SqliteStore {
  type Error = Error;

  async fn create(&self, input: NewContact) -> Result<Contact> {
    let raw = RawContact::from_new(Uuid::new_v4(), input);

    let raw = self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO contacts ({CONTACT_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
          ),
          rusqlite::params![
            raw.contact_id,
            raw.first_name,
            raw.last_name,
            raw.email,
            raw.phone_number,
            raw.birthday,
            raw.address,
            raw.notes,
            raw.gender,
            raw.category,
            raw.image_url,
          ],
        )?;
        Ok(raw)
      })
      .await?;

    let contact = raw.into_contact()?;
    tracing::debug!(id = %contact.id, "contact inserted");
    Ok(contact)
  }

  async fn list(&self) -> Result<Vec<Contact>> {
    let raws: Vec<RawContact> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY rowid"
        ))?;
        let rows = stmt
          .query_map([], RawContact::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawContact::into_contact).collect()
  }

  async fn get(&self, id: Uuid) -> Result<Option<Contact>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawContact> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE contact_id = ?1"),
              rusqlite::params![id_str],
              RawContact::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawContact::into_contact).transpose()
  }

  async fn update(&self, id: Uuid, patch: ContactPatch) -> Result<Option<Contact>> {
    if patch.is_empty() {
      return self.get(id).await;
    }

    let id_str = encode_uuid(id);
    let sets = encode_patch(patch);

    // Merge and read-back happen in one call, so no other write can land
    // between them.
    let raw: Option<RawContact> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let assignments = sets
          .iter()
          .enumerate()
          .map(|(i, (column, _))| format!("{column} = ?{}", i + 2))
          .collect::<Vec<_>>()
          .join(", ");

        let mut values: Vec<Option<String>> = vec![Some(id_str.clone())];
        values.extend(sets.into_iter().map(|(_, v)| v));

        tx.execute(
          &format!("UPDATE contacts SET {assignments} WHERE contact_id = ?1"),
          rusqlite::params_from_iter(values),
        )?;

        let raw = tx
          .query_row(
            &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE contact_id = ?1"),
            rusqlite::params![id_str],
            RawContact::from_row,
          )
          .optional()?;

        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawContact::into_contact).transpose()
  }

  async fn delete(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let removed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM contacts WHERE contact_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(n)
      })
      .await?;

    Ok(removed > 0)
  }
}
