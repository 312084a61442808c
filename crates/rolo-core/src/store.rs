//! The `ContactStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `rolo-store-sqlite`).
//! The REST layer (`rolo-api`) depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::contact::{Contact, ContactPatch, NewContact};

/// Classification the API needs from a backend error.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The wire name (`"email"`, `"phoneNumber"`) of the unique field a write
  /// collided on, if that is why it failed.
  fn duplicate_field(&self) -> Option<&'static str>;
}

/// Abstraction over a contact store backend.
///
/// `email` and `phone_number` are unique across all contacts; a write that
/// would violate that fails and persists nothing.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ContactStore: Send + Sync {
  type Error: StoreError;

  /// Persist a new contact under a fresh id and return it.
  fn create(
    &self,
    input: NewContact,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  /// All contacts in the store's natural (insertion) order.
  fn list(&self) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  /// Retrieve a contact by id. Returns `None` if not found.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Merge `patch` over the stored contact and return the result.
  /// Returns `None` if not found.
  fn update(
    &self,
    id: Uuid,
    patch: ContactPatch,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Remove a contact. Returns `false` if there was nothing to remove.
  fn delete(&self, id: Uuid) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
