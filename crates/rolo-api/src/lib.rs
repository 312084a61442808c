//! JSON/multipart REST API for Rolo.
//!
//! Exposes an axum [`Router`] backed by any [`rolo_core::store::ContactStore`].
//! Static file serving, CORS and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", rolo_api::api_router(store.clone(), uploads.clone()))
//! ```

pub mod contacts;
pub mod error;
pub mod upload;

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, routing::get};
use rolo_core::store::ContactStore;

pub use error::ApiError;
pub use upload::UploadDir;

/// Room for the text fields and multipart framing on top of the image limit.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Shared state threaded through all API handlers.
pub struct ApiState<S> {
  pub store:   Arc<S>,
  pub uploads: Arc<UploadDir>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:   Arc::clone(&self.store),
      uploads: Arc::clone(&self.uploads),
    }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, uploads: Arc<UploadDir>) -> Router<()>
where
  S: ContactStore + 'static,
{
  let body_limit = uploads.max_bytes() + FORM_OVERHEAD_BYTES;

  Router::new()
    .route(
      "/contacts",
      get(contacts::list::<S>).post(contacts::create::<S>),
    )
    .route(
      "/contacts/{id}",
      get(contacts::get_one::<S>)
        .put(contacts::update::<S>)
        .delete(contacts::delete_one::<S>),
    )
    .layer(DefaultBodyLimit::max(body_limit))
    .with_state(ApiState { store, uploads })
}
