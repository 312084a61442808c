//! Handlers for `/contacts` endpoints.
//!
//! | Method   | Path             | Notes |
//! |----------|------------------|-------|
//! | `GET`    | `/contacts`      | All contacts, store order |
//! | `POST`   | `/contacts`      | Multipart fields + optional `image`; returns 201 |
//! | `GET`    | `/contacts/{id}` | 404 if not found |
//! | `PUT`    | `/contacts/{id}` | Multipart; merges present fields |
//! | `DELETE` | `/contacts/{id}` | Returns a confirmation message |
//!
//! Writes run as a fixed pipeline: parse the form, validate the fields,
//! store the image (if any), then persist the record. An image written before
//! a failing record write is left on disk.

use axum::{
  Json,
  extract::{Multipart, Path, State, multipart::MultipartRejection},
  http::StatusCode,
  response::IntoResponse,
};
use rolo_core::{contact::Contact, store::ContactStore};
use serde_json::json;
use uuid::Uuid;

use crate::{ApiState, error::ApiError, upload::ContactForm};

/// Contact ids are UUIDs; anything else cannot name a stored record.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
  Uuid::parse_str(raw).map_err(|e| ApiError::Internal(format!("malformed contact id {raw:?}: {e}")))
}

fn not_found(id: Uuid) -> ApiError { ApiError::NotFound(format!("contact {id} not found")) }

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /contacts`
pub async fn list<S>(State(state): State<ApiState<S>>) -> Result<Json<Vec<Contact>>, ApiError>
where
  S: ContactStore,
{
  let contacts = state.store.list().await.map_err(ApiError::store)?;
  Ok(Json(contacts))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /contacts/{id}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore,
{
  let id = parse_id(&id)?;
  let contact = state
    .store
    .get(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(contact))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /contacts`: returns 201 + the stored [`Contact`].
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContactStore,
{
  let form = ContactForm::read(multipart?, state.uploads.max_bytes()).await?;
  let mut input = form.fields.into_new_contact()?;

  if let Some(image) = &form.image {
    input.image_url = Some(
      state
        .uploads
        .save(image)
        .await
        .map_err(|e| ApiError::Internal(format!("failed to store image: {e}")))?,
    );
  }

  let contact = state.store.create(input).await.map_err(|e| {
    tracing::warn!(error = %e, "contact create failed");
    ApiError::store(e)
  })?;

  tracing::info!(id = %contact.id, "contact created");
  Ok((StatusCode::CREATED, Json(contact)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /contacts/{id}`: fields absent from the form are left unchanged.
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
  multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore,
{
  let id = parse_id(&id)?;
  let form = ContactForm::read(multipart?, state.uploads.max_bytes()).await?;
  let mut patch = form.fields.into_patch()?;

  // The previous image (if any) is not removed.
  if let Some(image) = &form.image {
    patch.image_url = Some(
      state
        .uploads
        .save(image)
        .await
        .map_err(|e| ApiError::Internal(format!("failed to store image: {e}")))?,
    );
  }

  let contact = state
    .store
    .update(id, patch)
    .await
    .map_err(|e| {
      tracing::warn!(%id, error = %e, "contact update failed");
      ApiError::store(e)
    })?
    .ok_or_else(|| not_found(id))?;

  tracing::info!(%id, "contact updated");
  Ok(Json(contact))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /contacts/{id}`: the record goes; any uploaded image stays.
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContactStore,
{
  let id = parse_id(&id)?;
  if !state.store.delete(id).await.map_err(ApiError::store)? {
    return Err(not_found(id));
  }

  tracing::info!(%id, "contact deleted");
  Ok(Json(json!({ "message": "Contact deleted successfully" })))
}
