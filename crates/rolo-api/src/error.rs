//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::multipart::{MultipartError, MultipartRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use rolo_core::store::StoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Missing or invalid field, duplicate unique field, oversized upload.
  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  NotFound(String),

  /// Malformed identifiers and filesystem failures.
  #[error("{0}")]
  Internal(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a backend error: uniqueness violations are the caller's fault,
  /// everything else is ours.
  pub fn store<E: StoreError>(e: E) -> Self {
    match e.duplicate_field() {
      Some(field) => Self::Validation(format!("a contact with this {field} already exists")),
      None => Self::Store(Box::new(e)),
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Internal(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<rolo_core::Error> for ApiError {
  fn from(e: rolo_core::Error) -> Self { Self::Validation(e.to_string()) }
}

impl From<MultipartError> for ApiError {
  fn from(e: MultipartError) -> Self { Self::Validation(e.body_text()) }
}

impl From<MultipartRejection> for ApiError {
  fn from(e: MultipartRejection) -> Self { Self::Validation(e.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    } else {
      tracing::debug!(error = %self, %status, "request rejected");
    }
    (status, Json(json!({ "message": self.to_string() }))).into_response()
  }
}
