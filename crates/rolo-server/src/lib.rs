//! HTTP front for Rolo.
//!
//! Mounts the contact API under `/api`, serves uploaded images from
//! `/public/uploads`, and wraps everything in CORS and request tracing.

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use rolo_api::{UploadDir, upload::DEFAULT_MAX_UPLOAD_BYTES};
use rolo_core::store::ContactStore;
use serde::Deserialize;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROLO_*` environment variables. Every key is optional.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  /// SQLite database path. `~` is expanded; `:memory:` is allowed.
  pub database_url:     PathBuf,
  pub upload_dir:       PathBuf,
  pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             "0.0.0.0".to_string(),
      port:             5001,
      database_url:     PathBuf::from("contacts.db"),
      upload_dir:       PathBuf::from("public/uploads"),
      max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Path the upload directory is served under. A contact's image lives at
/// this prefix's parent (`/public`) joined with its `imageUrl`.
pub const PUBLIC_UPLOADS: &str = "/public/uploads";

/// Build the full application router.
pub fn router<S>(store: Arc<S>, uploads: Arc<UploadDir>) -> Router
where
  S: ContactStore + 'static,
{
  let images = ServeDir::new(uploads.path());

  Router::new()
    .nest("/api", rolo_api::api_router(store, uploads))
    .nest_service(PUBLIC_UPLOADS, images)
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
  };
  use rolo_store_sqlite::SqliteStore;
  use serde_json::Value;
  use tower::ServiceExt as _;

  const BOUNDARY: &str = "XyZ";

  struct Fixture {
    app:  Router,
    _tmp: tempfile::TempDir,
  }

  async fn fixture() -> Fixture {
    let tmp = tempfile::tempdir().unwrap();
    let store = SqliteStore::open_in_memory().await.unwrap();
    let uploads = UploadDir::create(tmp.path().join("public/uploads"), 1024).unwrap();
    Fixture {
      app:  router(Arc::new(store), Arc::new(uploads)),
      _tmp: tmp,
    }
  }

  fn create_request(with_image: bool) -> Request<Body> {
    let mut body = String::new();
    for (name, value) in [
      ("firstName", "Ann"),
      ("lastName", "Lee"),
      ("email", "ann@example.com"),
      ("phoneNumber", "555-0001"),
      ("category", "Friends"),
    ] {
      body.push_str(&format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
      ));
    }
    if with_image {
      body.push_str(&format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; \
         filename=\"ann.png\"\r\nContent-Type: image/png\r\n\r\nnot-really-a-png\r\n"
      ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    Request::post("/api/contacts")
      .header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
      )
      .body(Body::from(body))
      .unwrap()
  }

  async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap()
      .to_vec()
  }

  #[test]
  fn config_defaults() {
    let cfg = ServerConfig::default();
    assert_eq!(cfg.address(), "0.0.0.0:5001");
    assert_eq!(cfg.max_upload_bytes, 10 * 1024 * 1024);
    assert_eq!(cfg.upload_dir, PathBuf::from("public/uploads"));
  }

  #[test]
  fn partial_config_file_keeps_other_defaults() {
    let cfg: ServerConfig = config::Config::builder()
      .add_source(config::File::from_str(
        "port = 8080\ndatabase_url = \":memory:\"",
        config::FileFormat::Toml,
      ))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();

    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.database_url, PathBuf::from(":memory:"));
    assert_eq!(cfg.host, "0.0.0.0");
  }

  #[tokio::test]
  async fn api_is_mounted_under_api_prefix() {
    let f = fixture().await;
    let resp = f
      .app
      .clone()
      .oneshot(Request::get("/api/contacts").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await, b"[]");

    let resp = f
      .app
      .oneshot(Request::get("/contacts").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn uploaded_image_is_served_at_public_plus_image_url() {
    let f = fixture().await;

    let resp = f.app.clone().oneshot(create_request(true)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let contact: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    let image_url = contact["imageUrl"].as_str().unwrap();

    let resp = f
      .app
      .oneshot(
        Request::get(format!("/public{image_url}"))
          .body(Body::empty())
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await, b"not-really-a-png");
  }

  #[tokio::test]
  async fn missing_upload_is_404() {
    let f = fixture().await;
    let resp = f
      .app
      .oneshot(
        Request::get("/public/uploads/0.png")
          .body(Body::empty())
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn cors_preflight_is_answered() {
    let f = fixture().await;
    let resp = f
      .app
      .oneshot(
        Request::builder()
          .method(Method::OPTIONS)
          .uri("/api/contacts")
          .header(header::ORIGIN, "http://localhost:3000")
          .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
          .body(Body::empty())
          .unwrap(),
      )
      .await
      .unwrap();
    assert!(resp.status().is_success());
    assert!(
      resp
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
  }
}
