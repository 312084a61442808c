//! Async HTTP client wrapping the Rolo REST API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{
  Client, Response,
  multipart::{Form, Part},
};
use rolo_core::contact::Contact;
use serde::Deserialize;
use uuid::Uuid;

use crate::form::Submission;

/// Connection settings for the Rolo API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the Rolo JSON/multipart REST API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

/// Error body returned by the service.
#[derive(Deserialize)]
struct ErrorBody {
  message: String,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn base(&self) -> &str { self.config.base_url.trim_end_matches('/') }

  fn url(&self, path: &str) -> String { format!("{}/api{}", self.base(), path) }

  /// Absolute URL of a contact's stored image (`imageUrl` is relative to
  /// the server's `/public` mount).
  pub fn image_url(&self, image_url: &str) -> String {
    format!("{}/public{}", self.base(), image_url)
  }

  /// Turn a non-2xx response into an error carrying the service's message.
  async fn check(resp: Response, what: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let message = resp
      .json::<ErrorBody>()
      .await
      .map(|b| b.message)
      .unwrap_or_else(|_| status.canonical_reason().unwrap_or("error").to_string());
    Err(anyhow!("{what} → {status}: {message}"))
  }

  async fn form(submission: &Submission) -> Result<Form> {
    let mut form = Form::new();
    for (name, value) in &submission.fields {
      form = form.text(*name, value.clone());
    }
    if let Some(path) = &submission.image {
      let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading image {}", path.display()))?;
      let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
      form = form.part("image", Part::bytes(bytes).file_name(file_name));
    }
    Ok(form)
  }

  // ── Contacts ──────────────────────────────────────────────────────────────

  /// `GET /api/contacts`
  pub async fn list_contacts(&self) -> Result<Vec<Contact>> {
    let resp = self
      .client
      .get(self.url("/contacts"))
      .send()
      .await
      .context("GET /contacts failed")?;
    let resp = Self::check(resp, "GET /contacts").await?;
    resp.json().await.context("deserialising contacts")
  }

  /// `GET /api/contacts/{id}`
  pub async fn get_contact(&self, id: Uuid) -> Result<Contact> {
    let path = format!("/contacts/{id}");
    let resp = self
      .client
      .get(self.url(&path))
      .send()
      .await
      .with_context(|| format!("GET {path} failed"))?;
    let resp = Self::check(resp, &format!("GET {path}")).await?;
    resp.json().await.context("deserialising contact")
  }

  /// `POST /api/contacts`
  pub async fn create_contact(&self, submission: &Submission) -> Result<Contact> {
    let resp = self
      .client
      .post(self.url("/contacts"))
      .multipart(Self::form(submission).await?)
      .send()
      .await
      .context("POST /contacts failed")?;
    let resp = Self::check(resp, "POST /contacts").await?;
    resp.json().await.context("deserialising created contact")
  }

  /// `PUT /api/contacts/{id}`
  pub async fn update_contact(&self, id: Uuid, submission: &Submission) -> Result<Contact> {
    let path = format!("/contacts/{id}");
    let resp = self
      .client
      .put(self.url(&path))
      .multipart(Self::form(submission).await?)
      .send()
      .await
      .with_context(|| format!("PUT {path} failed"))?;
    let resp = Self::check(resp, &format!("PUT {path}")).await?;
    resp.json().await.context("deserialising updated contact")
  }

  /// `DELETE /api/contacts/{id}`
  pub async fn delete_contact(&self, id: Uuid) -> Result<()> {
    let path = format!("/contacts/{id}");
    let resp = self
      .client
      .delete(self.url(&path))
      .send()
      .await
      .with_context(|| format!("DELETE {path} failed"))?;
    Self::check(resp, &format!("DELETE {path}")).await?;
    Ok(())
  }
}
