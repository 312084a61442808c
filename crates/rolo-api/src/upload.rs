//! Image uploads: reading a multipart contact form and persisting its image.
//!
//! Files land in a server-controlled directory under a generated name: a
//! millisecond timestamp, bumped past the last name issued so two uploads in
//! the same millisecond still get distinct files. The original extension is
//! kept. Nothing here ever deletes a file.

use std::{
  ffi::OsStr,
  io,
  path::{Path, PathBuf},
  sync::atomic::{AtomicI64, Ordering},
};

use axum::extract::Multipart;
use bytes::Bytes;
use chrono::Utc;
use rolo_core::fields::ContactFields;
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

use crate::error::ApiError;

/// Public path prefix recorded in `imageUrl`.
pub const URL_PREFIX: &str = "/uploads";

/// Multipart field name carrying the image file.
pub const IMAGE_FIELD: &str = "image";

/// Default ceiling for a single uploaded image.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

// ─── UploadDir ───────────────────────────────────────────────────────────────

/// The directory uploaded images are written to.
#[derive(Debug)]
pub struct UploadDir {
  dir:        PathBuf,
  max_bytes:  usize,
  last_stamp: AtomicI64,
}

impl UploadDir {
  /// Use `dir` for uploads, creating it if absent.
  pub fn create(dir: impl Into<PathBuf>, max_bytes: usize) -> io::Result<Self> {
    let dir = dir.into();
    std::fs::create_dir_all(&dir)?;
    Ok(Self {
      dir,
      max_bytes,
      last_stamp: AtomicI64::new(0),
    })
  }

  pub fn path(&self) -> &Path { &self.dir }

  pub fn max_bytes(&self) -> usize { self.max_bytes }

  /// A millisecond timestamp strictly greater than any previously returned.
  fn next_stamp(&self) -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut last = self.last_stamp.load(Ordering::Relaxed);
    loop {
      let next = now.max(last + 1);
      match self.last_stamp.compare_exchange_weak(
        last,
        next,
        Ordering::AcqRel,
        Ordering::Relaxed,
      ) {
        Ok(_) => return next,
        Err(actual) => last = actual,
      }
    }
  }

  /// Generate a fresh file name, keeping the extension of `original`.
  pub fn next_file_name(&self, original: Option<&str>) -> String {
    let stamp = self.next_stamp();
    match original.and_then(extension) {
      Some(ext) => format!("{stamp}.{ext}"),
      None => stamp.to_string(),
    }
  }

  /// Write `image` to disk and return its public path (`/uploads/<name>`).
  ///
  /// Existing files are never overwritten: a name already on disk (left by
  /// an earlier run whose clock was ahead) is skipped for the next stamp.
  pub async fn save(&self, image: &UploadedImage) -> io::Result<String> {
    loop {
      let name = self.next_file_name(image.file_name.as_deref());
      let path = self.dir.join(&name);
      let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await
      {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
          tracing::warn!(path = %path.display(), "upload name taken, retrying");
          continue;
        }
        Err(e) => return Err(e),
      };
      file.write_all(&image.bytes).await?;
      file.flush().await?;
      tracing::info!(path = %path.display(), bytes = image.bytes.len(), "image stored");
      return Ok(format!("{URL_PREFIX}/{name}"));
    }
  }
}

/// The extension of a client-supplied file name, if it is plain
/// alphanumeric. Anything else is dropped rather than trusted.
fn extension(file_name: &str) -> Option<&str> {
  Path::new(file_name)
    .extension()
    .and_then(OsStr::to_str)
    .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
}

// ─── Form parsing ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct UploadedImage {
  /// Name as sent by the client; only its extension is used.
  pub file_name: Option<String>,
  pub bytes:     Bytes,
}

/// A parsed multipart contact submission.
#[derive(Debug, Default)]
pub struct ContactForm {
  pub fields: ContactFields,
  pub image:  Option<UploadedImage>,
}

impl ContactForm {
  /// Drain `multipart`, collecting text fields and at most one image.
  ///
  /// The image is streamed and rejected as soon as it grows past
  /// `max_bytes`. A file part with no content (what browsers send when no
  /// file was chosen) counts as no image.
  pub async fn read(mut multipart: Multipart, max_bytes: usize) -> Result<Self, ApiError> {
    let mut form = Self::default();

    while let Some(mut field) = multipart.next_field().await? {
      let name = field.name().unwrap_or_default().to_owned();

      if name == IMAGE_FIELD {
        let file_name = field.file_name().map(str::to_owned);
        let mut data = Vec::new();
        while let Some(chunk) = field.chunk().await? {
          if data.len() + chunk.len() > max_bytes {
            return Err(ApiError::Validation(format!(
              "image exceeds the {} MB upload limit",
              max_bytes / (1024 * 1024)
            )));
          }
          data.extend_from_slice(&chunk);
        }
        if !data.is_empty() {
          form.image = Some(UploadedImage {
            file_name,
            bytes: Bytes::from(data),
          });
        }
      } else {
        let value = field.text().await?;
        if !form.fields.set(&name, value) {
          tracing::debug!(field = %name, "ignoring unknown form field");
        }
      }
    }

    Ok(form)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn dir() -> (tempfile::TempDir, UploadDir) {
    let tmp = tempfile::tempdir().unwrap();
    let uploads = UploadDir::create(tmp.path().join("public/uploads"), 1024).unwrap();
    (tmp, uploads)
  }

  #[test]
  fn create_makes_missing_directories() {
    let (_tmp, uploads) = dir();
    assert!(uploads.path().is_dir());
  }

  #[test]
  fn file_names_are_distinct_and_increasing() {
    let (_tmp, uploads) = dir();
    let stamps: Vec<i64> = (0..50)
      .map(|_| uploads.next_file_name(None).parse().unwrap())
      .collect();
    assert!(stamps.windows(2).all(|w| w[0] < w[1]));
  }

  #[test]
  fn extension_is_kept_when_plain() {
    let (_tmp, uploads) = dir();
    assert!(uploads.next_file_name(Some("me.PNG")).ends_with(".PNG"));
    assert!(!uploads.next_file_name(Some("noext")).contains('.'));
    assert!(!uploads.next_file_name(Some("x.p/ng")).contains('/'));
    assert!(!uploads.next_file_name(Some("evil.ph p")).contains(' '));
  }

  #[tokio::test]
  async fn save_writes_bytes_and_returns_public_path() {
    let (_tmp, uploads) = dir();
    let image = UploadedImage {
      file_name: Some("face.jpg".into()),
      bytes:     Bytes::from_static(b"\xff\xd8\xff"),
    };

    let url = uploads.save(&image).await.unwrap();
    let name = url.strip_prefix("/uploads/").expect("public prefix");
    assert!(name.ends_with(".jpg"));

    let written = std::fs::read(uploads.path().join(name)).unwrap();
    assert_eq!(written, b"\xff\xd8\xff");
  }

  #[tokio::test]
  async fn save_skips_names_already_on_disk() {
    let (_tmp, uploads) = dir();
    // A file left behind by a run whose clock was ahead of ours.
    let taken = Utc::now().timestamp_millis() + 60_000;
    let existing = uploads.path().join(format!("{taken}.jpg"));
    std::fs::write(&existing, b"someone else").unwrap();
    uploads.last_stamp.store(taken - 1, Ordering::Relaxed);

    let image = UploadedImage {
      file_name: Some("face.jpg".into()),
      bytes:     Bytes::from_static(b"mine"),
    };
    let url = uploads.save(&image).await.unwrap();

    assert_eq!(url, format!("/uploads/{}.jpg", taken + 1));
    assert_eq!(std::fs::read(&existing).unwrap(), b"someone else");
    let written = std::fs::read(uploads.path().join(format!("{}.jpg", taken + 1))).unwrap();
    assert_eq!(written, b"mine");
  }
}
