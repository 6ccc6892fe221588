//! Upload validation and handoff to object storage
//!
//! Type is checked before size, size before emptiness, and all of them before
//! any byte reaches the store.

use std::sync::Arc;

use shared::error::{AppError, ErrorCode};

use super::ObjectStore;

/// Accepted extensions, compared case-insensitively
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png"];

/// 100 KiB
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

fn extension(filename: &str) -> Option<&str> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UploadValidator;

impl UploadValidator {
    /// Whether the last `.` suffix of `filename` is on the allow-list
    pub fn validate_type(&self, filename: &str) -> bool {
        extension(filename).is_some_and(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
    }

    pub fn validate_size(&self, size: usize) -> bool {
        size <= MAX_UPLOAD_BYTES
    }

    /// MIME type for storage metadata; not a security control
    pub fn resolve_content_type(&self, filename: &str) -> String {
        mime_guess::from_path(filename)
            .first_raw()
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string()
    }

    /// Type first, then size
    pub fn check(&self, filename: &str, size: usize) -> Result<(), AppError> {
        if !self.validate_type(filename) {
            return Err(AppError::new(ErrorCode::UnsupportedFileFormat)
                .with_detail("filename", filename)
                .with_detail("allowed", ALLOWED_EXTENSIONS.join(", ")));
        }
        if !self.validate_size(size) {
            return Err(AppError::with_message(
                ErrorCode::FileTooLarge,
                format!("File too large: {size} bytes (max {MAX_UPLOAD_BYTES})"),
            ));
        }
        Ok(())
    }
}

/// Final path component of a client-supplied filename
fn base_name(filename: &str) -> &str {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
}

#[derive(Clone)]
pub struct UploadService {
    validator: UploadValidator,
    store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl UploadService {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            validator: UploadValidator,
            store,
            bucket: bucket.into(),
        }
    }

    /// Validate and store `bytes` under `<owner_email>/<filename>`; returns the object URI
    pub async fn upload(
        &self,
        owner_email: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<String, AppError> {
        let name = base_name(filename);
        if name.is_empty() {
            return Err(AppError::new(ErrorCode::NoFileProvided));
        }
        self.validator.check(name, bytes.len())?;
        if bytes.is_empty() {
            return Err(AppError::new(ErrorCode::EmptyFile));
        }

        let key = format!("{owner_email}/{name}");
        let content_type = self.validator.resolve_content_type(name);
        let size = bytes.len();

        self.store
            .put_object(&self.bucket, &key, bytes, &content_type)
            .await?;

        tracing::info!(key = %key, size, content_type = %content_type, "File uploaded");
        Ok(format!("s3://{}/{key}", self.bucket))
    }
}
