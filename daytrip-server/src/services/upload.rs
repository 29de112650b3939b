//! Upload handling shared by the upload and receipt endpoints

use std::path::Path;

use axum::extract::Multipart;
use shared::error::{AppError, AppResult, ErrorCode};

use super::blob_store::BlobStore;

/// Directory (blob key prefix) for payment receipts
pub const RECEIPT_DIR: &str = "Image/Receipt";

/// Accepted file extensions (lowercase, without dot)
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "pdf"];

/// A file taken from a multipart body
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Vec<u8>,
}

impl UploadedFile {
    /// Lowercase extension if it is on the allow-list
    pub fn extension(&self) -> AppResult<String> {
        let ext = Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(AppError::with_message(
                ErrorCode::InvalidFileExtension,
                format!(
                    "Unsupported file type '{}'. Allowed: {}",
                    self.file_name,
                    ALLOWED_EXTENSIONS.join(", ")
                ),
            ));
        }
        Ok(ext)
    }

    /// Check size and extension. Returns the extension.
    pub fn validate(&self, max_bytes: usize) -> AppResult<String> {
        if self.data.is_empty() {
            return Err(AppError::new(ErrorCode::EmptyFile));
        }
        if self.data.len() > max_bytes {
            return Err(AppError::with_message(
                ErrorCode::FileTooLarge,
                format!(
                    "File too large ({} bytes, max {max_bytes})",
                    self.data.len()
                ),
            ));
        }
        self.extension()
    }
}

/// Pull the `file` field out of a multipart body
pub async fn read_file_field(multipart: &mut Multipart) -> AppResult<UploadedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::invalid_request(format!("Invalid multipart request: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::invalid_request(format!("Multipart error: {e}")))?
            .to_vec();
        return Ok(UploadedFile { file_name, data });
    }
    Err(AppError::new(ErrorCode::NoFileProvided))
}

/// Validate and store a file under [`RECEIPT_DIR`] as `<stem>.<ext>`.
/// Returns the public URL.
pub async fn store_file(
    store: &dyn BlobStore,
    file: &UploadedFile,
    stem: &str,
    max_bytes: usize,
) -> AppResult<String> {
    let ext = file.validate(max_bytes)?;
    let key = format!("{RECEIPT_DIR}/{stem}.{ext}");
    let url = store.put(&key, &file.data).await?;
    tracing::info!(key = %key, size = file.data.len(), "File uploaded");
    Ok(url)
}
