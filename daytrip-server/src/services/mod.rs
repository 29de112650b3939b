//! Services
//!
//! - [`blob_store`] - file storage behind the [`BlobStore`] trait
//! - [`upload`] - multipart extraction and upload validation

pub mod blob_store;
pub mod upload;

pub use blob_store::{BlobError, BlobStore, LocalBlobStore};
pub use upload::UploadedFile;
