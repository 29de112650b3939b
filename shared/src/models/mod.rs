//! Data models
//!
//! Shared between the server and its API consumers.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes, timestamps are Unix milliseconds.

pub mod booking;
pub mod booking_guest;
pub mod form;
pub mod form_settings;
pub mod order;
pub mod order_package;
pub mod package;
pub mod status;

// Re-exports
pub use booking::*;
pub use booking_guest::*;
pub use form::*;
pub use form_settings::*;
pub use order::*;
pub use order_package::*;
pub use package::*;
pub use status::*;

use serde::{Deserialize, Serialize};

/// Result of a soft delete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftDeleted {
    pub message: String,
    pub id: i64,
}

impl SoftDeleted {
    pub fn new(resource: &str, id: i64) -> Self {
        Self {
            message: format!("{resource} soft-deleted"),
            id,
        }
    }
}
