//! Shared types for the day-trip booking backend
//!
//! Domain models, error codes, the response envelope and id/time utilities
//! used by the server crate and its tests.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
