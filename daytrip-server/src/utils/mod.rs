//! Utility module
//!
//! - [`logger`] - tracing subscriber setup
//! - [`money`] - decimal arithmetic for totals and fees
//! - [`time`] - calendar date normalization
//! - [`validation`] - text length checks for handlers

pub mod logger;
pub mod money;
pub mod time;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
