//! Input validation helpers
//!
//! Centralized text length limits and checks used by the CRUD handlers.
//! SQLite TEXT has no built-in length enforcement.

use shared::error::AppError;

/// Entity names and titles
pub const MAX_NAME_LEN: usize = 200;

/// Logo file names
pub const MAX_LOGO_NAME_LEN: usize = 255;

/// Notes, subtitles
pub const MAX_NOTE_LEN: usize = 500;

/// Long descriptions
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Phone numbers, reference numbers, tax ids
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// URLs
pub const MAX_URL_LEN: usize = 2048;

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        )));
    }
    Ok(())
}

/// Validate that an amount is finite and not negative.
pub fn validate_amount(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Aina", "full_name", 200).is_ok());
        assert!(validate_required_text("   ", "full_name", 200).is_err());
        assert!(validate_required_text(&"x".repeat(201), "full_name", 200).is_err());
    }

    #[test]
    fn test_optional_text_counts_chars() {
        assert!(validate_optional_text(&None, "notes", 5).is_ok());
        assert!(validate_optional_text(&Some("ééééé".into()), "notes", 5).is_ok());
        let err = validate_optional_text(&Some("abcdef".into()), "notes", 5).unwrap_err();
        assert!(err.message.contains("notes is too long"));
    }

    #[test]
    fn test_amount() {
        assert!(validate_amount(0.0, "price").is_ok());
        assert!(validate_amount(-0.01, "price").is_err());
        assert!(validate_amount(f64::NAN, "price").is_err());
    }
}
