//! Unified error codes for the day-trip backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 5xxx: Booking errors
//! - 6xxx: Package errors
//! - 7xxx: Form errors
//! - 8xxx: Upload errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Referenced entity does not exist (or is soft-deleted)
    InvalidReference = 9,
    /// Path id and body id disagree
    IdMismatch = 10,
    /// Status change is not a legal transition
    InvalidStatusTransition = 11,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order package (line item) not found
    OrderPackageNotFound = 4002,
    /// Order has no payment receipt
    ReceiptNotFound = 4003,

    // ==================== 5xxx: Booking ====================
    /// Booking not found
    BookingNotFound = 5001,
    /// Booking guest not found
    GuestNotFound = 5002,
    /// Daily pax capacity would be exceeded
    CapacityExceeded = 5003,
    /// Booking date could not be parsed
    InvalidBookingDate = 5004,

    // ==================== 6xxx: Package ====================
    /// Package not found
    PackageNotFound = 6001,

    // ==================== 7xxx: Form ====================
    /// Form not found
    FormNotFound = 7001,
    /// Form settings not found
    FormSettingsNotFound = 7002,

    // ==================== 8xxx: Upload ====================
    /// No file provided in the multipart body
    NoFileProvided = 8001,
    /// File is empty
    EmptyFile = 8002,
    /// File extension is not in the allow-list
    InvalidFileExtension = 8003,
    /// File exceeds the upload size limit
    FileTooLarge = 8004,
    /// Writing to blob storage failed
    FileStorageFailed = 8005,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::InvalidReference => "Referenced resource does not exist",
            ErrorCode::IdMismatch => "ID mismatch",
            ErrorCode::InvalidStatusTransition => "Status transition is not allowed",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderPackageNotFound => "Order package not found",
            ErrorCode::ReceiptNotFound => "No receipt found for this order",

            // Booking
            ErrorCode::BookingNotFound => "Booking not found",
            ErrorCode::GuestNotFound => "Guest not found",
            ErrorCode::CapacityExceeded => "Booking exceeds the daily pax capacity",
            ErrorCode::InvalidBookingDate => "Invalid booking date",

            // Package
            ErrorCode::PackageNotFound => "Package not found",

            // Form
            ErrorCode::FormNotFound => "Form not found",
            ErrorCode::FormSettingsNotFound => "Form settings not found",

            // Upload
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "File is empty",
            ErrorCode::InvalidFileExtension => {
                "Invalid file type. Allowed: jpg, jpeg, png, gif, pdf"
            }
            ErrorCode::FileTooLarge => "File is too large",
            ErrorCode::FileStorageFailed => "Error storing file",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            9 => Ok(ErrorCode::InvalidReference),
            10 => Ok(ErrorCode::IdMismatch),
            11 => Ok(ErrorCode::InvalidStatusTransition),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderPackageNotFound),
            4003 => Ok(ErrorCode::ReceiptNotFound),

            // Booking
            5001 => Ok(ErrorCode::BookingNotFound),
            5002 => Ok(ErrorCode::GuestNotFound),
            5003 => Ok(ErrorCode::CapacityExceeded),
            5004 => Ok(ErrorCode::InvalidBookingDate),

            // Package
            6001 => Ok(ErrorCode::PackageNotFound),

            // Form
            7001 => Ok(ErrorCode::FormNotFound),
            7002 => Ok(ErrorCode::FormSettingsNotFound),

            // Upload
            8001 => Ok(ErrorCode::NoFileProvided),
            8002 => Ok(ErrorCode::EmptyFile),
            8003 => Ok(ErrorCode::InvalidFileExtension),
            8004 => Ok(ErrorCode::FileTooLarge),
            8005 => Ok(ErrorCode::FileStorageFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::InvalidReference.code(), 9);
        assert_eq!(ErrorCode::IdMismatch.code(), 10);
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::BookingNotFound.code(), 5001);
        assert_eq!(ErrorCode::CapacityExceeded.code(), 5003);
        assert_eq!(ErrorCode::PackageNotFound.code(), 6001);
        assert_eq!(ErrorCode::FormNotFound.code(), 7001);
        assert_eq!(ErrorCode::InvalidFileExtension.code(), 8003);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::NotFound.is_success());
        assert!(!ErrorCode::CapacityExceeded.is_success());
    }

    #[test]
    fn test_try_from_known_codes() {
        for code in [
            ErrorCode::Success,
            ErrorCode::IdMismatch,
            ErrorCode::ReceiptNotFound,
            ErrorCode::GuestNotFound,
            ErrorCode::FormSettingsNotFound,
            ErrorCode::FileStorageFailed,
            ErrorCode::ConfigError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_unknown_code() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::CapacityExceeded).unwrap();
        assert_eq!(json, "5003");
        let code: ErrorCode = serde_json::from_str("5001").unwrap();
        assert_eq!(code, ErrorCode::BookingNotFound);
        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }
}
