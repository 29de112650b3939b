//! Booking engine errors

use shared::error::{AppError, ErrorCode};
use shared::models::BookingStatus;
use thiserror::Error;

use crate::db::repository::RepoError;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error(
        "Capacity exceeded for {booking_date}: {current_pax} of {max_capacity} pax taken, {requested_pax} requested"
    )]
    CapacityExceeded {
        booking_date: String,
        current_pax: i64,
        remaining_capacity: i64,
        max_capacity: i64,
        requested_pax: i64,
    },

    #[error("Cannot change status from {from} to {to}")]
    InvalidStatusTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("{0}")]
    Validation(String),
}

impl From<sqlx::Error> for BookingError {
    fn from(err: sqlx::Error) -> Self {
        BookingError::Repo(err.into())
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        let message = err.to_string();
        match err {
            BookingError::Repo(e) => e.into(),
            BookingError::CapacityExceeded {
                booking_date,
                current_pax,
                remaining_capacity,
                max_capacity,
                requested_pax,
            } => AppError::with_message(ErrorCode::CapacityExceeded, message)
                .with_detail("booking_date", booking_date)
                .with_detail("current_pax", current_pax)
                .with_detail("remaining_capacity", remaining_capacity)
                .with_detail("max_capacity", max_capacity)
                .with_detail("requested_pax", requested_pax),
            BookingError::InvalidStatusTransition { from, to } => {
                AppError::with_message(ErrorCode::InvalidStatusTransition, message)
                    .with_detail("from", from.as_str())
                    .with_detail("to", to.as_str())
            }
            BookingError::InvalidDate(_) => {
                AppError::with_message(ErrorCode::InvalidBookingDate, message)
            }
            BookingError::Validation(msg) => AppError::validation(msg),
        }
    }
}

pub type BookingResult<T> = Result<T, BookingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_exceeded_carries_numbers() {
        let err: AppError = BookingError::CapacityExceeded {
            booking_date: "2024-06-01".into(),
            current_pax: 2,
            remaining_capacity: 1,
            max_capacity: 3,
            requested_pax: 2,
        }
        .into();
        assert_eq!(err.code, ErrorCode::CapacityExceeded);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
        let details = err.details.unwrap();
        assert_eq!(details["current_pax"], 2);
        assert_eq!(details["remaining_capacity"], 1);
        assert_eq!(details["max_capacity"], 3);
        assert_eq!(details["requested_pax"], 2);
    }

    #[test]
    fn test_transition_maps_to_conflict() {
        let err: AppError = BookingError::InvalidStatusTransition {
            from: BookingStatus::Completed,
            to: BookingStatus::Pending,
        }
        .into();
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);
        assert_eq!(err.message, "Cannot change status from completed to pending");
    }
}
