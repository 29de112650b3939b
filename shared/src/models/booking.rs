//! Booking Model (calendar reservations)

use serde::{Deserialize, Serialize};

use super::BookingStatus;

/// Booking entity
///
/// `pax_count` and `gratuity_fee` are derived: once guests exist they are
/// rewritten from the active guest count on every guest mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: i64,
    pub order_id: i64,
    /// Calendar date `YYYY-MM-DD`
    pub booking_date: String,
    pub pax_count: i64,
    pub status: BookingStatus,
    pub gratuity_fee: f64,
    pub is_first_booking: bool,
    pub is_deleted: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create booking payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreate {
    pub order_id: i64,
    /// Any ISO-8601 date or datetime; only the calendar date is kept
    pub booking_date: String,
    pub pax_count: i64,
    pub status: Option<BookingStatus>,
    pub is_first_booking: Option<bool>,
}

/// Update booking payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingUpdate {
    pub booking_date: Option<String>,
    pub status: Option<BookingStatus>,
    pub is_first_booking: Option<bool>,
}

/// Booking status change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingStatusUpdate {
    pub status: BookingStatus,
}

/// Status change result, shared by bookings and orders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChanged {
    pub id: i64,
    pub previous_status: BookingStatus,
    pub new_status: BookingStatus,
    pub updated_at: i64,
}

/// Remaining capacity on one calendar date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub booking_date: String,
    pub total_pax: i64,
    pub remaining_capacity: i64,
    pub max_capacity: i64,
}
