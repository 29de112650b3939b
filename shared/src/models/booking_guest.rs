//! Booking Guest Model

use serde::{Deserialize, Serialize};

use super::GuestType;

pub const FULL_NAME_MAX_LEN: usize = 200;
pub const IC_NUMBER_MAX_LEN: usize = 20;
pub const MOBILE_PHONE_MAX_LEN: usize = 50;
pub const GUEST_NOTES_MAX_LEN: usize = 500;

/// Booking guest entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BookingGuest {
    pub id: i64,
    pub booking_id: i64,
    pub full_name: String,
    pub ic_number: String,
    pub mobile_phone: Option<String>,
    pub guest_type: GuestType,
    pub notes: Option<String>,
    pub is_deleted: bool,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

/// Add guest payload (sent as an array)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingGuestCreate {
    pub full_name: String,
    pub ic_number: String,
    pub mobile_phone: Option<String>,
    pub guest_type: Option<GuestType>,
    pub notes: Option<String>,
}

/// Update guest payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingGuestUpdate {
    pub full_name: Option<String>,
    pub ic_number: Option<String>,
    pub mobile_phone: Option<String>,
    pub guest_type: Option<GuestType>,
    pub notes: Option<String>,
}

/// Guest delete result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestDeleted {
    pub message: String,
    pub guest_id: i64,
    pub booking_id: i64,
}
