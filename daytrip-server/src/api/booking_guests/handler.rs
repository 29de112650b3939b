//! Booking Guest API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::{BookingGuest, BookingGuestCreate, BookingGuestUpdate, GuestDeleted};

/// GET /api/bookingguests/by-booking/{booking_id}
pub async fn list_by_booking(
    State(state): State<ServerState>,
    Path(booking_id): Path<i64>,
) -> AppResult<Json<Vec<BookingGuest>>> {
    let guests = state.bookings.guests(booking_id).await?;
    Ok(Json(guests))
}

/// POST /api/bookingguests/{booking_id} - array of guests
pub async fn add(
    State(state): State<ServerState>,
    Path(booking_id): Path<i64>,
    Json(payload): Json<Vec<BookingGuestCreate>>,
) -> AppResult<Json<Vec<BookingGuest>>> {
    let guests = state.bookings.add_guests(booking_id, payload).await?;
    Ok(Json(guests))
}

/// POST /api/bookingguests/{guest_id}/update
pub async fn update(
    State(state): State<ServerState>,
    Path(guest_id): Path<i64>,
    Json(payload): Json<BookingGuestUpdate>,
) -> AppResult<Json<BookingGuest>> {
    let guest = state.bookings.update_guest(guest_id, payload).await?;
    Ok(Json(guest))
}

/// POST /api/bookingguests/{guest_id}/delete
pub async fn delete(
    State(state): State<ServerState>,
    Path(guest_id): Path<i64>,
) -> AppResult<Json<GuestDeleted>> {
    let deleted = state.bookings.delete_guest(guest_id).await?;
    Ok(Json(deleted))
}
