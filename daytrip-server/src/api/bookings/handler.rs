//! Booking API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::Visibility;
use crate::utils::{AppError, AppResult};
use shared::models::{
    Availability, Booking, BookingCreate, BookingStatusUpdate, BookingUpdate, SoftDeleted,
    StatusChanged,
};

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    pub date: Option<String>,
    pub order_id: Option<i64>,
    #[serde(default)]
    pub include_deleted: bool,
}

/// GET /api/bookings/availability?date=YYYY-MM-DD
pub async fn availability(
    State(state): State<ServerState>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<Availability>> {
    let date = query
        .date
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| AppError::validation("date is required"))?;
    let availability = state.bookings.availability(&date).await?;
    Ok(Json(availability))
}

/// GET /api/bookings
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<BookingListQuery>,
) -> AppResult<Json<Vec<Booking>>> {
    let visibility = Visibility::from_include_deleted(query.include_deleted);
    let bookings = state
        .bookings
        .list(query.date.as_deref(), query.order_id, visibility)
        .await?;
    Ok(Json(bookings))
}

/// GET /api/bookings/{id}
pub async fn get_by_id(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<Booking>> {
    let booking = state.bookings.get(id, Visibility::Active).await?;
    Ok(Json(booking))
}

/// POST /api/bookings
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<BookingCreate>,
) -> AppResult<Json<Booking>> {
    let booking = state.bookings.create(payload).await?;
    Ok(Json(booking))
}

/// POST /api/bookings/{id}/update
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<BookingUpdate>,
) -> AppResult<Json<Booking>> {
    let booking = state.bookings.update(id, payload).await?;
    Ok(Json(booking))
}

/// PATCH /api/bookings/{id}/status
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<BookingStatusUpdate>,
) -> AppResult<Json<StatusChanged>> {
    let changed = state.bookings.update_status(id, payload.status).await?;
    Ok(Json(changed))
}

/// POST /api/bookings/{id}/delete, DELETE /api/bookings/{id}
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<SoftDeleted>> {
    let deleted = state.bookings.delete(id).await?;
    Ok(Json(deleted))
}
