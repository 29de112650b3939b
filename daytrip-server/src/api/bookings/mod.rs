//! Booking API
//!
//! Writes go through [`BookingEngine`](crate::bookings::BookingEngine) so
//! capacity checks and pax recounts happen under the engine's locks.

mod handler;

use axum::{Router, routing::{get, patch, post}};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/bookings", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/availability", get(handler::availability))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route("/{id}/update", post(handler::update))
        .route("/{id}/status", patch(handler::update_status))
        .route("/{id}/delete", post(handler::delete))
}
