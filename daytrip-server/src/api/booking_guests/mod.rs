//! Booking Guest API
//!
//! `POST /{id}` takes a booking id; `/{id}/update` and `/{id}/delete` take a
//! guest id.

mod handler;

use axum::{Router, routing::{get, post}};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/bookingguests", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/by-booking/{booking_id}", get(handler::list_by_booking))
        .route("/{id}", post(handler::add))
        .route("/{id}/update", post(handler::update))
        .route("/{id}/delete", post(handler::delete))
}
