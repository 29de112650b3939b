//! Order Package API

mod handler;

use axum::{Router, routing::{get, post}};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orderpackages", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/by-order/{order_id}", get(handler::list_by_order))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/update", post(handler::update))
        .route("/{id}/delete", post(handler::delete))
}
