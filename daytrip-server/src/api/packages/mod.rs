//! Package API

mod handler;

use axum::{Router, routing::{get, post}};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/packages", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/form/{form_id}", get(handler::list_by_form))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/update", post(handler::update))
        .route("/{id}/delete", post(handler::delete))
}
