//! Form Settings API

mod handler;

use axum::{Router, routing::{get, post}};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/formsettings", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::upsert).put(handler::upsert))
        .route("/form/{form_id}", get(handler::get_by_form))
        .route("/{id}", axum::routing::delete(handler::delete))
        .route("/{id}/delete", post(handler::delete))
}
