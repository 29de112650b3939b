//! Order API
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/orders | GET, POST | list, create with line items |
//! | /api/orders/statistics | GET | counts and money totals |
//! | /api/orders/form/{form_id} | GET | orders of one form |
//! | /api/orders/{id} | GET, PUT, DELETE | detail, update, soft-delete |
//! | /api/orders/{id}/status | PATCH | status change |
//! | /api/orders/{id}/delete | POST | soft-delete |
//! | /api/orders/{id}/receipt | POST, DELETE | payment receipt upload and removal |

mod handler;

use axum::{Router, routing::{get, patch, post}};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/statistics", get(handler::statistics))
        .route("/form/{form_id}", get(handler::list_by_form))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/status", patch(handler::update_status))
        .route("/{id}/delete", post(handler::delete))
        .route(
            "/{id}/receipt",
            post(handler::upload_receipt).delete(handler::delete_receipt),
        )
}
