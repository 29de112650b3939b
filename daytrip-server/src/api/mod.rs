//! API routes
//!
//! - [`health`] - health check
//! - [`forms`] - booking pages
//! - [`form_settings`] - per-form settings (upsert)
//! - [`packages`] - priced offerings on a form
//! - [`orders`] - customer orders, statistics and receipts
//! - [`order_packages`] - order line items
//! - [`bookings`] - calendar bookings and availability
//! - [`booking_guests`] - guests on a booking
//! - [`uploads`] - file uploads

pub mod booking_guests;
pub mod bookings;
pub mod form_settings;
pub mod forms;
pub mod health;
pub mod order_packages;
pub mod orders;
pub mod packages;
pub mod uploads;

use axum::Router;
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::Visibility;

/// Every route, without state or middleware
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(forms::router())
        .merge(form_settings::router())
        .merge(packages::router())
        .merge(orders::router())
        .merge(order_packages::router())
        .merge(bookings::router())
        .merge(booking_guests::router())
        .merge(uploads::router())
}

/// `?include_deleted=true` opt-in shared by listing endpoints
#[derive(Debug, Default, Deserialize)]
pub struct VisibilityQuery {
    #[serde(default)]
    pub include_deleted: bool,
}

impl VisibilityQuery {
    pub fn visibility(&self) -> Visibility {
        Visibility::from_include_deleted(self.include_deleted)
    }
}
