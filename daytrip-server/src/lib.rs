//! Day-Trip Booking Server
//!
//! CRUD backend for day-trip booking pages: forms, packages, customer orders
//! with line items, calendar bookings and their guests.
//!
//! ```text
//! daytrip-server/src/
//! ├── core/        # config, state, server, errors
//! ├── api/         # HTTP routes and handlers
//! ├── bookings/    # capacity guard, pax recount, booking engine
//! ├── db/          # SQLite pool and repositories
//! ├── services/    # blob storage and uploads
//! └── utils/       # logging, money, dates, validation
//! ```

pub mod api;
pub mod bookings;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

pub use bookings::{BookingEngine, BookingError};
pub use core::{Config, Server, ServerState, build_router};
pub use utils::{AppError, AppResult, ErrorCode};

pub use utils::logger::init_logger;
