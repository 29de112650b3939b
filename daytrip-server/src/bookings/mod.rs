//! Booking consistency engine
//!
//! - **capacity**: daily confirmed-pax cap ([`CapacityGuard`])
//! - **aggregate**: pax count and gratuity derived from active guests ([`AggregateRecalculator`])
//! - **locks**: per-key async mutexes serializing read-then-write sections
//! - **engine**: [`BookingEngine`], the only write path for bookings and guests
//!
//! # Data Flow
//!
//! ```text
//! request → lock(booking / date) → BEGIN
//!         → mutate row → capacity check | aggregate resync
//!         → COMMIT (or ROLLBACK on rejection) → response
//! ```

pub mod aggregate;
pub mod capacity;
pub mod engine;
pub mod error;
pub mod locks;

pub use aggregate::{AggregateRecalculator, BookingAggregate};
pub use capacity::{CapacityDecision, CapacityGuard};
pub use engine::BookingEngine;
pub use error::{BookingError, BookingResult};
pub use locks::KeyedLocks;
