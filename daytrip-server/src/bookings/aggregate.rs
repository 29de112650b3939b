//! Booking aggregate recalculation

use sqlx::SqliteConnection;

use crate::db::repository::{RepoResult, booking, booking_guest};
use crate::utils::money;

/// Derived summary of a booking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookingAggregate {
    pub pax_count: i64,
    pub gratuity_fee: f64,
}

/// Rewrites a booking's pax count and gratuity from its active guests
#[derive(Debug, Clone, Copy)]
pub struct AggregateRecalculator {
    rate_per_pax: f64,
}

impl AggregateRecalculator {
    pub fn new(rate_per_pax: f64) -> Self {
        Self { rate_per_pax }
    }

    pub fn rate(&self) -> f64 {
        self.rate_per_pax
    }

    pub fn fee_for(&self, pax_count: i64) -> f64 {
        money::gratuity_fee(pax_count, self.rate_per_pax)
    }

    /// Full recount of active guests, persisted on the caller's connection.
    /// Must run in the same transaction as the guest mutation.
    pub async fn resync(
        &self,
        conn: &mut SqliteConnection,
        booking_id: i64,
    ) -> RepoResult<BookingAggregate> {
        let pax_count = booking_guest::count_active(&mut *conn, booking_id).await?;
        let aggregate = BookingAggregate {
            pax_count,
            gratuity_fee: self.fee_for(pax_count),
        };
        booking::set_aggregate(
            &mut *conn,
            booking_id,
            aggregate.pax_count,
            aggregate.gratuity_fee,
            shared::util::now_millis(),
        )
        .await?;
        tracing::debug!(
            booking_id,
            pax_count = aggregate.pax_count,
            gratuity_fee = aggregate.gratuity_fee,
            "Booking aggregate resynced"
        );
        Ok(aggregate)
    }
}
