//! Daily capacity guard

use sqlx::SqliteExecutor;

use super::error::{BookingError, BookingResult};
use crate::db::repository::{RepoResult, booking};

/// Outcome of a capacity check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityDecision {
    pub allowed: bool,
    /// Σ pax of active confirmed bookings on the date
    pub current_pax: i64,
    /// `max - current_pax`, negative when the date is already over the cap
    pub remaining: i64,
    pub max: i64,
    pub requested: i64,
}

impl CapacityDecision {
    /// Turn a refusal into `CapacityExceeded`
    pub fn ensure_allowed(self, booking_date: &str) -> BookingResult<Self> {
        if self.allowed {
            return Ok(self);
        }
        Err(BookingError::CapacityExceeded {
            booking_date: booking_date.to_string(),
            current_pax: self.current_pax,
            remaining_capacity: self.remaining,
            max_capacity: self.max,
            requested_pax: self.requested,
        })
    }
}

/// Admits a booking only while the date's confirmed pax stay within the cap
#[derive(Debug, Clone, Copy)]
pub struct CapacityGuard {
    max_pax_per_date: i64,
}

impl CapacityGuard {
    pub fn new(max_pax_per_date: i64) -> Self {
        Self { max_pax_per_date }
    }

    pub fn max(&self) -> i64 {
        self.max_pax_per_date
    }

    pub fn decide(&self, current_pax: i64, requested: i64) -> CapacityDecision {
        CapacityDecision {
            allowed: current_pax
                .checked_add(requested)
                .is_some_and(|total| total <= self.max_pax_per_date),
            current_pax,
            remaining: self.max_pax_per_date.saturating_sub(current_pax),
            max: self.max_pax_per_date,
            requested,
        }
    }

    /// Check `requested` pax against the date's current load
    pub async fn check<'e, E: SqliteExecutor<'e>>(
        &self,
        executor: E,
        booking_date: &str,
        requested: i64,
    ) -> RepoResult<CapacityDecision> {
        let current = booking::confirmed_pax_on(executor, booking_date, None).await?;
        Ok(self.decide(current, requested))
    }

    /// Same as [`check`](Self::check) but leaves `booking_id` out of the
    /// sum, so a booking's own pax is never counted twice
    pub async fn check_excluding<'e, E: SqliteExecutor<'e>>(
        &self,
        executor: E,
        booking_date: &str,
        requested: i64,
        booking_id: i64,
    ) -> RepoResult<CapacityDecision> {
        let current = booking::confirmed_pax_on(executor, booking_date, Some(booking_id)).await?;
        Ok(self.decide(current, requested))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decide_boundary() {
        let guard = CapacityGuard::new(3);

        let d = guard.decide(2, 1);
        assert!(d.allowed);
        assert_eq!(d.remaining, 1);

        let d = guard.decide(2, 2);
        assert!(!d.allowed);
        assert_eq!(d.current_pax, 2);
        assert_eq!(d.remaining, 1);
        assert_eq!(d.max, 3);

        assert!(guard.decide(0, 3).allowed);
        assert!(guard.decide(0, 0).allowed);
    }

    #[test]
    fn test_decide_rejects_pax_that_would_overflow() {
        let guard = CapacityGuard::new(3);
        let d = guard.decide(1, i64::MAX);
        assert!(!d.allowed);
        assert_eq!(d.remaining, 2);
        assert!(!guard.decide(0, i64::MAX).allowed);
    }

    #[test]
    fn test_remaining_is_not_clamped() {
        let guard = CapacityGuard::new(3);
        let d = guard.decide(5, 0);
        assert_eq!(d.remaining, -2);
        assert!(!d.allowed);
    }

    #[test]
    fn test_ensure_allowed() {
        let guard = CapacityGuard::new(3);
        assert!(guard.decide(1, 1).ensure_allowed("2024-06-01").is_ok());

        let err = guard.decide(3, 1).ensure_allowed("2024-06-01").unwrap_err();
        assert!(matches!(
            err,
            BookingError::CapacityExceeded {
                current_pax: 3,
                remaining_capacity: 0,
                max_capacity: 3,
                requested_pax: 1,
                ..
            }
        ));
    }
}
