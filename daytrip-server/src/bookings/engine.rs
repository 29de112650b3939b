//! Booking Engine
//!
//! Owns every write to `booking` and `booking_guest`:
//!
//! - booking creation and capacity-consuming updates are serialized per
//!   calendar date and checked by the [`CapacityGuard`]
//! - guest mutations are serialized per booking and followed by an
//!   [`AggregateRecalculator`] resync in the same transaction
//!
//! Lock order is booking before date. Every transaction opens with a write
//! so SQLite takes the write lock up front; checks that fail afterwards roll
//! the transaction back.

use sqlx::SqlitePool;

use super::aggregate::AggregateRecalculator;
use super::capacity::CapacityGuard;
use super::error::{BookingError, BookingResult};
use super::locks::KeyedLocks;
use crate::core::Config;
use crate::db::repository::booking::{self, NewBooking};
use crate::db::repository::{
    RepoError, Visibility, booking_guest, ensure_reference, soft_delete,
};
use crate::utils::{time, validation};
use shared::models::{
    Availability, Booking, BookingCreate, BookingGuest, BookingGuestCreate, BookingGuestUpdate,
    BookingStatus, BookingUpdate, GuestDeleted, Order, SoftDeleted, StatusChanged,
    FULL_NAME_MAX_LEN, GUEST_NOTES_MAX_LEN, IC_NUMBER_MAX_LEN, MOBILE_PHONE_MAX_LEN,
};

#[derive(Debug)]
pub struct BookingEngine {
    pool: SqlitePool,
    guard: CapacityGuard,
    recalculator: AggregateRecalculator,
    enforce_transitions: bool,
    date_locks: KeyedLocks<String>,
    booking_locks: KeyedLocks<i64>,
}

impl BookingEngine {
    pub fn new(
        pool: SqlitePool,
        guard: CapacityGuard,
        recalculator: AggregateRecalculator,
        enforce_transitions: bool,
    ) -> Self {
        Self {
            pool,
            guard,
            recalculator,
            enforce_transitions,
            date_locks: KeyedLocks::new(),
            booking_locks: KeyedLocks::new(),
        }
    }

    pub fn from_config(pool: SqlitePool, config: &Config) -> Self {
        Self::new(
            pool,
            CapacityGuard::new(config.max_pax_per_date),
            AggregateRecalculator::new(config.gratuity_rate_per_pax),
            config.enforce_status_transitions,
        )
    }

    pub fn max_pax_per_date(&self) -> i64 {
        self.guard.max()
    }

    // ========== Reads ==========

    /// Confirmed load and remaining capacity on one date
    pub async fn availability(&self, date: &str) -> BookingResult<Availability> {
        let booking_date = normalize(date)?;
        let decision = self.guard.check(&self.pool, &booking_date, 0).await?;
        Ok(Availability {
            booking_date,
            total_pax: decision.current_pax,
            remaining_capacity: decision.remaining,
            max_capacity: decision.max,
        })
    }

    pub async fn list(
        &self,
        date: Option<&str>,
        order_id: Option<i64>,
        visibility: Visibility,
    ) -> BookingResult<Vec<Booking>> {
        let booking_date = date.map(normalize).transpose()?;
        let bookings =
            booking::find_all(&self.pool, booking_date.as_deref(), order_id, visibility).await?;
        Ok(bookings)
    }

    pub async fn get(&self, id: i64, visibility: Visibility) -> BookingResult<Booking> {
        booking::find_by_id(&self.pool, id, visibility)
            .await?
            .ok_or_else(|| RepoError::not_found::<Booking>(id).into())
    }

    /// Active guests of an active booking
    pub async fn guests(&self, booking_id: i64) -> BookingResult<Vec<BookingGuest>> {
        self.get(booking_id, Visibility::Active).await?;
        let guests =
            booking_guest::find_by_booking(&self.pool, booking_id, Visibility::Active).await?;
        Ok(guests)
    }

    // ========== Booking writes ==========

    /// Admit a booking if the date's confirmed pax leave room for it
    pub async fn create(&self, data: BookingCreate) -> BookingResult<Booking> {
        if data.pax_count < 0 {
            return Err(BookingError::Validation("pax_count must not be negative".into()));
        }
        let booking_date = normalize(&data.booking_date)?;
        ensure_reference::<Order, _>(&self.pool, data.order_id).await?;

        // no single booking may exceed the daily cap
        if data.pax_count > self.guard.max() {
            let decision = self.guard.check(&self.pool, &booking_date, data.pax_count).await?;
            decision.ensure_allowed(&booking_date)?;
        }

        let _date_lock = self.date_locks.lock(booking_date.clone()).await;
        let now = shared::util::now_millis();

        let mut tx = self.pool.begin().await?;
        let id = booking::insert(
            &mut *tx,
            &NewBooking {
                order_id: data.order_id,
                booking_date: &booking_date,
                pax_count: data.pax_count,
                status: data.status.unwrap_or_default(),
                gratuity_fee: self.recalculator.fee_for(data.pax_count),
                is_first_booking: data.is_first_booking.unwrap_or(false),
            },
            now,
        )
        .await?;

        let decision = self
            .guard
            .check_excluding(&mut *tx, &booking_date, data.pax_count, id)
            .await?;
        if let Err(rejected) = decision.ensure_allowed(&booking_date) {
            tx.rollback().await?;
            tracing::warn!(
                booking_date = %booking_date,
                current_pax = decision.current_pax,
                requested_pax = decision.requested,
                max_capacity = decision.max,
                "Booking rejected: capacity exceeded"
            );
            return Err(rejected);
        }
        tx.commit().await?;

        tracing::info!(
            booking_id = id,
            order_id = data.order_id,
            booking_date = %booking_date,
            pax_count = data.pax_count,
            "Booking created"
        );
        self.get(id, Visibility::Active).await
    }

    /// Partial update. Moving a booking to another date, or back into
    /// `confirmed`, is checked against the target date's capacity.
    pub async fn update(&self, id: i64, data: BookingUpdate) -> BookingResult<Booking> {
        let (_, updated) = self.apply_update(id, data).await?;
        Ok(updated)
    }

    /// Returns the row as read under the booking lock, then the updated row
    async fn apply_update(&self, id: i64, data: BookingUpdate) -> BookingResult<(Booking, Booking)> {
        let new_date = data.booking_date.as_deref().map(normalize).transpose()?;

        let _booking_lock = self.booking_locks.lock(id).await;
        let existing = self.get(id, Visibility::Active).await?;

        if let Some(next) = data.status {
            self.check_transition(existing.status, next)?;
        }

        let target_status = data.status.unwrap_or(existing.status);
        let target_date = new_date.clone().unwrap_or_else(|| existing.booking_date.clone());
        let consumes_capacity = target_status == BookingStatus::Confirmed
            && (target_date != existing.booking_date || existing.status != BookingStatus::Confirmed);

        let _date_lock = if consumes_capacity {
            Some(self.date_locks.lock(target_date.clone()).await)
        } else {
            None
        };

        let mut tx = self.pool.begin().await?;
        booking::update_fields(
            &mut *tx,
            id,
            new_date.as_deref(),
            data.status,
            data.is_first_booking,
            shared::util::now_millis(),
        )
        .await?;

        if consumes_capacity {
            let decision = self
                .guard
                .check_excluding(&mut *tx, &target_date, existing.pax_count, id)
                .await?;
            if let Err(rejected) = decision.ensure_allowed(&target_date) {
                tx.rollback().await?;
                tracing::warn!(
                    booking_id = id,
                    booking_date = %target_date,
                    current_pax = decision.current_pax,
                    requested_pax = decision.requested,
                    "Booking update rejected: capacity exceeded"
                );
                return Err(rejected);
            }
        }
        tx.commit().await?;

        let updated = self.get(id, Visibility::Active).await?;
        Ok((existing, updated))
    }

    pub async fn update_status(&self, id: i64, status: BookingStatus) -> BookingResult<StatusChanged> {
        let (existing, updated) = self
            .apply_update(
                id,
                BookingUpdate {
                    status: Some(status),
                    ..Default::default()
                },
            )
            .await?;
        let previous = existing.status;
        tracing::info!(booking_id = id, from = %previous, to = %updated.status, "Booking status changed");
        Ok(StatusChanged {
            id,
            previous_status: previous,
            new_status: updated.status,
            updated_at: updated.updated_at,
        })
    }

    /// Soft-delete a booking and its guests
    pub async fn delete(&self, id: i64) -> BookingResult<SoftDeleted> {
        let _booking_lock = self.booking_locks.lock(id).await;

        let mut tx = self.pool.begin().await?;
        let guests = booking::delete_cascade(&mut tx, id, shared::util::now_millis()).await?;
        tx.commit().await?;

        tracing::info!(booking_id = id, guests, "Booking soft-deleted");
        Ok(SoftDeleted::new("Booking", id))
    }

    fn check_transition(&self, from: BookingStatus, to: BookingStatus) -> BookingResult<()> {
        if self.enforce_transitions && !from.can_transition_to(to) {
            return Err(BookingError::InvalidStatusTransition { from, to });
        }
        Ok(())
    }

    // ========== Guest writes ==========

    /// Add guests to a booking, then recount
    pub async fn add_guests(
        &self,
        booking_id: i64,
        guests: Vec<BookingGuestCreate>,
    ) -> BookingResult<Vec<BookingGuest>> {
        if guests.is_empty() {
            return Err(BookingError::Validation("At least one guest is required".into()));
        }
        for guest in &guests {
            validate_guest_create(guest)?;
        }

        let _booking_lock = self.booking_locks.lock(booking_id).await;
        self.get(booking_id, Visibility::Active).await?;

        let now = shared::util::now_millis();
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(guests.len());
        for guest in &guests {
            ids.push(booking_guest::insert(&mut *tx, booking_id, guest, now).await?);
        }
        let aggregate = self.recalculator.resync(&mut tx, booking_id).await?;
        tx.commit().await?;

        tracing::info!(
            booking_id,
            added = ids.len(),
            pax_count = aggregate.pax_count,
            "Guests added"
        );

        let mut created = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(guest) = booking_guest::find_by_id(&self.pool, id, Visibility::Active).await? {
                created.push(guest);
            }
        }
        Ok(created)
    }

    pub async fn update_guest(
        &self,
        guest_id: i64,
        data: BookingGuestUpdate,
    ) -> BookingResult<BookingGuest> {
        validate_guest_update(&data)?;
        let booking_id = self.guest(guest_id).await?.booking_id;

        let _booking_lock = self.booking_locks.lock(booking_id).await;
        booking_guest::update(&self.pool, guest_id, &data, shared::util::now_millis()).await?;
        self.guest(guest_id).await
    }

    /// Soft-delete a guest, then recount
    pub async fn delete_guest(&self, guest_id: i64) -> BookingResult<GuestDeleted> {
        let booking_id = self.guest(guest_id).await?.booking_id;

        let _booking_lock = self.booking_locks.lock(booking_id).await;
        let mut tx = self.pool.begin().await?;
        soft_delete::<BookingGuest, _>(&mut *tx, guest_id, shared::util::now_millis()).await?;
        let aggregate = self.recalculator.resync(&mut tx, booking_id).await?;
        tx.commit().await?;

        tracing::info!(booking_id, guest_id, pax_count = aggregate.pax_count, "Guest soft-deleted");
        Ok(GuestDeleted {
            message: "Guest soft-deleted".into(),
            guest_id,
            booking_id,
        })
    }

    async fn guest(&self, guest_id: i64) -> BookingResult<BookingGuest> {
        booking_guest::find_by_id(&self.pool, guest_id, Visibility::Active)
            .await?
            .ok_or_else(|| RepoError::not_found::<BookingGuest>(guest_id).into())
    }
}

fn normalize(date: &str) -> BookingResult<String> {
    time::normalize_date(date).map_err(|_| BookingError::InvalidDate(date.to_string()))
}

fn validate_guest_create(guest: &BookingGuestCreate) -> BookingResult<()> {
    validation::validate_required_text(&guest.full_name, "full_name", FULL_NAME_MAX_LEN)
        .and_then(|_| validation::validate_required_text(&guest.ic_number, "ic_number", IC_NUMBER_MAX_LEN))
        .and_then(|_| validation::validate_optional_text(&guest.mobile_phone, "mobile_phone", MOBILE_PHONE_MAX_LEN))
        .and_then(|_| validation::validate_optional_text(&guest.notes, "notes", GUEST_NOTES_MAX_LEN))
        .map_err(|e| BookingError::Validation(e.message))
}

fn validate_guest_update(data: &BookingGuestUpdate) -> BookingResult<()> {
    let required = [
        (&data.full_name, "full_name", FULL_NAME_MAX_LEN),
        (&data.ic_number, "ic_number", IC_NUMBER_MAX_LEN),
    ];
    for (value, field, max) in required {
        if let Some(v) = value {
            validation::validate_required_text(v, field, max)
                .map_err(|e| BookingError::Validation(e.message))?;
        }
    }
    validation::validate_optional_text(&data.mobile_phone, "mobile_phone", MOBILE_PHONE_MAX_LEN)
        .and_then(|_| validation::validate_optional_text(&data.notes, "notes", GUEST_NOTES_MAX_LEN))
        .map_err(|e| BookingError::Validation(e.message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::order_package::tests::seed_order;
    use crate::db::{DbService, test_pool};
    use shared::models::GuestType;
    use std::sync::Arc;
    use tokio::task::JoinSet;

    async fn engine_with(enforce: bool) -> (BookingEngine, i64) {
        let pool = test_pool().await;
        let (order_id, _) = seed_order(&pool).await;
        let engine = BookingEngine::new(
            pool,
            CapacityGuard::new(3),
            AggregateRecalculator::new(5.0),
            enforce,
        );
        (engine, order_id)
    }

    /// File-backed engine so concurrent tasks really get separate connections
    async fn file_engine(dir: &tempfile::TempDir) -> (Arc<BookingEngine>, i64) {
        let path = dir.path().join("daytrip.db");
        let db = DbService::new(path.to_str().unwrap()).await.unwrap();
        let (order_id, _) = seed_order(&db.pool).await;
        let engine = BookingEngine::new(
            db.pool,
            CapacityGuard::new(3),
            AggregateRecalculator::new(5.0),
            false,
        );
        (Arc::new(engine), order_id)
    }

    fn booking_create(order_id: i64, date: &str, pax: i64) -> BookingCreate {
        BookingCreate {
            order_id,
            booking_date: date.into(),
            pax_count: pax,
            status: None,
            is_first_booking: None,
        }
    }

    fn guest(name: &str) -> BookingGuestCreate {
        BookingGuestCreate {
            full_name: name.into(),
            ic_number: "900101-14-5678".into(),
            mobile_phone: Some("+60123456789".into()),
            guest_type: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_capacity_scenario() {
        let (engine, order_id) = engine_with(false).await;

        engine.create(booking_create(order_id, "2024-06-01", 2)).await.unwrap();

        let err = engine
            .create(booking_create(order_id, "2024-06-01T10:00", 2))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BookingError::CapacityExceeded {
                current_pax: 2,
                remaining_capacity: 1,
                max_capacity: 3,
                requested_pax: 2,
                ..
            }
        ));

        engine.create(booking_create(order_id, "2024-06-01", 1)).await.unwrap();

        let availability = engine.availability("2024-06-01").await.unwrap();
        assert_eq!(availability.total_pax, 3);
        assert_eq!(availability.remaining_capacity, 0);
        assert_eq!(availability.max_capacity, 3);
    }

    #[tokio::test]
    async fn test_rejected_booking_leaves_no_row() {
        let (engine, order_id) = engine_with(false).await;
        engine.create(booking_create(order_id, "2024-06-01", 3)).await.unwrap();

        assert!(engine.create(booking_create(order_id, "2024-06-01", 1)).await.is_err());
        let all = engine.list(Some("2024-06-01"), None, Visibility::All).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_created_booking_defaults() {
        let (engine, order_id) = engine_with(false).await;
        let booking = engine.create(booking_create(order_id, "2024-06-01T23:30:00", 2)).await.unwrap();
        assert_eq!(booking.booking_date, "2024-06-01");
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.gratuity_fee, 10.0);
        assert!(!booking.is_first_booking);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_order_and_bad_date() {
        let (engine, order_id) = engine_with(false).await;

        let err = engine.create(booking_create(order_id + 1, "2024-06-01", 1)).await.unwrap_err();
        assert!(matches!(err, BookingError::Repo(RepoError::InvalidReference(_))));

        let err = engine.create(booking_create(order_id, "tomorrow", 1)).await.unwrap_err();
        assert!(matches!(err, BookingError::InvalidDate(_)));
    }

    #[tokio::test]
    async fn test_pending_and_deleted_bookings_do_not_consume_capacity() {
        let (engine, order_id) = engine_with(false).await;
        let mut pending = booking_create(order_id, "2024-06-01", 2);
        pending.status = Some(BookingStatus::Pending);
        engine.create(pending).await.unwrap();

        let confirmed = engine.create(booking_create(order_id, "2024-06-01", 3)).await.unwrap();
        assert_eq!(engine.availability("2024-06-01").await.unwrap().total_pax, 3);

        engine.delete(confirmed.id).await.unwrap();
        let availability = engine.availability("2024-06-01").await.unwrap();
        assert_eq!(availability.total_pax, 0);
        assert_eq!(availability.remaining_capacity, 3);
    }

    #[tokio::test]
    async fn test_guest_recount_after_adds_and_deletes() {
        let (engine, order_id) = engine_with(false).await;
        let booking = engine.create(booking_create(order_id, "2024-06-02", 1)).await.unwrap();

        let added = engine
            .add_guests(
                booking.id,
                vec![guest("A"), guest("B"), guest("C"), guest("D"), guest("E")],
            )
            .await
            .unwrap();
        assert_eq!(added.len(), 5);
        assert!(added.iter().all(|g| g.guest_type == GuestType::Adult));

        engine.delete_guest(added[0].id).await.unwrap();
        let deleted = engine.delete_guest(added[3].id).await.unwrap();
        assert_eq!(deleted.booking_id, booking.id);
        assert_eq!(deleted.guest_id, added[3].id);

        let booking = engine.get(booking.id, Visibility::Active).await.unwrap();
        assert_eq!(booking.pax_count, 3);
        assert_eq!(booking.gratuity_fee, 15.0);

        let listed = engine.guests(booking.id).await.unwrap();
        assert_eq!(listed.len(), 3);
        assert!(listed.iter().all(|g| g.id != added[0].id && g.id != added[3].id));
    }

    #[tokio::test]
    async fn test_resync_is_idempotent() {
        let (engine, order_id) = engine_with(false).await;
        let booking = engine.create(booking_create(order_id, "2024-06-02", 0)).await.unwrap();
        engine.add_guests(booking.id, vec![guest("A"), guest("B")]).await.unwrap();

        let mut conn = engine.pool.acquire().await.unwrap();
        let first = engine.recalculator.resync(&mut conn, booking.id).await.unwrap();
        let second = engine.recalculator.resync(&mut conn, booking.id).await.unwrap();
        drop(conn);

        assert_eq!(first, second);
        assert_eq!(first.pax_count, 2);
        assert_eq!(first.gratuity_fee, 10.0);
    }

    #[tokio::test]
    async fn test_deleting_guest_twice_is_not_found() {
        let (engine, order_id) = engine_with(false).await;
        let booking = engine.create(booking_create(order_id, "2024-06-02", 0)).await.unwrap();
        let added = engine.add_guests(booking.id, vec![guest("A")]).await.unwrap();

        engine.delete_guest(added[0].id).await.unwrap();
        let err = engine.delete_guest(added[0].id).await.unwrap_err();
        assert!(matches!(err, BookingError::Repo(RepoError::NotFound { resource: "Guest", .. })));
        assert_eq!(engine.get(booking.id, Visibility::Active).await.unwrap().pax_count, 0);
    }

    #[tokio::test]
    async fn test_add_guests_validates_before_writing() {
        let (engine, order_id) = engine_with(false).await;
        let booking = engine.create(booking_create(order_id, "2024-06-02", 2)).await.unwrap();

        let mut bad = guest("B");
        bad.ic_number = "1".repeat(21);
        let err = engine.add_guests(booking.id, vec![guest("A"), bad]).await.unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));

        let err = engine.add_guests(booking.id, vec![]).await.unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));

        assert!(engine.guests(booking.id).await.unwrap().is_empty());
        assert_eq!(engine.get(booking.id, Visibility::Active).await.unwrap().pax_count, 2);
    }

    #[tokio::test]
    async fn test_add_guests_to_deleted_booking_is_not_found() {
        let (engine, order_id) = engine_with(false).await;
        let booking = engine.create(booking_create(order_id, "2024-06-02", 0)).await.unwrap();
        engine.delete(booking.id).await.unwrap();

        let err = engine.add_guests(booking.id, vec![guest("A")]).await.unwrap_err();
        assert!(matches!(err, BookingError::Repo(RepoError::NotFound { resource: "Booking", .. })));
    }

    #[tokio::test]
    async fn test_update_guest_keeps_aggregate() {
        let (engine, order_id) = engine_with(false).await;
        let booking = engine.create(booking_create(order_id, "2024-06-02", 0)).await.unwrap();
        let added = engine.add_guests(booking.id, vec![guest("A")]).await.unwrap();

        let updated = engine
            .update_guest(
                added[0].id,
                BookingGuestUpdate {
                    full_name: Some("Aina".into()),
                    guest_type: Some(GuestType::Child),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.full_name, "Aina");
        assert_eq!(updated.guest_type, GuestType::Child);
        assert!(updated.updated_at.is_some());

        let err = engine
            .update_guest(
                added[0].id,
                BookingGuestUpdate {
                    full_name: Some("  ".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));
        assert_eq!(engine.get(booking.id, Visibility::Active).await.unwrap().pax_count, 1);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_guests() {
        let (engine, order_id) = engine_with(false).await;
        let booking = engine.create(booking_create(order_id, "2024-06-02", 0)).await.unwrap();
        engine.add_guests(booking.id, vec![guest("A"), guest("B")]).await.unwrap();

        let deleted = engine.delete(booking.id).await.unwrap();
        assert_eq!(deleted.id, booking.id);
        assert!(engine.guests(booking.id).await.unwrap().is_empty());
        assert!(engine.get(booking.id, Visibility::Active).await.is_err());
        assert!(engine.get(booking.id, Visibility::All).await.unwrap().is_deleted);

        let err = engine.delete(booking.id).await.unwrap_err();
        assert!(matches!(err, BookingError::Repo(RepoError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_moving_date_checks_target_capacity() {
        let (engine, order_id) = engine_with(false).await;
        engine.create(booking_create(order_id, "2024-06-01", 3)).await.unwrap();
        let movable = engine.create(booking_create(order_id, "2024-06-02", 2)).await.unwrap();

        let err = engine
            .update(
                movable.id,
                BookingUpdate {
                    booking_date: Some("2024-06-01".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::CapacityExceeded { current_pax: 3, .. }));
        assert_eq!(
            engine.get(movable.id, Visibility::Active).await.unwrap().booking_date,
            "2024-06-02"
        );

        // re-saving on its own date never counts itself twice
        let same = engine
            .update(
                movable.id,
                BookingUpdate {
                    is_first_booking: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(same.is_first_booking);
    }

    #[tokio::test]
    async fn test_reconfirming_checks_capacity() {
        let (engine, order_id) = engine_with(false).await;
        let first = engine.create(booking_create(order_id, "2024-06-01", 2)).await.unwrap();
        engine.update_status(first.id, BookingStatus::Cancelled).await.unwrap();
        engine.create(booking_create(order_id, "2024-06-01", 2)).await.unwrap();

        let err = engine.update_status(first.id, BookingStatus::Confirmed).await.unwrap_err();
        assert!(matches!(err, BookingError::CapacityExceeded { .. }));
        assert_eq!(
            engine.get(first.id, Visibility::Active).await.unwrap().status,
            BookingStatus::Cancelled
        );
    }

    #[tokio::test]
    async fn test_status_change_reports_previous() {
        let (engine, order_id) = engine_with(false).await;
        let booking = engine.create(booking_create(order_id, "2024-06-01", 1)).await.unwrap();

        let changed = engine.update_status(booking.id, BookingStatus::Completed).await.unwrap();
        assert_eq!(changed.previous_status, BookingStatus::Confirmed);
        assert_eq!(changed.new_status, BookingStatus::Completed);

        // unenforced: any change is accepted
        let changed = engine.update_status(booking.id, BookingStatus::Pending).await.unwrap();
        assert_eq!(changed.previous_status, BookingStatus::Completed);
    }

    #[tokio::test]
    async fn test_enforced_transitions() {
        let (engine, order_id) = engine_with(true).await;
        let booking = engine.create(booking_create(order_id, "2024-06-01", 1)).await.unwrap();

        engine.update_status(booking.id, BookingStatus::Completed).await.unwrap();
        let err = engine.update_status(booking.id, BookingStatus::Pending).await.unwrap_err();
        assert!(matches!(
            err,
            BookingError::InvalidStatusTransition {
                from: BookingStatus::Completed,
                to: BookingStatus::Pending
            }
        ));
    }

    #[tokio::test]
    async fn test_oversized_pax_is_rejected_without_overflow() {
        let (engine, order_id) = engine_with(false).await;
        engine.create(booking_create(order_id, "2024-06-01", 1)).await.unwrap();

        let err = engine
            .create(booking_create(order_id, "2024-06-01", i64::MAX))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BookingError::CapacityExceeded {
                current_pax: 1,
                remaining_capacity: 2,
                max_capacity: 3,
                requested_pax: i64::MAX,
                ..
            }
        ));
        let all = engine.list(Some("2024-06-01"), None, Visibility::All).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_guests_of_missing_or_deleted_booking_is_not_found() {
        let (engine, order_id) = engine_with(false).await;

        let err = engine.guests(999).await.unwrap_err();
        assert!(matches!(err, BookingError::Repo(RepoError::NotFound { resource: "Booking", .. })));

        let booking = engine.create(booking_create(order_id, "2024-06-02", 0)).await.unwrap();
        engine.add_guests(booking.id, vec![guest("A")]).await.unwrap();
        assert_eq!(engine.guests(booking.id).await.unwrap().len(), 1);

        engine.delete(booking.id).await.unwrap();
        let err = engine.guests(booking.id).await.unwrap_err();
        assert!(matches!(err, BookingError::Repo(RepoError::NotFound { resource: "Booking", .. })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_never_exceed_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, order_id) = file_engine(&dir).await;

        let mut tasks = JoinSet::new();
        for _ in 0..12 {
            let engine = engine.clone();
            tasks.spawn(async move {
                engine.create(booking_create(order_id, "2024-06-01", 1)).await
            });
        }

        let (mut admitted, mut rejected) = (0, 0);
        while let Some(result) = tasks.join_next().await {
            match result.unwrap() {
                Ok(_) => admitted += 1,
                Err(BookingError::CapacityExceeded { .. }) => rejected += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(admitted, 3);
        assert_eq!(rejected, 9);

        let availability = engine.availability("2024-06-01").await.unwrap();
        assert_eq!(availability.total_pax, 3);
        assert_eq!(availability.remaining_capacity, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_guest_changes_keep_pax_equal_to_guest_count() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, order_id) = file_engine(&dir).await;
        let booking_id = engine.create(booking_create(order_id, "2024-06-05", 0)).await.unwrap().id;

        let mut tasks = JoinSet::new();
        for i in 0..8 {
            let engine = engine.clone();
            tasks.spawn(async move {
                engine
                    .add_guests(booking_id, vec![guest(&format!("G{i}a")), guest(&format!("G{i}b"))])
                    .await
            });
        }
        let mut guest_ids = Vec::new();
        while let Some(result) = tasks.join_next().await {
            guest_ids.extend(result.unwrap().unwrap().into_iter().map(|g| g.id));
        }
        assert_eq!(guest_ids.len(), 16);

        let stored = engine.get(booking_id, Visibility::Active).await.unwrap();
        assert_eq!(stored.pax_count, 16);
        assert_eq!(stored.gratuity_fee, 80.0);

        let mut tasks = JoinSet::new();
        for id in guest_ids.into_iter().take(5) {
            let engine = engine.clone();
            tasks.spawn(async move { engine.delete_guest(id).await });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap().unwrap();
        }

        let stored = engine.get(booking_id, Visibility::Active).await.unwrap();
        assert_eq!(stored.pax_count, 11);
        assert_eq!(stored.gratuity_fee, 55.0);
        assert_eq!(engine.guests(booking_id).await.unwrap().len(), 11);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_status_changes_report_a_consistent_chain() {
        use BookingStatus::*;

        let dir = tempfile::tempdir().unwrap();
        let (engine, order_id) = file_engine(&dir).await;
        let booking_id = engine.create(booking_create(order_id, "2024-06-07", 1)).await.unwrap().id;

        let targets = [Pending, Confirmed, Completed, Cancelled, Pending, Confirmed, Cancelled, Completed];
        let mut tasks = JoinSet::new();
        for status in targets {
            let engine = engine.clone();
            tasks.spawn(async move { engine.update_status(booking_id, status).await });
        }
        let mut changes = Vec::new();
        while let Some(result) = tasks.join_next().await {
            changes.push(result.unwrap().unwrap());
        }

        // each reported change must start where another one (or creation) left off
        let final_status = engine.get(booking_id, Visibility::Active).await.unwrap().status;
        for status in BookingStatus::ALL {
            let left = changes.iter().filter(|c| c.previous_status == status).count() as i64;
            let entered = changes.iter().filter(|c| c.new_status == status).count() as i64;
            let expected = i64::from(status == Confirmed) - i64::from(status == final_status);
            assert_eq!(left - entered, expected, "status {status}");
        }
    }
}
