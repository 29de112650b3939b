//! Booking Repository
//!
//! Row-level access only. Capacity checks and aggregate maintenance live in
//! `crate::bookings`, which composes these calls inside one transaction.

use super::{RepoError, RepoResult, Visibility, soft_delete, soft_delete_children};
use shared::models::{Booking, BookingGuest, BookingStatus};
use sqlx::{SqliteConnection, SqliteExecutor};

const COLUMNS: &str = "id, order_id, booking_date, pax_count, status, gratuity_fee, is_first_booking, is_deleted, created_at, updated_at";

/// Values for a new booking row
#[derive(Debug, Clone)]
pub struct NewBooking<'a> {
    pub order_id: i64,
    /// Normalized `YYYY-MM-DD`
    pub booking_date: &'a str,
    pub pax_count: i64,
    pub status: BookingStatus,
    pub gratuity_fee: f64,
    pub is_first_booking: bool,
}

pub async fn find_all<'e, E: SqliteExecutor<'e>>(
    executor: E,
    booking_date: Option<&str>,
    order_id: Option<i64>,
    visibility: Visibility,
) -> RepoResult<Vec<Booking>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM booking WHERE {} AND (?1 IS NULL OR booking_date = ?1) AND (?2 IS NULL OR order_id = ?2) ORDER BY booking_date ASC, created_at ASC, id ASC",
        visibility.predicate()
    );
    let bookings = sqlx::query_as::<_, Booking>(&sql)
        .bind(booking_date)
        .bind(order_id)
        .fetch_all(executor)
        .await?;
    Ok(bookings)
}

pub async fn find_by_id<'e, E: SqliteExecutor<'e>>(
    executor: E,
    id: i64,
    visibility: Visibility,
) -> RepoResult<Option<Booking>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM booking WHERE id = ? AND {}",
        visibility.predicate()
    );
    let booking = sqlx::query_as::<_, Booking>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(booking)
}

/// Σ pax of active confirmed bookings on `booking_date`, optionally leaving
/// one booking out
pub async fn confirmed_pax_on<'e, E: SqliteExecutor<'e>>(
    executor: E,
    booking_date: &str,
    exclude: Option<i64>,
) -> RepoResult<i64> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(pax_count), 0) FROM booking WHERE booking_date = ?1 AND status = 'confirmed' AND is_deleted = 0 AND (?2 IS NULL OR id != ?2)",
    )
    .bind(booking_date)
    .bind(exclude)
    .fetch_one(executor)
    .await?;
    Ok(total)
}

pub async fn insert<'e, E: SqliteExecutor<'e>>(
    executor: E,
    data: &NewBooking<'_>,
    now: i64,
) -> RepoResult<i64> {
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO booking (id, order_id, booking_date, pax_count, status, gratuity_fee, is_first_booking, is_deleted, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, ?8)",
    )
    .bind(id)
    .bind(data.order_id)
    .bind(data.booking_date)
    .bind(data.pax_count)
    .bind(data.status)
    .bind(data.gratuity_fee)
    .bind(data.is_first_booking)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(id)
}

/// Partial update of the editable columns of an active booking
pub async fn update_fields<'e, E: SqliteExecutor<'e>>(
    executor: E,
    id: i64,
    booking_date: Option<&str>,
    status: Option<BookingStatus>,
    is_first_booking: Option<bool>,
    now: i64,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE booking SET booking_date = COALESCE(?1, booking_date), status = COALESCE(?2, status), is_first_booking = COALESCE(?3, is_first_booking), updated_at = ?4 WHERE id = ?5 AND is_deleted = 0",
    )
    .bind(booking_date)
    .bind(status)
    .bind(is_first_booking)
    .bind(now)
    .bind(id)
    .execute(executor)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::not_found::<Booking>(id));
    }
    Ok(())
}

/// Persist the derived pax count and gratuity fee
pub async fn set_aggregate<'e, E: SqliteExecutor<'e>>(
    executor: E,
    id: i64,
    pax_count: i64,
    gratuity_fee: f64,
    now: i64,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE booking SET pax_count = ?1, gratuity_fee = ?2, updated_at = ?3 WHERE id = ?4 AND is_deleted = 0",
    )
    .bind(pax_count)
    .bind(gratuity_fee)
    .bind(now)
    .bind(id)
    .execute(executor)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::not_found::<Booking>(id));
    }
    Ok(())
}

/// Soft-delete a booking and its guests. Returns the number of guests flipped.
pub async fn delete_cascade(conn: &mut SqliteConnection, id: i64, now: i64) -> RepoResult<u64> {
    soft_delete::<Booking, _>(&mut *conn, id, now).await?;
    soft_delete_children::<BookingGuest, _>(&mut *conn, "booking_id", id, now).await
}
