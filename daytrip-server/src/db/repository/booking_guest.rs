//! Booking Guest Repository

use super::{RepoError, RepoResult, Visibility};
use shared::models::{BookingGuest, BookingGuestCreate, BookingGuestUpdate};
use sqlx::SqliteExecutor;

const COLUMNS: &str = "id, booking_id, full_name, ic_number, mobile_phone, guest_type, notes, is_deleted, created_at, updated_at";

pub async fn find_by_booking<'e, E: SqliteExecutor<'e>>(
    executor: E,
    booking_id: i64,
    visibility: Visibility,
) -> RepoResult<Vec<BookingGuest>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM booking_guest WHERE booking_id = ? AND {} ORDER BY created_at ASC, id ASC",
        visibility.predicate()
    );
    let guests = sqlx::query_as::<_, BookingGuest>(&sql)
        .bind(booking_id)
        .fetch_all(executor)
        .await?;
    Ok(guests)
}

pub async fn find_by_id<'e, E: SqliteExecutor<'e>>(
    executor: E,
    id: i64,
    visibility: Visibility,
) -> RepoResult<Option<BookingGuest>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM booking_guest WHERE id = ? AND {}",
        visibility.predicate()
    );
    let guest = sqlx::query_as::<_, BookingGuest>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(guest)
}

/// Insert one guest under `booking_id`. Returns the new id.
pub async fn insert<'e, E: SqliteExecutor<'e>>(
    executor: E,
    booking_id: i64,
    data: &BookingGuestCreate,
    now: i64,
) -> RepoResult<i64> {
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO booking_guest (id, booking_id, full_name, ic_number, mobile_phone, guest_type, notes, is_deleted, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, NULL)",
    )
    .bind(id)
    .bind(booking_id)
    .bind(&data.full_name)
    .bind(&data.ic_number)
    .bind(&data.mobile_phone)
    .bind(data.guest_type.unwrap_or_default())
    .bind(&data.notes)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(id)
}

/// Partial update of an active guest
pub async fn update<'e, E: SqliteExecutor<'e>>(
    executor: E,
    id: i64,
    data: &BookingGuestUpdate,
    now: i64,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE booking_guest SET full_name = COALESCE(?1, full_name), ic_number = COALESCE(?2, ic_number), mobile_phone = COALESCE(?3, mobile_phone), guest_type = COALESCE(?4, guest_type), notes = COALESCE(?5, notes), updated_at = ?6 WHERE id = ?7 AND is_deleted = 0",
    )
    .bind(&data.full_name)
    .bind(&data.ic_number)
    .bind(&data.mobile_phone)
    .bind(data.guest_type)
    .bind(&data.notes)
    .bind(now)
    .bind(id)
    .execute(executor)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::not_found::<BookingGuest>(id));
    }
    Ok(())
}

/// Number of active guests on a booking
pub async fn count_active<'e, E: SqliteExecutor<'e>>(executor: E, booking_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM booking_guest WHERE booking_id = ? AND is_deleted = 0",
    )
    .bind(booking_id)
    .fetch_one(executor)
    .await?;
    Ok(count)
}

/// Soft-delete the guests of every active booking under an order
pub async fn soft_delete_by_order<'e, E: SqliteExecutor<'e>>(
    executor: E,
    order_id: i64,
    now: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE booking_guest SET is_deleted = 1, updated_at = ?1 WHERE is_deleted = 0 AND booking_id IN (SELECT id FROM booking WHERE order_id = ?2 AND is_deleted = 0)",
    )
    .bind(now)
    .bind(order_id)
    .execute(executor)
    .await?;
    Ok(rows.rows_affected())
}
