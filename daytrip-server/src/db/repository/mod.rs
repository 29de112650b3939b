//! Repository Module
//!
//! CRUD operations over the SQLite tables. Single-statement reads take any
//! `SqliteExecutor` (a pool or `&mut *tx`); multi-statement writes take a
//! `&mut SqliteConnection` so the caller owns the transaction.

pub mod booking;
pub mod booking_guest;
pub mod form;
pub mod form_settings;
pub mod order;
pub mod order_package;
pub mod package;

use shared::error::{AppError, ErrorCode};
use shared::models::{
    Booking, BookingGuest, Form, FormSettings, Order, OrderPackage, Package,
};
use sqlx::SqliteExecutor;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    /// Row is absent or soft-deleted
    #[error("{resource} {id} not found")]
    NotFound {
        resource: &'static str,
        id: i64,
        code: ErrorCode,
    },

    /// A foreign key points at a missing or soft-deleted row
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl RepoError {
    pub fn not_found<T: SoftDelete>(id: i64) -> Self {
        RepoError::NotFound {
            resource: T::RESOURCE,
            id,
            code: T::NOT_FOUND,
        }
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound { resource, id, code } => {
                AppError::with_message(code, format!("{resource} {id} not found"))
                    .with_detail("resource", resource)
                    .with_detail("id", id)
            }
            RepoError::InvalidReference(msg) => AppError::invalid_reference(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Which rows a read may return
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    /// Only rows with `is_deleted = 0`
    #[default]
    Active,
    /// Soft-deleted rows too (explicit opt-in)
    All,
}

impl Visibility {
    pub fn from_include_deleted(include_deleted: bool) -> Self {
        if include_deleted { Self::All } else { Self::Active }
    }

    /// SQL predicate usable after `WHERE` or `AND`
    pub fn predicate(&self) -> &'static str {
        match self {
            Self::Active => "is_deleted = 0",
            Self::All => "1 = 1",
        }
    }
}

/// Uniform soft-delete capability shared by every entity table
///
/// Deleting flips `is_deleted` and stamps `updated_at`; rows are never
/// physically removed.
pub trait SoftDelete {
    const TABLE: &'static str;
    const RESOURCE: &'static str;
    const NOT_FOUND: ErrorCode;
}

impl SoftDelete for Form {
    const TABLE: &'static str = "form";
    const RESOURCE: &'static str = "Form";
    const NOT_FOUND: ErrorCode = ErrorCode::FormNotFound;
}

impl SoftDelete for FormSettings {
    const TABLE: &'static str = "form_settings";
    const RESOURCE: &'static str = "FormSettings";
    const NOT_FOUND: ErrorCode = ErrorCode::FormSettingsNotFound;
}

impl SoftDelete for Package {
    const TABLE: &'static str = "package";
    const RESOURCE: &'static str = "Package";
    const NOT_FOUND: ErrorCode = ErrorCode::PackageNotFound;
}

impl SoftDelete for Order {
    const TABLE: &'static str = "customer_order";
    const RESOURCE: &'static str = "Order";
    const NOT_FOUND: ErrorCode = ErrorCode::OrderNotFound;
}

impl SoftDelete for OrderPackage {
    const TABLE: &'static str = "order_package";
    const RESOURCE: &'static str = "OrderPackage";
    const NOT_FOUND: ErrorCode = ErrorCode::OrderPackageNotFound;
}

impl SoftDelete for Booking {
    const TABLE: &'static str = "booking";
    const RESOURCE: &'static str = "Booking";
    const NOT_FOUND: ErrorCode = ErrorCode::BookingNotFound;
}

impl SoftDelete for BookingGuest {
    const TABLE: &'static str = "booking_guest";
    const RESOURCE: &'static str = "Guest";
    const NOT_FOUND: ErrorCode = ErrorCode::GuestNotFound;
}

/// Soft-delete one active row. Fails with `NotFound` if the row is absent
/// or already deleted.
pub async fn soft_delete<'e, T, E>(executor: E, id: i64, now: i64) -> RepoResult<()>
where
    T: SoftDelete,
    E: SqliteExecutor<'e>,
{
    let sql = format!(
        "UPDATE {} SET is_deleted = 1, updated_at = ? WHERE id = ? AND is_deleted = 0",
        T::TABLE
    );
    let rows = sqlx::query(&sql)
        .bind(now)
        .bind(id)
        .execute(executor)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::not_found::<T>(id));
    }
    Ok(())
}

/// Soft-delete every active child row whose `parent_column` equals
/// `parent_id`. Returns the number of rows flipped.
pub async fn soft_delete_children<'e, T, E>(
    executor: E,
    parent_column: &'static str,
    parent_id: i64,
    now: i64,
) -> RepoResult<u64>
where
    T: SoftDelete,
    E: SqliteExecutor<'e>,
{
    let sql = format!(
        "UPDATE {} SET is_deleted = 1, updated_at = ? WHERE {} = ? AND is_deleted = 0",
        T::TABLE,
        parent_column
    );
    let rows = sqlx::query(&sql)
        .bind(now)
        .bind(parent_id)
        .execute(executor)
        .await?;
    Ok(rows.rows_affected())
}

/// Whether a row exists under the given visibility
pub async fn exists<'e, T, E>(executor: E, id: i64, visibility: Visibility) -> RepoResult<bool>
where
    T: SoftDelete,
    E: SqliteExecutor<'e>,
{
    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE id = ? AND {})",
        T::TABLE,
        visibility.predicate()
    );
    let found: i64 = sqlx::query_scalar(&sql)
        .bind(id)
        .fetch_one(executor)
        .await?;
    Ok(found != 0)
}

/// Fail with `InvalidReference` unless `id` names an active row
pub async fn ensure_reference<'e, T, E>(executor: E, id: i64) -> RepoResult<()>
where
    T: SoftDelete,
    E: SqliteExecutor<'e>,
{
    if exists::<T, E>(executor, id, Visibility::Active).await? {
        Ok(())
    } else {
        Err(RepoError::InvalidReference(format!(
            "{} {id} does not exist",
            T::RESOURCE
        )))
    }
}
