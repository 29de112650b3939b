//! Package Repository

use super::{RepoError, RepoResult, Visibility, ensure_reference};
use shared::models::{Form, Package, PackageCreate, PackageUpdate};
use sqlx::{SqliteExecutor, SqlitePool};

const COLUMNS: &str = "id, form_id, merchant_id, package_name, description, price, no_of_pax, availability, boat_fare_enabled, boat_fare_amount, boat_fare_calc_type, gratuity_enabled, gratuity_amount, gratuity_calc_type, deposit_amount, deposit_mode, is_deleted, created_at, updated_at";

pub async fn find_all<'e, E: SqliteExecutor<'e>>(
    executor: E,
    form_id: Option<i64>,
    visibility: Visibility,
) -> RepoResult<Vec<Package>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM package WHERE {} AND (?1 IS NULL OR form_id = ?1) ORDER BY created_at ASC, id ASC",
        visibility.predicate()
    );
    let packages = sqlx::query_as::<_, Package>(&sql)
        .bind(form_id)
        .fetch_all(executor)
        .await?;
    Ok(packages)
}

pub async fn find_by_id<'e, E: SqliteExecutor<'e>>(
    executor: E,
    id: i64,
    visibility: Visibility,
) -> RepoResult<Option<Package>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM package WHERE id = ? AND {}",
        visibility.predicate()
    );
    let package = sqlx::query_as::<_, Package>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(package)
}

pub async fn find_by_form<'e, E: SqliteExecutor<'e>>(
    executor: E,
    form_id: i64,
    visibility: Visibility,
) -> RepoResult<Vec<Package>> {
    find_all(executor, Some(form_id), visibility).await
}

pub async fn create(pool: &SqlitePool, data: PackageCreate) -> RepoResult<Package> {
    ensure_reference::<Form, _>(pool, data.form_id).await?;
    if data.price < 0.0 {
        return Err(RepoError::Validation("price must not be negative".into()));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO package (id, form_id, merchant_id, package_name, description, price, no_of_pax, availability, boat_fare_enabled, boat_fare_amount, boat_fare_calc_type, gratuity_enabled, gratuity_amount, gratuity_calc_type, deposit_amount, deposit_mode, is_deleted, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, 0, ?17, ?17)",
    )
    .bind(id)
    .bind(data.form_id)
    .bind(&data.merchant_id)
    .bind(&data.package_name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.no_of_pax.unwrap_or(1))
    .bind(data.availability.unwrap_or(true))
    .bind(data.boat_fare_enabled)
    .bind(data.boat_fare_amount)
    .bind(&data.boat_fare_calc_type)
    .bind(data.gratuity_enabled)
    .bind(data.gratuity_amount)
    .bind(&data.gratuity_calc_type)
    .bind(data.deposit_amount)
    .bind(&data.deposit_mode)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id, Visibility::Active)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create package".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: PackageUpdate) -> RepoResult<Package> {
    if data.price.is_some_and(|p| p < 0.0) {
        return Err(RepoError::Validation("price must not be negative".into()));
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE package SET merchant_id = COALESCE(?1, merchant_id), package_name = COALESCE(?2, package_name), description = COALESCE(?3, description), price = COALESCE(?4, price), no_of_pax = COALESCE(?5, no_of_pax), availability = COALESCE(?6, availability), boat_fare_enabled = COALESCE(?7, boat_fare_enabled), boat_fare_amount = COALESCE(?8, boat_fare_amount), boat_fare_calc_type = COALESCE(?9, boat_fare_calc_type), gratuity_enabled = COALESCE(?10, gratuity_enabled), gratuity_amount = COALESCE(?11, gratuity_amount), gratuity_calc_type = COALESCE(?12, gratuity_calc_type), deposit_amount = COALESCE(?13, deposit_amount), deposit_mode = COALESCE(?14, deposit_mode), updated_at = ?15 WHERE id = ?16 AND is_deleted = 0",
    )
    .bind(&data.merchant_id)
    .bind(&data.package_name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.no_of_pax)
    .bind(data.availability)
    .bind(data.boat_fare_enabled)
    .bind(data.boat_fare_amount)
    .bind(&data.boat_fare_calc_type)
    .bind(data.gratuity_enabled)
    .bind(data.gratuity_amount)
    .bind(&data.gratuity_calc_type)
    .bind(data.deposit_amount)
    .bind(&data.deposit_mode)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::not_found::<Package>(id));
    }

    find_by_id(pool, id, Visibility::Active)
        .await?
        .ok_or_else(|| RepoError::not_found::<Package>(id))
}
