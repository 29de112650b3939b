//! Order Package Repository (order line items)

use super::{RepoError, RepoResult, SoftDelete, Visibility, ensure_reference, exists};
use crate::utils::money;
use shared::models::{
    Order, OrderPackage, OrderPackageCreate, OrderPackageInput, OrderPackageUpdate, Package,
};
use sqlx::{SqliteExecutor, SqlitePool};

const COLUMNS: &str = "id, order_id, package_id, package_name, quantity, unit_price, no_of_pax, boat_fare_enabled, boat_fare_amount, boat_fare_calc_type, gratuity_enabled, gratuity_amount, gratuity_calc_type, line_total, is_deleted, created_at, updated_at";

pub async fn find_all<'e, E: SqliteExecutor<'e>>(
    executor: E,
    visibility: Visibility,
) -> RepoResult<Vec<OrderPackage>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM order_package WHERE {} ORDER BY created_at DESC, id DESC",
        visibility.predicate()
    );
    let items = sqlx::query_as::<_, OrderPackage>(&sql)
        .fetch_all(executor)
        .await?;
    Ok(items)
}

pub async fn find_by_id<'e, E: SqliteExecutor<'e>>(
    executor: E,
    id: i64,
    visibility: Visibility,
) -> RepoResult<Option<OrderPackage>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM order_package WHERE id = ? AND {}",
        visibility.predicate()
    );
    let item = sqlx::query_as::<_, OrderPackage>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(item)
}

pub async fn find_by_order<'e, E: SqliteExecutor<'e>>(
    executor: E,
    order_id: i64,
    visibility: Visibility,
) -> RepoResult<Vec<OrderPackage>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM order_package WHERE order_id = ? AND {} ORDER BY created_at ASC, id ASC",
        visibility.predicate()
    );
    let items = sqlx::query_as::<_, OrderPackage>(&sql)
        .bind(order_id)
        .fetch_all(executor)
        .await?;
    Ok(items)
}

/// Line items must name a package that was created at some point.
/// Soft-deleted packages are accepted: the line item keeps its own snapshot
/// of name and prices.
pub async fn ensure_package<'e, E: SqliteExecutor<'e>>(executor: E, package_id: i64) -> RepoResult<()> {
    if exists::<Package, _>(executor, package_id, Visibility::All).await? {
        Ok(())
    } else {
        Err(RepoError::InvalidReference(format!(
            "{} {package_id} does not exist",
            Package::RESOURCE
        )))
    }
}

pub fn validate_item(item: &OrderPackageInput) -> RepoResult<()> {
    if item.quantity.is_some_and(|q| q < 1) {
        return Err(RepoError::Validation("quantity must be at least 1".into()));
    }
    if !item.unit_price.is_finite() || item.unit_price < 0.0 {
        return Err(RepoError::Validation("unit_price must not be negative".into()));
    }
    if item.no_of_pax < 0 {
        return Err(RepoError::Validation("no_of_pax must not be negative".into()));
    }
    Ok(())
}

fn resolved_line_total(item: &OrderPackageInput, quantity: i64) -> f64 {
    item.line_total
        .unwrap_or_else(|| money::line_total(item.unit_price, quantity))
}

/// Insert one line item under `order_id`. Returns the new id.
pub async fn insert_item<'e, E: SqliteExecutor<'e>>(
    executor: E,
    order_id: i64,
    item: &OrderPackageInput,
    now: i64,
) -> RepoResult<i64> {
    let id = shared::util::snowflake_id();
    let quantity = item.quantity.unwrap_or(1);
    sqlx::query(
        "INSERT INTO order_package (id, order_id, package_id, package_name, quantity, unit_price, no_of_pax, boat_fare_enabled, boat_fare_amount, boat_fare_calc_type, gratuity_enabled, gratuity_amount, gratuity_calc_type, line_total, is_deleted, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, 0, ?15, ?15)",
    )
    .bind(id)
    .bind(order_id)
    .bind(item.package_id)
    .bind(&item.package_name)
    .bind(quantity)
    .bind(item.unit_price)
    .bind(item.no_of_pax)
    .bind(item.boat_fare_enabled)
    .bind(item.boat_fare_amount)
    .bind(&item.boat_fare_calc_type)
    .bind(item.gratuity_enabled)
    .bind(item.gratuity_amount)
    .bind(&item.gratuity_calc_type)
    .bind(resolved_line_total(item, quantity))
    .bind(now)
    .execute(executor)
    .await?;
    Ok(id)
}

/// Overwrite a stored line item with the values sent in an order payload
pub async fn replace_item<'e, E: SqliteExecutor<'e>>(
    executor: E,
    id: i64,
    item: &OrderPackageInput,
    now: i64,
) -> RepoResult<()> {
    let quantity = item.quantity.unwrap_or(1);
    let rows = sqlx::query(
        "UPDATE order_package SET package_id = ?1, package_name = ?2, quantity = ?3, unit_price = ?4, no_of_pax = ?5, boat_fare_enabled = ?6, boat_fare_amount = ?7, boat_fare_calc_type = ?8, gratuity_enabled = ?9, gratuity_amount = ?10, gratuity_calc_type = ?11, line_total = ?12, updated_at = ?13 WHERE id = ?14 AND is_deleted = 0",
    )
    .bind(item.package_id)
    .bind(&item.package_name)
    .bind(quantity)
    .bind(item.unit_price)
    .bind(item.no_of_pax)
    .bind(item.boat_fare_enabled)
    .bind(item.boat_fare_amount)
    .bind(&item.boat_fare_calc_type)
    .bind(item.gratuity_enabled)
    .bind(item.gratuity_amount)
    .bind(&item.gratuity_calc_type)
    .bind(resolved_line_total(item, quantity))
    .bind(now)
    .bind(id)
    .execute(executor)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::not_found::<OrderPackage>(id));
    }
    Ok(())
}

/// Standalone line item creation; the order must be active
pub async fn create(pool: &SqlitePool, data: OrderPackageCreate) -> RepoResult<OrderPackage> {
    validate_item(&data.item)?;
    ensure_reference::<Order, _>(pool, data.order_id).await?;
    ensure_package(pool, data.item.package_id).await?;

    let id = insert_item(pool, data.order_id, &data.item, shared::util::now_millis()).await?;
    find_by_id(pool, id, Visibility::Active)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order package".into()))
}

/// Partial update. When `unit_price` or `quantity` changes without an
/// explicit `line_total`, the line total is recomputed.
pub async fn update(pool: &SqlitePool, id: i64, data: OrderPackageUpdate) -> RepoResult<OrderPackage> {
    let Some(existing) = find_by_id(pool, id, Visibility::Active).await? else {
        return Err(RepoError::not_found::<OrderPackage>(id));
    };
    if data.quantity.is_some_and(|q| q < 1) {
        return Err(RepoError::Validation("quantity must be at least 1".into()));
    }
    if data.unit_price.is_some_and(|p| !p.is_finite() || p < 0.0) {
        return Err(RepoError::Validation("unit_price must not be negative".into()));
    }
    if let Some(package_id) = data.package_id {
        ensure_package(pool, package_id).await?;
    }

    let line_total = match (data.line_total, data.unit_price, data.quantity) {
        (Some(total), _, _) => Some(total),
        (None, None, None) => None,
        (None, price, qty) => Some(money::line_total(
            price.unwrap_or(existing.unit_price),
            qty.unwrap_or(existing.quantity),
        )),
    };

    let rows = sqlx::query(
        "UPDATE order_package SET package_id = COALESCE(?1, package_id), package_name = COALESCE(?2, package_name), quantity = COALESCE(?3, quantity), unit_price = COALESCE(?4, unit_price), no_of_pax = COALESCE(?5, no_of_pax), boat_fare_enabled = COALESCE(?6, boat_fare_enabled), boat_fare_amount = COALESCE(?7, boat_fare_amount), boat_fare_calc_type = COALESCE(?8, boat_fare_calc_type), gratuity_enabled = COALESCE(?9, gratuity_enabled), gratuity_amount = COALESCE(?10, gratuity_amount), gratuity_calc_type = COALESCE(?11, gratuity_calc_type), line_total = COALESCE(?12, line_total), updated_at = ?13 WHERE id = ?14 AND is_deleted = 0",
    )
    .bind(data.package_id)
    .bind(&data.package_name)
    .bind(data.quantity)
    .bind(data.unit_price)
    .bind(data.no_of_pax)
    .bind(data.boat_fare_enabled)
    .bind(data.boat_fare_amount)
    .bind(&data.boat_fare_calc_type)
    .bind(data.gratuity_enabled)
    .bind(data.gratuity_amount)
    .bind(&data.gratuity_calc_type)
    .bind(line_total)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::not_found::<OrderPackage>(id));
    }

    find_by_id(pool, id, Visibility::Active)
        .await?
        .ok_or_else(|| RepoError::not_found::<OrderPackage>(id))
}
