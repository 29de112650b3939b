//! Order Repository
//!
//! Orders own their line items: create inserts both in one transaction,
//! and an update that carries `packages` reconciles the stored items
//! against the list.

use std::collections::HashSet;

use super::{
    RepoError, RepoResult, Visibility, booking_guest, ensure_reference, order_package,
    soft_delete, soft_delete_children,
};
use crate::utils::money;
use shared::models::{
    Booking, Form, Order, OrderCreate, OrderPackage, OrderPackageInput, OrderStatistics,
    OrderStatus, OrderUpdate,
};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

const COLUMNS: &str = "id, form_id, merchant_id, reference_number, status, sales_executive, salutation, customer_name, email, nationality, country_code, phone, travel_date, payment_method, transaction_ref, subtotal, total_boat_fare, total_gratuity, grand_total, deposit_paid, balance_due, deposit_mode, travel_date_remarks, award_remarks, notes, payment_receipt, is_deleted, created_at, updated_at";

pub async fn find_by_id<'e, E: SqliteExecutor<'e>>(
    executor: E,
    id: i64,
    visibility: Visibility,
) -> RepoResult<Option<Order>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM customer_order WHERE id = ? AND {}",
        visibility.predicate()
    );
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(order)
}

async fn attach_packages(pool: &SqlitePool, orders: &mut [Order]) -> RepoResult<()> {
    for order in orders.iter_mut() {
        order.packages = order_package::find_by_order(pool, order.id, Visibility::Active).await?;
    }
    Ok(())
}

/// All orders, newest first, with active line items
pub async fn find_all(pool: &SqlitePool, visibility: Visibility) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM customer_order WHERE {} ORDER BY created_at DESC, id DESC",
        visibility.predicate()
    );
    let mut orders = sqlx::query_as::<_, Order>(&sql).fetch_all(pool).await?;
    attach_packages(pool, &mut orders).await?;
    Ok(orders)
}

pub async fn find_by_form(
    pool: &SqlitePool,
    form_id: i64,
    visibility: Visibility,
) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM customer_order WHERE form_id = ? AND {} ORDER BY created_at DESC, id DESC",
        visibility.predicate()
    );
    let mut orders = sqlx::query_as::<_, Order>(&sql)
        .bind(form_id)
        .fetch_all(pool)
        .await?;
    attach_packages(pool, &mut orders).await?;
    Ok(orders)
}

/// Single order with active line items
pub async fn find_detail(pool: &SqlitePool, id: i64, visibility: Visibility) -> RepoResult<Option<Order>> {
    let Some(mut order) = find_by_id(pool, id, visibility).await? else {
        return Ok(None);
    };
    order.packages = order_package::find_by_order(pool, id, Visibility::Active).await?;
    Ok(Some(order))
}

async fn validate_items(pool: &SqlitePool, items: &[OrderPackageInput]) -> RepoResult<()> {
    for item in items {
        order_package::validate_item(item)?;
        order_package::ensure_package(pool, item.package_id).await?;
    }
    Ok(())
}

fn validate_totals(values: &[(&str, Option<f64>)]) -> RepoResult<()> {
    for (field, value) in values {
        if let Some(v) = value
            && (!v.is_finite() || *v < 0.0)
        {
            return Err(RepoError::Validation(format!("{field} must not be negative")));
        }
    }
    Ok(())
}

pub async fn create(pool: &SqlitePool, data: OrderCreate) -> RepoResult<Order> {
    validate_totals(&[
        ("subtotal", Some(data.subtotal)),
        ("total_boat_fare", Some(data.total_boat_fare)),
        ("total_gratuity", Some(data.total_gratuity)),
        ("grand_total", Some(data.grand_total)),
        ("deposit_paid", Some(data.deposit_paid)),
        ("balance_due", Some(data.balance_due)),
    ])?;
    ensure_reference::<Form, _>(pool, data.form_id).await?;
    validate_items(pool, &data.packages).await?;

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let reference_number = data
        .reference_number
        .clone()
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| format!("DT{id}"));

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO customer_order (id, form_id, merchant_id, reference_number, status, sales_executive, salutation, customer_name, email, nationality, country_code, phone, travel_date, payment_method, transaction_ref, subtotal, total_boat_fare, total_gratuity, grand_total, deposit_paid, balance_due, deposit_mode, travel_date_remarks, award_remarks, notes, payment_receipt, is_deleted, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, NULL, 0, ?26, ?26)",
    )
    .bind(id)
    .bind(data.form_id)
    .bind(&data.merchant_id)
    .bind(&reference_number)
    .bind(data.status.unwrap_or(OrderStatus::Pending))
    .bind(&data.sales_executive)
    .bind(&data.salutation)
    .bind(&data.customer_name)
    .bind(&data.email)
    .bind(&data.nationality)
    .bind(&data.country_code)
    .bind(&data.phone)
    .bind(&data.travel_date)
    .bind(&data.payment_method)
    .bind(&data.transaction_ref)
    .bind(data.subtotal)
    .bind(data.total_boat_fare)
    .bind(data.total_gratuity)
    .bind(data.grand_total)
    .bind(data.deposit_paid)
    .bind(data.balance_due)
    .bind(&data.deposit_mode)
    .bind(&data.travel_date_remarks)
    .bind(&data.award_remarks)
    .bind(&data.notes)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for item in &data.packages {
        order_package::insert_item(&mut *tx, id, item, now).await?;
    }
    tx.commit().await?;

    find_detail(pool, id, Visibility::Active)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

/// Partial update of the order row; `packages: Some(list)` reconciles line
/// items: matching ids are overwritten, new entries inserted and stored
/// items absent from the list soft-deleted.
pub async fn update(pool: &SqlitePool, id: i64, data: OrderUpdate) -> RepoResult<Order> {
    validate_totals(&[
        ("subtotal", data.subtotal),
        ("total_boat_fare", data.total_boat_fare),
        ("total_gratuity", data.total_gratuity),
        ("grand_total", data.grand_total),
        ("deposit_paid", data.deposit_paid),
        ("balance_due", data.balance_due),
    ])?;
    if let Some(form_id) = data.form_id {
        ensure_reference::<Form, _>(pool, form_id).await?;
    }
    if let Some(items) = &data.packages {
        validate_items(pool, items).await?;
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;
    let rows = sqlx::query(
        "UPDATE customer_order SET form_id = COALESCE(?1, form_id), merchant_id = COALESCE(?2, merchant_id), reference_number = COALESCE(?3, reference_number), status = COALESCE(?4, status), sales_executive = COALESCE(?5, sales_executive), salutation = COALESCE(?6, salutation), customer_name = COALESCE(?7, customer_name), email = COALESCE(?8, email), nationality = COALESCE(?9, nationality), country_code = COALESCE(?10, country_code), phone = COALESCE(?11, phone), travel_date = COALESCE(?12, travel_date), payment_method = COALESCE(?13, payment_method), transaction_ref = COALESCE(?14, transaction_ref), subtotal = COALESCE(?15, subtotal), total_boat_fare = COALESCE(?16, total_boat_fare), total_gratuity = COALESCE(?17, total_gratuity), grand_total = COALESCE(?18, grand_total), deposit_paid = COALESCE(?19, deposit_paid), balance_due = COALESCE(?20, balance_due), deposit_mode = COALESCE(?21, deposit_mode), travel_date_remarks = COALESCE(?22, travel_date_remarks), award_remarks = COALESCE(?23, award_remarks), notes = COALESCE(?24, notes), updated_at = ?25 WHERE id = ?26 AND is_deleted = 0",
    )
    .bind(data.form_id)
    .bind(&data.merchant_id)
    .bind(&data.reference_number)
    .bind(data.status)
    .bind(&data.sales_executive)
    .bind(&data.salutation)
    .bind(&data.customer_name)
    .bind(&data.email)
    .bind(&data.nationality)
    .bind(&data.country_code)
    .bind(&data.phone)
    .bind(&data.travel_date)
    .bind(&data.payment_method)
    .bind(&data.transaction_ref)
    .bind(data.subtotal)
    .bind(data.total_boat_fare)
    .bind(data.total_gratuity)
    .bind(data.grand_total)
    .bind(data.deposit_paid)
    .bind(data.balance_due)
    .bind(&data.deposit_mode)
    .bind(&data.travel_date_remarks)
    .bind(&data.award_remarks)
    .bind(&data.notes)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::not_found::<Order>(id));
    }

    if let Some(items) = &data.packages {
        reconcile_items(&mut tx, id, items, now).await?;
    }
    tx.commit().await?;

    find_detail(pool, id, Visibility::Active)
        .await?
        .ok_or_else(|| RepoError::not_found::<Order>(id))
}

async fn reconcile_items(
    conn: &mut SqliteConnection,
    order_id: i64,
    items: &[OrderPackageInput],
    now: i64,
) -> RepoResult<()> {
    let stored: HashSet<i64> = order_package::find_by_order(&mut *conn, order_id, Visibility::Active)
        .await?
        .into_iter()
        .map(|item| item.id)
        .collect();

    let mut kept = HashSet::new();
    let (mut updated, mut inserted) = (0usize, 0usize);
    for item in items {
        match item.id {
            Some(item_id) if stored.contains(&item_id) => {
                order_package::replace_item(&mut *conn, item_id, item, now).await?;
                kept.insert(item_id);
                updated += 1;
            }
            _ => {
                order_package::insert_item(&mut *conn, order_id, item, now).await?;
                inserted += 1;
            }
        }
    }

    let removed: Vec<i64> = stored.difference(&kept).copied().collect();
    for item_id in &removed {
        soft_delete::<OrderPackage, _>(&mut *conn, *item_id, now).await?;
    }

    tracing::debug!(order_id, updated, inserted, removed = removed.len(), "Order line items reconciled");
    Ok(())
}

/// Overwrite the status of an active order
pub async fn set_status(pool: &SqlitePool, id: i64, status: OrderStatus) -> RepoResult<Order> {
    let rows = sqlx::query("UPDATE customer_order SET status = ?1, updated_at = ?2 WHERE id = ?3 AND is_deleted = 0")
        .bind(status)
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::not_found::<Order>(id));
    }
    find_by_id(pool, id, Visibility::Active)
        .await?
        .ok_or_else(|| RepoError::not_found::<Order>(id))
}

/// Replace the receipt URL of an active order. Returns the previous URL.
pub async fn set_receipt(pool: &SqlitePool, id: i64, receipt: Option<&str>) -> RepoResult<Option<String>> {
    let previous: Option<Option<String>> = sqlx::query_scalar(
        "SELECT payment_receipt FROM customer_order WHERE id = ? AND is_deleted = 0",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    let Some(previous) = previous else {
        return Err(RepoError::not_found::<Order>(id));
    };

    let rows = sqlx::query("UPDATE customer_order SET payment_receipt = ?1, updated_at = ?2 WHERE id = ?3 AND is_deleted = 0")
        .bind(receipt)
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::not_found::<Order>(id));
    }
    Ok(previous)
}

/// Counts and money totals over active orders, optionally narrowed by
/// form and merchant. "Today" is the current local day by `created_at`.
pub async fn statistics(
    pool: &SqlitePool,
    form_id: Option<i64>,
    merchant_id: Option<&str>,
    today: (i64, i64),
) -> RepoResult<OrderStatistics> {
    #[allow(clippy::type_complexity)]
    let row: (i64, f64, f64, f64, i64, f64, i64, i64, i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), \
                COALESCE(SUM(grand_total), 0.0), \
                COALESCE(SUM(deposit_paid), 0.0), \
                COALESCE(SUM(balance_due), 0.0), \
                COALESCE(SUM(CASE WHEN created_at >= ?3 AND created_at < ?4 THEN 1 ELSE 0 END), 0), \
                COALESCE(SUM(CASE WHEN created_at >= ?3 AND created_at < ?4 THEN grand_total ELSE 0.0 END), 0.0), \
                COALESCE(SUM(CASE WHEN status = 'pending' THEN 1 ELSE 0 END), 0), \
                COALESCE(SUM(CASE WHEN status = 'confirmed' THEN 1 ELSE 0 END), 0), \
                COALESCE(SUM(CASE WHEN status = 'completed' THEN 1 ELSE 0 END), 0), \
                COALESCE(SUM(CASE WHEN status = 'cancelled' THEN 1 ELSE 0 END), 0) \
         FROM customer_order \
         WHERE is_deleted = 0 AND (?1 IS NULL OR form_id = ?1) AND (?2 IS NULL OR merchant_id = ?2)",
    )
    .bind(form_id)
    .bind(merchant_id)
    .bind(today.0)
    .bind(today.1)
    .fetch_one(pool)
    .await?;

    let round = |v: f64| money::to_f64(money::to_decimal(v));
    Ok(OrderStatistics {
        total_orders: row.0,
        total_revenue: round(row.1),
        total_deposits: round(row.2),
        outstanding_balance: round(row.3),
        today_orders: row.4,
        today_revenue: round(row.5),
        pending_count: row.6,
        confirmed_count: row.7,
        completed_count: row.8,
        cancelled_count: row.9,
    })
}

/// Soft-delete an order with its line items, bookings and their guests.
/// Returns the number of child rows flipped.
pub async fn delete_cascade(conn: &mut SqliteConnection, id: i64) -> RepoResult<u64> {
    let now = shared::util::now_millis();
    soft_delete::<Order, _>(&mut *conn, id, now).await?;
    let items = soft_delete_children::<OrderPackage, _>(&mut *conn, "order_id", id, now).await?;
    let guests = booking_guest::soft_delete_by_order(&mut *conn, id, now).await?;
    let bookings = soft_delete_children::<Booking, _>(&mut *conn, "order_id", id, now).await?;
    tracing::debug!(order_id = id, items, bookings, guests, "Order cascade soft-delete");
    Ok(items + bookings + guests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::booking;
    use crate::db::repository::order_package::tests::item;
    use crate::db::test_pool;

    async fn seed_form_and_package(pool: &SqlitePool) -> (i64, i64) {
        let now = shared::util::now_millis();
        let form_id = shared::util::snowflake_id();
        let package_id = shared::util::snowflake_id();
        sqlx::query("INSERT INTO form (id, title, created_at, updated_at) VALUES (?, 'Trip', ?, ?)")
            .bind(form_id)
            .bind(now)
            .bind(now)
            .execute(pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO package (id, form_id, package_name, price, created_at, updated_at) VALUES (?, ?, 'Reef', 80.0, ?, ?)")
            .bind(package_id)
            .bind(form_id)
            .bind(now)
            .bind(now)
            .execute(pool)
            .await
            .unwrap();
        (form_id, package_id)
    }

    fn order_create(form_id: i64, packages: Vec<OrderPackageInput>) -> OrderCreate {
        OrderCreate {
            form_id,
            merchant_id: "m-1".into(),
            reference_number: None,
            status: None,
            sales_executive: None,
            salutation: Some("Ms".into()),
            customer_name: "Aina".into(),
            email: "aina@example.com".into(),
            nationality: None,
            country_code: "+60".into(),
            phone: "0123456789".into(),
            travel_date: Some("2024-06-01".into()),
            payment_method: None,
            transaction_ref: None,
            subtotal: 160.0,
            total_boat_fare: 0.0,
            total_gratuity: 0.0,
            grand_total: 160.0,
            deposit_paid: 100.0,
            balance_due: 60.0,
            deposit_mode: None,
            travel_date_remarks: None,
            award_remarks: None,
            notes: None,
            packages,
        }
    }

    #[tokio::test]
    async fn test_create_with_packages() {
        let pool = test_pool().await;
        let (form_id, package_id) = seed_form_and_package(&pool).await;

        let order = create(&pool, order_create(form_id, vec![item(package_id, 80.0, Some(2))]))
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.reference_number, format!("DT{}", order.id));
        assert_eq!(order.packages.len(), 1);
        assert_eq!(order.packages[0].line_total, 160.0);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_package_without_writing() {
        let pool = test_pool().await;
        let (form_id, package_id) = seed_form_and_package(&pool).await;

        let err = create(&pool, order_create(form_id, vec![item(package_id + 7, 80.0, None)]))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::InvalidReference(_)));
        assert!(find_all(&pool, Visibility::All).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_reconciles_line_items() {
        let pool = test_pool().await;
        let (form_id, package_id) = seed_form_and_package(&pool).await;
        let order = create(
            &pool,
            order_create(
                form_id,
                vec![item(package_id, 80.0, Some(1)), item(package_id, 20.0, Some(1))],
            ),
        )
        .await
        .unwrap();
        let keep = order.packages[0].id;
        let drop_id = order.packages[1].id;

        let mut kept_item = item(package_id, 90.0, Some(2));
        kept_item.id = Some(keep);
        let mut stale_id_item = item(package_id, 5.0, None);
        stale_id_item.id = Some(999);

        let updated = update(
            &pool,
            order.id,
            OrderUpdate {
                customer_name: Some("Aina Binti".into()),
                packages: Some(vec![kept_item, stale_id_item]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.customer_name, "Aina Binti");
        assert_eq!(updated.email, "aina@example.com");
        assert_eq!(updated.packages.len(), 2);
        let kept = updated.packages.iter().find(|p| p.id == keep).unwrap();
        assert_eq!(kept.line_total, 180.0);
        assert!(updated.packages.iter().all(|p| p.id != drop_id && p.id != 999));

        let all = order_package::find_by_order(&pool, order.id, Visibility::All).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_update_without_packages_keeps_items() {
        let pool = test_pool().await;
        let (form_id, package_id) = seed_form_and_package(&pool).await;
        let order = create(&pool, order_create(form_id, vec![item(package_id, 80.0, None)]))
            .await
            .unwrap();

        let updated = update(
            &pool,
            order.id,
            OrderUpdate {
                notes: Some("Window seat".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.packages.len(), 1);
        assert_eq!(updated.notes.as_deref(), Some("Window seat"));
    }

    #[tokio::test]
    async fn test_statistics_skip_deleted_orders() {
        let pool = test_pool().await;
        let (form_id, _) = seed_form_and_package(&pool).await;
        let a = create(&pool, order_create(form_id, vec![])).await.unwrap();
        let b = create(&pool, order_create(form_id, vec![])).await.unwrap();
        let c = create(&pool, order_create(form_id, vec![])).await.unwrap();
        set_status(&pool, b.id, OrderStatus::Confirmed).await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        delete_cascade(&mut conn, c.id).await.unwrap();
        drop(conn);

        let stats = statistics(&pool, Some(form_id), None, (0, i64::MAX)).await.unwrap();
        assert_eq!(stats.total_orders, 2);
        assert_eq!(stats.total_revenue, 320.0);
        assert_eq!(stats.total_deposits, 200.0);
        assert_eq!(stats.outstanding_balance, 120.0);
        assert_eq!(stats.today_orders, 2);
        assert_eq!(stats.pending_count, 1);
        assert_eq!(stats.confirmed_count, 1);

        let none = statistics(&pool, Some(form_id), Some("other"), (0, i64::MAX)).await.unwrap();
        assert_eq!(none, OrderStatistics::default());
        assert!(find_by_id(&pool, a.id, Visibility::Active).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_cascades_to_bookings_and_guests() {
        let pool = test_pool().await;
        let (form_id, package_id) = seed_form_and_package(&pool).await;
        let order = create(&pool, order_create(form_id, vec![item(package_id, 80.0, None)]))
            .await
            .unwrap();

        let now = shared::util::now_millis();
        let booking_id = shared::util::snowflake_id();
        sqlx::query("INSERT INTO booking (id, order_id, booking_date, pax_count, created_at, updated_at) VALUES (?, ?, '2024-06-01', 1, ?, ?)")
            .bind(booking_id)
            .bind(order.id)
            .bind(now)
            .bind(now)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO booking_guest (id, booking_id, full_name, ic_number, created_at) VALUES (?, ?, 'Aina', '900101', ?)")
            .bind(shared::util::snowflake_id())
            .bind(booking_id)
            .bind(now)
            .execute(&pool)
            .await
            .unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let children = delete_cascade(&mut conn, order.id).await.unwrap();
        drop(conn);
        assert_eq!(children, 3);

        assert!(find_detail(&pool, order.id, Visibility::Active).await.unwrap().is_none());
        assert!(booking::find_all(&pool, None, Some(order.id), Visibility::Active).await.unwrap().is_empty());
        assert_eq!(booking_guest::count_active(&pool, booking_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_set_receipt_returns_previous() {
        let pool = test_pool().await;
        let (form_id, _) = seed_form_and_package(&pool).await;
        let order = create(&pool, order_create(form_id, vec![])).await.unwrap();

        assert_eq!(set_receipt(&pool, order.id, Some("http://img/1.png")).await.unwrap(), None);
        assert_eq!(
            set_receipt(&pool, order.id, None).await.unwrap().as_deref(),
            Some("http://img/1.png")
        );
        let err = set_receipt(&pool, 42, None).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound { resource: "Order", .. }));
    }
}
