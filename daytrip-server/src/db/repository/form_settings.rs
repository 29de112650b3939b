//! Form Settings Repository

use super::{RepoError, RepoResult, Visibility, ensure_reference};
use shared::models::{
    DEFAULT_DEPOSIT_AMOUNT, DEFAULT_SST_PERCENTAGE, Form, FormSettings, FormSettingsUpsert,
};
use sqlx::{SqliteExecutor, SqlitePool};

const COLUMNS: &str = "id, form_id, sales_executives, tax_id_number, currency, next_day_cutoff_time, max_guest_per_day, deposit_mode, deposit_amount, sst_enabled, sst_percentage, is_deleted, created_at, updated_at";

pub async fn find_by_id<'e, E: SqliteExecutor<'e>>(
    executor: E,
    id: i64,
    visibility: Visibility,
) -> RepoResult<Option<FormSettings>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM form_settings WHERE id = ? AND {}",
        visibility.predicate()
    );
    let settings = sqlx::query_as::<_, FormSettings>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(settings)
}

/// The settings row of a form (latest one if several were ever created)
pub async fn find_by_form<'e, E: SqliteExecutor<'e>>(
    executor: E,
    form_id: i64,
    visibility: Visibility,
) -> RepoResult<Option<FormSettings>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM form_settings WHERE form_id = ? AND {} ORDER BY is_deleted ASC, created_at DESC LIMIT 1",
        visibility.predicate()
    );
    let settings = sqlx::query_as::<_, FormSettings>(&sql)
        .bind(form_id)
        .fetch_optional(executor)
        .await?;
    Ok(settings)
}

/// Create the form's settings, or replace every field of the existing row
pub async fn upsert(pool: &SqlitePool, data: FormSettingsUpsert) -> RepoResult<FormSettings> {
    ensure_reference::<Form, _>(pool, data.form_id).await?;

    let now = shared::util::now_millis();
    let deposit_mode = data.deposit_mode.unwrap_or_default();
    let deposit_amount = data.deposit_amount.or(Some(DEFAULT_DEPOSIT_AMOUNT));
    let sst_percentage = data.sst_percentage.or(Some(DEFAULT_SST_PERCENTAGE));
    let sst_enabled = data.sst_enabled.unwrap_or(false);

    let id = match find_by_form(pool, data.form_id, Visibility::Active).await? {
        Some(existing) => {
            sqlx::query(
                "UPDATE form_settings SET sales_executives = ?1, tax_id_number = ?2, currency = ?3, next_day_cutoff_time = ?4, max_guest_per_day = ?5, deposit_mode = ?6, deposit_amount = ?7, sst_enabled = ?8, sst_percentage = ?9, updated_at = ?10 WHERE id = ?11",
            )
            .bind(&data.sales_executives)
            .bind(&data.tax_id_number)
            .bind(&data.currency)
            .bind(&data.next_day_cutoff_time)
            .bind(data.max_guest_per_day)
            .bind(deposit_mode)
            .bind(deposit_amount)
            .bind(sst_enabled)
            .bind(sst_percentage)
            .bind(now)
            .bind(existing.id)
            .execute(pool)
            .await?;
            existing.id
        }
        None => {
            let id = shared::util::snowflake_id();
            sqlx::query(
                "INSERT INTO form_settings (id, form_id, sales_executives, tax_id_number, currency, next_day_cutoff_time, max_guest_per_day, deposit_mode, deposit_amount, sst_enabled, sst_percentage, is_deleted, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 0, ?12, ?12)",
            )
            .bind(id)
            .bind(data.form_id)
            .bind(&data.sales_executives)
            .bind(&data.tax_id_number)
            .bind(&data.currency)
            .bind(&data.next_day_cutoff_time)
            .bind(data.max_guest_per_day)
            .bind(deposit_mode)
            .bind(deposit_amount)
            .bind(sst_enabled)
            .bind(sst_percentage)
            .bind(now)
            .execute(pool)
            .await?;
            id
        }
    };

    find_by_id(pool, id, Visibility::Active)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to save form settings".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{soft_delete, form};
    use crate::db::test_pool;
    use shared::models::{DepositMode, FormCreate};

    fn upsert_payload(form_id: i64) -> FormSettingsUpsert {
        FormSettingsUpsert {
            form_id,
            sales_executives: Some(r#"["Aina","Ben"]"#.into()),
            tax_id_number: None,
            currency: Some("MYR".into()),
            next_day_cutoff_time: Some("18:00".into()),
            max_guest_per_day: Some(40),
            deposit_mode: None,
            deposit_amount: None,
            sst_enabled: None,
            sst_percentage: None,
        }
    }

    async fn seed_form(pool: &SqlitePool) -> i64 {
        form::create(
            pool,
            FormCreate {
                title: "Settings".into(),
                status: None,
                is_default: None,
                logo_url: None,
                logo_name: None,
                branding_subtitle: None,
                branding_description: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_upsert_inserts_with_defaults() {
        let pool = test_pool().await;
        let form_id = seed_form(&pool).await;

        let settings = upsert(&pool, upsert_payload(form_id)).await.unwrap();
        assert_eq!(settings.form_id, form_id);
        assert_eq!(settings.deposit_mode, DepositMode::Fixed);
        assert_eq!(settings.deposit_amount, Some(100.0));
        assert_eq!(settings.sst_percentage, Some(8.0));
        assert!(!settings.sst_enabled);
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_row() {
        let pool = test_pool().await;
        let form_id = seed_form(&pool).await;

        let first = upsert(&pool, upsert_payload(form_id)).await.unwrap();
        let mut payload = upsert_payload(form_id);
        payload.deposit_mode = Some(DepositMode::PerPax);
        payload.deposit_amount = Some(50.0);
        payload.currency = None;
        let second = upsert(&pool, payload).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.deposit_mode, DepositMode::PerPax);
        assert_eq!(second.deposit_amount, Some(50.0));
        assert_eq!(second.currency, None);
    }

    #[tokio::test]
    async fn test_upsert_after_delete_creates_new_row() {
        let pool = test_pool().await;
        let form_id = seed_form(&pool).await;

        let first = upsert(&pool, upsert_payload(form_id)).await.unwrap();
        soft_delete::<FormSettings, _>(&pool, first.id, 1).await.unwrap();
        assert!(find_by_form(&pool, form_id, Visibility::Active).await.unwrap().is_none());

        let second = upsert(&pool, upsert_payload(form_id)).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_upsert_rejects_unknown_form() {
        let pool = test_pool().await;
        let err = upsert(&pool, upsert_payload(12345)).await.unwrap_err();
        assert!(matches!(err, RepoError::InvalidReference(_)));
    }
}
