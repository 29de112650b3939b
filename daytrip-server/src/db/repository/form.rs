//! Form Repository

use super::{RepoError, RepoResult, Visibility, form_settings, package, soft_delete, soft_delete_children};
use shared::models::{Form, FormCreate, FormSettings, FormStatus, FormUpdate, Package};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

const COLUMNS: &str = "id, title, status, is_default, submission_count, logo_url, logo_name, branding_subtitle, branding_description, is_deleted, created_at, updated_at";

pub async fn find_all<'e, E: SqliteExecutor<'e>>(
    executor: E,
    status: Option<FormStatus>,
    visibility: Visibility,
) -> RepoResult<Vec<Form>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM form WHERE {} AND (?1 IS NULL OR status = ?1) ORDER BY created_at DESC, id DESC",
        visibility.predicate()
    );
    let forms = sqlx::query_as::<_, Form>(&sql)
        .bind(status)
        .fetch_all(executor)
        .await?;
    Ok(forms)
}

pub async fn find_by_id<'e, E: SqliteExecutor<'e>>(
    executor: E,
    id: i64,
    visibility: Visibility,
) -> RepoResult<Option<Form>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM form WHERE id = ? AND {}",
        visibility.predicate()
    );
    let form = sqlx::query_as::<_, Form>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(form)
}

/// Forms with their settings embedded
pub async fn find_all_with_settings(
    pool: &SqlitePool,
    status: Option<FormStatus>,
    visibility: Visibility,
) -> RepoResult<Vec<Form>> {
    let mut forms = find_all(pool, status, visibility).await?;
    for form in &mut forms {
        form.form_settings = form_settings::find_by_form(pool, form.id, Visibility::Active).await?;
    }
    Ok(forms)
}

/// Detail view: settings plus active packages
pub async fn find_detail(pool: &SqlitePool, id: i64, visibility: Visibility) -> RepoResult<Option<Form>> {
    let Some(mut form) = find_by_id(pool, id, visibility).await? else {
        return Ok(None);
    };
    let settings: Option<FormSettings> =
        form_settings::find_by_form(pool, id, Visibility::Active).await?;
    let packages: Vec<Package> = package::find_by_form(pool, id, Visibility::Active).await?;
    form.form_settings = settings;
    form.packages = Some(packages);
    Ok(Some(form))
}

pub async fn create(pool: &SqlitePool, data: FormCreate) -> RepoResult<Form> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO form (id, title, status, is_default, submission_count, logo_url, logo_name, branding_subtitle, branding_description, is_deleted, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6, ?7, ?8, 0, ?9, ?9)",
    )
    .bind(id)
    .bind(&data.title)
    .bind(data.status.unwrap_or_default())
    .bind(data.is_default.unwrap_or(false))
    .bind(&data.logo_url)
    .bind(&data.logo_name)
    .bind(&data.branding_subtitle)
    .bind(&data.branding_description)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id, Visibility::Active)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create form".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: FormUpdate) -> RepoResult<Form> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE form SET title = COALESCE(?1, title), status = COALESCE(?2, status), is_default = COALESCE(?3, is_default), logo_url = COALESCE(?4, logo_url), logo_name = COALESCE(?5, logo_name), branding_subtitle = COALESCE(?6, branding_subtitle), branding_description = COALESCE(?7, branding_description), updated_at = ?8 WHERE id = ?9 AND is_deleted = 0",
    )
    .bind(&data.title)
    .bind(data.status)
    .bind(data.is_default)
    .bind(&data.logo_url)
    .bind(&data.logo_name)
    .bind(&data.branding_subtitle)
    .bind(&data.branding_description)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::not_found::<Form>(id));
    }
    find_by_id(pool, id, Visibility::Active)
        .await?
        .ok_or_else(|| RepoError::not_found::<Form>(id))
}

pub async fn update_status(pool: &SqlitePool, id: i64, status: FormStatus) -> RepoResult<Form> {
    update(
        pool,
        id,
        FormUpdate {
            status: Some(status),
            ..Default::default()
        },
    )
    .await
}

/// Soft-delete a form together with its packages and settings.
/// Returns the number of child rows flipped.
pub async fn delete_cascade(conn: &mut SqliteConnection, id: i64) -> RepoResult<u64> {
    let now = shared::util::now_millis();
    soft_delete::<Form, _>(&mut *conn, id, now).await?;
    let packages = soft_delete_children::<Package, _>(&mut *conn, "form_id", id, now).await?;
    let settings = soft_delete_children::<FormSettings, _>(&mut *conn, "form_id", id, now).await?;
    Ok(packages + settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use shared::models::{FormSettingsUpsert, PackageCreate};

    fn form_create(title: &str) -> FormCreate {
        FormCreate {
            title: title.into(),
            status: None,
            is_default: None,
            logo_url: None,
            logo_name: None,
            branding_subtitle: None,
            branding_description: None,
        }
    }

    #[tokio::test]
    async fn test_create_defaults_to_draft() {
        let pool = test_pool().await;
        let form = create(&pool, form_create("Snorkel trip")).await.unwrap();
        assert_eq!(form.status, FormStatus::Draft);
        assert!(!form.is_default);
        assert_eq!(form.submission_count, 0);
        assert!(!form.is_deleted);
    }

    #[tokio::test]
    async fn test_find_all_filters_status_and_deleted() {
        let pool = test_pool().await;
        let a = create(&pool, form_create("A")).await.unwrap();
        let b = create(&pool, form_create("B")).await.unwrap();
        update_status(&pool, a.id, FormStatus::Active).await.unwrap();

        let active = find_all(&pool, Some(FormStatus::Active), Visibility::Active).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, a.id);

        let mut conn = pool.acquire().await.unwrap();
        delete_cascade(&mut conn, b.id).await.unwrap();
        drop(conn);

        let all = find_all(&pool, None, Visibility::Active).await.unwrap();
        assert_eq!(all.len(), 1);
        let with_deleted = find_all(&pool, None, Visibility::All).await.unwrap();
        assert_eq!(with_deleted.len(), 2);
    }

    #[tokio::test]
    async fn test_update_keeps_unset_fields() {
        let pool = test_pool().await;
        let mut data = form_create("Old title");
        data.logo_url = Some("http://cdn/logo.png".into());
        let form = create(&pool, data).await.unwrap();

        let updated = update(
            &pool,
            form.id,
            FormUpdate {
                title: Some("New title".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.title, "New title");
        assert_eq!(updated.logo_url.as_deref(), Some("http://cdn/logo.png"));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_packages_and_settings() {
        let pool = test_pool().await;
        let form = create(&pool, form_create("Cascade")).await.unwrap();
        package::create(
            &pool,
            PackageCreate {
                form_id: form.id,
                merchant_id: "m1".into(),
                package_name: "Half day".into(),
                description: None,
                price: 120.0,
                no_of_pax: None,
                availability: None,
                boat_fare_enabled: false,
                boat_fare_amount: None,
                boat_fare_calc_type: None,
                gratuity_enabled: false,
                gratuity_amount: None,
                gratuity_calc_type: None,
                deposit_amount: None,
                deposit_mode: None,
            },
        )
        .await
        .unwrap();
        form_settings::upsert(
            &pool,
            FormSettingsUpsert {
                form_id: form.id,
                sales_executives: None,
                tax_id_number: None,
                currency: Some("MYR".into()),
                next_day_cutoff_time: None,
                max_guest_per_day: None,
                deposit_mode: None,
                deposit_amount: None,
                sst_enabled: None,
                sst_percentage: None,
            },
        )
        .await
        .unwrap();

        let detail = find_detail(&pool, form.id, Visibility::Active).await.unwrap().unwrap();
        assert_eq!(detail.packages.as_ref().map(Vec::len), Some(1));
        assert!(detail.form_settings.is_some());

        let mut conn = pool.acquire().await.unwrap();
        let children = delete_cascade(&mut conn, form.id).await.unwrap();
        drop(conn);
        assert_eq!(children, 2);

        assert!(find_detail(&pool, form.id, Visibility::Active).await.unwrap().is_none());
        assert!(package::find_by_form(&pool, form.id, Visibility::Active).await.unwrap().is_empty());
        assert!(form_settings::find_by_form(&pool, form.id, Visibility::Active).await.unwrap().is_none());
    }
}
