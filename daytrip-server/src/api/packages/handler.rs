//! Package API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::VisibilityQuery;
use crate::core::ServerState;
use crate::db::repository::{RepoError, Visibility, package, soft_delete};
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_amount,
    validate_optional_text, validate_required_text,
};
use shared::models::{Package, PackageCreate, PackageUpdate, SoftDeleted};

#[derive(Debug, Deserialize)]
pub struct PackageListQuery {
    pub form_id: Option<i64>,
    #[serde(default)]
    pub include_deleted: bool,
}

fn validate_optional_amounts(amounts: &[(&str, Option<f64>)]) -> AppResult<()> {
    for (field, value) in amounts {
        if let Some(v) = value {
            validate_amount(*v, field)?;
        }
    }
    Ok(())
}

/// GET /api/packages
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PackageListQuery>,
) -> AppResult<Json<Vec<Package>>> {
    let visibility = Visibility::from_include_deleted(query.include_deleted);
    let packages = package::find_all(state.pool(), query.form_id, visibility).await?;
    Ok(Json(packages))
}

/// GET /api/packages/form/{form_id}
pub async fn list_by_form(
    State(state): State<ServerState>,
    Path(form_id): Path<i64>,
    Query(query): Query<VisibilityQuery>,
) -> AppResult<Json<Vec<Package>>> {
    let packages = package::find_by_form(state.pool(), form_id, query.visibility()).await?;
    Ok(Json(packages))
}

/// GET /api/packages/{id}
pub async fn get_by_id(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<Package>> {
    let package = package::find_by_id(state.pool(), id, Visibility::Active)
        .await?
        .ok_or_else(|| RepoError::not_found::<Package>(id))?;
    Ok(Json(package))
}

/// POST /api/packages
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<PackageCreate>,
) -> AppResult<Json<Package>> {
    validate_required_text(&payload.package_name, "package_name", MAX_NAME_LEN)?;
    if !payload.merchant_id.is_empty() {
        validate_required_text(&payload.merchant_id, "merchant_id", MAX_SHORT_TEXT_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_amount(payload.price, "price")?;
    validate_optional_amounts(&[
        ("boat_fare_amount", payload.boat_fare_amount),
        ("gratuity_amount", payload.gratuity_amount),
        ("deposit_amount", payload.deposit_amount),
    ])?;

    let package = package::create(state.pool(), payload).await?;
    tracing::info!(package_id = package.id, form_id = package.form_id, "Package created");
    Ok(Json(package))
}

/// POST /api/packages/{id}/update
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<PackageUpdate>,
) -> AppResult<Json<Package>> {
    if let Some(name) = &payload.package_name {
        validate_required_text(name, "package_name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.merchant_id, "merchant_id", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_amounts(&[
        ("price", payload.price),
        ("boat_fare_amount", payload.boat_fare_amount),
        ("gratuity_amount", payload.gratuity_amount),
        ("deposit_amount", payload.deposit_amount),
    ])?;

    let package = package::update(state.pool(), id, payload).await?;
    Ok(Json(package))
}

/// POST /api/packages/{id}/delete
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<SoftDeleted>> {
    soft_delete::<Package, _>(state.pool(), id, shared::util::now_millis()).await?;
    tracing::info!(package_id = id, "Package soft-deleted");
    Ok(Json(SoftDeleted::new("Package", id)))
}
