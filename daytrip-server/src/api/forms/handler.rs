//! Form API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::{RepoError, Visibility, form};
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_LOGO_NAME_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{
    Form, FormCreate, FormStatus, FormStatusChanged, FormStatusUpdate, FormUpdate, SoftDeleted,
};

#[derive(Debug, Deserialize)]
pub struct FormListQuery {
    pub status: Option<FormStatus>,
    #[serde(default)]
    pub include_deleted: bool,
}

fn validate_branding(
    logo_url: &Option<String>,
    logo_name: &Option<String>,
    subtitle: &Option<String>,
    description: &Option<String>,
) -> AppResult<()> {
    validate_optional_text(logo_url, "logo_url", MAX_URL_LEN)?;
    validate_optional_text(logo_name, "logo_name", MAX_LOGO_NAME_LEN)?;
    validate_optional_text(subtitle, "branding_subtitle", MAX_NOTE_LEN)?;
    validate_optional_text(description, "branding_description", MAX_DESCRIPTION_LEN)?;
    Ok(())
}

/// GET /api/forms - forms with their settings
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<FormListQuery>,
) -> AppResult<Json<Vec<Form>>> {
    let visibility = Visibility::from_include_deleted(query.include_deleted);
    let forms = form::find_all_with_settings(state.pool(), query.status, visibility).await?;
    Ok(Json(forms))
}

/// GET /api/forms/{id} - form with settings and packages
pub async fn get_by_id(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<Form>> {
    let form = form::find_detail(state.pool(), id, Visibility::Active)
        .await?
        .ok_or_else(|| RepoError::not_found::<Form>(id))?;
    Ok(Json(form))
}

/// POST /api/forms
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<FormCreate>,
) -> AppResult<Json<Form>> {
    validate_required_text(&payload.title, "title", MAX_NAME_LEN)?;
    validate_branding(
        &payload.logo_url,
        &payload.logo_name,
        &payload.branding_subtitle,
        &payload.branding_description,
    )?;
    let form = form::create(state.pool(), payload).await?;
    tracing::info!(form_id = form.id, title = %form.title, "Form created");
    Ok(Json(form))
}

/// POST /api/forms/{id}/update
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<FormUpdate>,
) -> AppResult<Json<Form>> {
    if let Some(body_id) = payload.id
        && body_id != id
    {
        return Err(AppError::id_mismatch(id, body_id));
    }
    if let Some(title) = &payload.title {
        validate_required_text(title, "title", MAX_NAME_LEN)?;
    }
    validate_branding(
        &payload.logo_url,
        &payload.logo_name,
        &payload.branding_subtitle,
        &payload.branding_description,
    )?;
    let form = form::update(state.pool(), id, payload).await?;
    Ok(Json(form))
}

/// POST /api/forms/{id}/status
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<FormStatusUpdate>,
) -> AppResult<Json<FormStatusChanged>> {
    let form = form::update_status(state.pool(), id, payload.status).await?;
    tracing::info!(form_id = id, status = ?form.status, "Form status changed");
    Ok(Json(FormStatusChanged {
        form_id: form.id,
        new_status: form.status,
    }))
}

/// POST /api/forms/{id}/delete - soft-delete with packages and settings
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<SoftDeleted>> {
    let mut tx = state.pool().begin().await.map_err(RepoError::from)?;
    let children = form::delete_cascade(&mut tx, id).await?;
    tx.commit().await.map_err(RepoError::from)?;
    tracing::info!(form_id = id, children, "Form soft-deleted");
    Ok(Json(SoftDeleted::new("Form", id)))
}
