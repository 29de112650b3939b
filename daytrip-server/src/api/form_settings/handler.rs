//! Form Settings API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::{Visibility, form_settings, soft_delete};
use crate::utils::validation::{MAX_SHORT_TEXT_LEN, validate_amount, validate_optional_text};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{FormSettings, FormSettingsUpsert, SoftDeleted};

/// GET /api/formsettings/form/{form_id}
pub async fn get_by_form(
    State(state): State<ServerState>,
    Path(form_id): Path<i64>,
) -> AppResult<Json<FormSettings>> {
    let settings = form_settings::find_by_form(state.pool(), form_id, Visibility::Active)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::FormSettingsNotFound,
                format!("Settings for form {form_id} not found"),
            )
        })?;
    Ok(Json(settings))
}

/// POST|PUT /api/formsettings - create or replace the form's settings
pub async fn upsert(
    State(state): State<ServerState>,
    Json(payload): Json<FormSettingsUpsert>,
) -> AppResult<Json<FormSettings>> {
    validate_optional_text(&payload.tax_id_number, "tax_id_number", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.currency, "currency", MAX_SHORT_TEXT_LEN)?;
    if let Some(amount) = payload.deposit_amount {
        validate_amount(amount, "deposit_amount")?;
    }
    if let Some(pct) = payload.sst_percentage
        && !(0.0..=100.0).contains(&pct)
    {
        return Err(AppError::validation("sst_percentage must be between 0 and 100"));
    }
    if payload.max_guest_per_day.is_some_and(|n| n < 0) {
        return Err(AppError::validation("max_guest_per_day must not be negative"));
    }

    let settings = form_settings::upsert(state.pool(), payload).await?;
    tracing::info!(form_id = settings.form_id, settings_id = settings.id, "Form settings saved");
    Ok(Json(settings))
}

/// POST /api/formsettings/{id}/delete, DELETE /api/formsettings/{id}
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<SoftDeleted>> {
    soft_delete::<FormSettings, _>(state.pool(), id, shared::util::now_millis()).await?;
    tracing::info!(settings_id = id, "Form settings soft-deleted");
    Ok(Json(SoftDeleted::new("Form settings", id)))
}
