//! Order API Handlers

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use serde::Deserialize;

use crate::api::VisibilityQuery;
use crate::core::ServerState;
use crate::db::repository::{RepoError, Visibility, order};
use crate::services::upload::{read_file_field, store_file};
use crate::utils::time::{file_timestamp, today_range_millis};
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    Order, OrderCreate, OrderStatistics, OrderStatusUpdate, OrderUpdate, ReceiptUploaded,
    SoftDeleted, StatusChanged,
};

#[derive(Debug, Deserialize)]
pub struct StatisticsQuery {
    pub form_id: Option<i64>,
    pub merchant_id: Option<String>,
}

fn validate_contact(
    customer_name: Option<&str>,
    email: Option<&str>,
    phone: Option<&str>,
) -> AppResult<()> {
    if let Some(name) = customer_name {
        validate_required_text(name, "customer_name", MAX_NAME_LEN)?;
    }
    if let Some(email) = email {
        validate_required_text(email, "email", MAX_EMAIL_LEN)?;
        if !email.contains('@') {
            return Err(AppError::validation(format!("email '{email}' is not valid")));
        }
    }
    if let Some(phone) = phone {
        validate_required_text(phone, "phone", MAX_SHORT_TEXT_LEN)?;
    }
    Ok(())
}

fn validate_remarks(
    travel_date_remarks: &Option<String>,
    award_remarks: &Option<String>,
    notes: &Option<String>,
) -> AppResult<()> {
    validate_optional_text(travel_date_remarks, "travel_date_remarks", MAX_NOTE_LEN)?;
    validate_optional_text(award_remarks, "award_remarks", MAX_NOTE_LEN)?;
    validate_optional_text(notes, "notes", MAX_NOTE_LEN)?;
    Ok(())
}

/// GET /api/orders
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<VisibilityQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order::find_all(state.pool(), query.visibility()).await?;
    Ok(Json(orders))
}

/// GET /api/orders/form/{form_id}
pub async fn list_by_form(
    State(state): State<ServerState>,
    Path(form_id): Path<i64>,
    Query(query): Query<VisibilityQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order::find_by_form(state.pool(), form_id, query.visibility()).await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id} - order with its active line items
pub async fn get_by_id(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<Order>> {
    let order = order::find_detail(state.pool(), id, Visibility::Active)
        .await?
        .ok_or_else(|| RepoError::not_found::<Order>(id))?;
    Ok(Json(order))
}

/// GET /api/orders/statistics
pub async fn statistics(
    State(state): State<ServerState>,
    Query(query): Query<StatisticsQuery>,
) -> AppResult<Json<OrderStatistics>> {
    let stats = order::statistics(
        state.pool(),
        query.form_id,
        query.merchant_id.as_deref(),
        today_range_millis(),
    )
    .await?;
    Ok(Json(stats))
}

/// POST /api/orders
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    validate_contact(
        Some(&payload.customer_name),
        Some(&payload.email),
        Some(&payload.phone),
    )?;
    validate_remarks(&payload.travel_date_remarks, &payload.award_remarks, &payload.notes)?;

    let order = order::create(state.pool(), payload).await?;
    tracing::info!(
        order_id = order.id,
        reference = %order.reference_number,
        items = order.packages.len(),
        "Order created"
    );
    Ok(Json(order))
}

/// PUT /api/orders/{id} - partial update; `packages`, when sent, replaces the line items
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    if let Some(body_id) = payload.id
        && body_id != id
    {
        return Err(AppError::id_mismatch(id, body_id));
    }
    validate_contact(
        payload.customer_name.as_deref(),
        payload.email.as_deref(),
        payload.phone.as_deref(),
    )?;
    validate_remarks(&payload.travel_date_remarks, &payload.award_remarks, &payload.notes)?;

    let order = order::update(state.pool(), id, payload).await?;
    tracing::info!(order_id = id, "Order updated");
    Ok(Json(order))
}

/// PATCH /api/orders/{id}/status
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<StatusChanged>> {
    let existing = order::find_by_id(state.pool(), id, Visibility::Active)
        .await?
        .ok_or_else(|| RepoError::not_found::<Order>(id))?;
    let previous_status = existing.status;

    if state.config.enforce_status_transitions && !previous_status.can_transition_to(payload.status) {
        return Err(AppError::with_message(
            ErrorCode::InvalidStatusTransition,
            format!("Cannot change order status from {previous_status} to {}", payload.status),
        )
        .with_detail("from", previous_status.as_str())
        .with_detail("to", payload.status.as_str()));
    }

    let updated = order::set_status(state.pool(), id, payload.status).await?;
    tracing::info!(order_id = id, from = %previous_status, to = %updated.status, "Order status changed");
    Ok(Json(StatusChanged {
        id,
        previous_status,
        new_status: updated.status,
        updated_at: updated.updated_at,
    }))
}

/// POST /api/orders/{id}/delete, DELETE /api/orders/{id}
///
/// Soft-deletes the order with its line items, bookings and guests.
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<SoftDeleted>> {
    let mut tx = state.pool().begin().await.map_err(RepoError::from)?;
    let children = order::delete_cascade(&mut tx, id).await?;
    tx.commit().await.map_err(RepoError::from)?;
    tracing::info!(order_id = id, children, "Order soft-deleted");
    Ok(Json(SoftDeleted::new("Order", id)))
}

/// POST /api/orders/{id}/receipt - multipart `file`
pub async fn upload_receipt(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> AppResult<Json<ReceiptUploaded>> {
    if order::find_by_id(state.pool(), id, Visibility::Active).await?.is_none() {
        return Err(RepoError::not_found::<Order>(id).into());
    }

    let file = read_file_field(&mut multipart).await?;
    let stem = format!("{id}_{}", file_timestamp());
    let url = store_file(
        state.blob_store.as_ref(),
        &file,
        &stem,
        state.config.max_upload_bytes,
    )
    .await?;

    let previous = order::set_receipt(state.pool(), id, Some(&url)).await?;
    if let Some(key) = previous.as_deref().and_then(|p| state.blob_store.key_for(p))
        && let Err(e) = state.blob_store.delete(&key).await
    {
        tracing::warn!(order_id = id, key = %key, error = %e, "Failed to remove previous receipt");
    }

    tracing::info!(order_id = id, url = %url, "Receipt uploaded");
    Ok(Json(ReceiptUploaded {
        message: "Receipt uploaded".to_string(),
        image_url: url,
    }))
}

/// DELETE /api/orders/{id}/receipt
pub async fn delete_receipt(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<SoftDeleted>> {
    let existing = order::find_by_id(state.pool(), id, Visibility::Active)
        .await?
        .ok_or_else(|| RepoError::not_found::<Order>(id))?;
    let Some(receipt) = existing.payment_receipt else {
        return Err(AppError::new(ErrorCode::ReceiptNotFound));
    };

    order::set_receipt(state.pool(), id, None).await?;
    if let Some(key) = state.blob_store.key_for(&receipt) {
        state.blob_store.delete(&key).await?;
    }
    tracing::info!(order_id = id, "Receipt removed");
    Ok(Json(SoftDeleted {
        message: "Receipt removed".to_string(),
        id,
    }))
}
