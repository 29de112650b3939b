//! Order Package API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::VisibilityQuery;
use crate::core::ServerState;
use crate::db::repository::{RepoError, Visibility, order_package, soft_delete};
use crate::utils::AppResult;
use shared::models::{OrderPackage, OrderPackageCreate, OrderPackageUpdate, SoftDeleted};

/// GET /api/orderpackages
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<VisibilityQuery>,
) -> AppResult<Json<Vec<OrderPackage>>> {
    let items = order_package::find_all(state.pool(), query.visibility()).await?;
    Ok(Json(items))
}

/// GET /api/orderpackages/by-order/{order_id}
pub async fn list_by_order(
    State(state): State<ServerState>,
    Path(order_id): Path<i64>,
    Query(query): Query<VisibilityQuery>,
) -> AppResult<Json<Vec<OrderPackage>>> {
    let items = order_package::find_by_order(state.pool(), order_id, query.visibility()).await?;
    Ok(Json(items))
}

/// GET /api/orderpackages/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderPackage>> {
    let item = order_package::find_by_id(state.pool(), id, Visibility::Active)
        .await?
        .ok_or_else(|| RepoError::not_found::<OrderPackage>(id))?;
    Ok(Json(item))
}

/// POST /api/orderpackages
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderPackageCreate>,
) -> AppResult<Json<OrderPackage>> {
    let item = order_package::create(state.pool(), payload).await?;
    tracing::debug!(item_id = item.id, order_id = item.order_id, "Order package created");
    Ok(Json(item))
}

/// POST /api/orderpackages/{id}/update
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderPackageUpdate>,
) -> AppResult<Json<OrderPackage>> {
    let item = order_package::update(state.pool(), id, payload).await?;
    Ok(Json(item))
}

/// POST /api/orderpackages/{id}/delete
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<SoftDeleted>> {
    soft_delete::<OrderPackage, _>(state.pool(), id, shared::util::now_millis()).await?;
    Ok(Json(SoftDeleted::new("Order package", id)))
}
