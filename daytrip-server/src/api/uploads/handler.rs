//! Upload API Handlers

use axum::{
    Json,
    extract::{Multipart, State},
};
use serde::Serialize;

use crate::core::ServerState;
use crate::services::upload::{read_file_field, store_file};
use crate::utils::AppResult;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// POST /api/uploads - multipart `file`, stored under a random name
pub async fn upload(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let file = read_file_field(&mut multipart).await?;
    let stem = uuid::Uuid::new_v4().to_string();
    let url = store_file(
        state.blob_store.as_ref(),
        &file,
        &stem,
        state.config.max_upload_bytes,
    )
    .await?;
    Ok(Json(UploadResponse { url }))
}
