//! Data preview handler.

use axum::{Json, extract::Multipart, extract::State};
use mailsift::Preview;

use super::read_upload;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Header and first rows of an uploaded file. The oracle is not consulted.
pub async fn preview_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Preview>, ApiError> {
    let upload = read_upload(multipart).await?;
    let mailsift = state.mailsift.clone();

    let preview = tokio::task::spawn_blocking(move || {
        mailsift.preview(upload.kind, &upload.bytes, None)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Preview task failed: {}", e)))??;

    Ok(Json(preview))
}
