//! Presigned direct-upload handlers.

use axum::extract::{Path, State};
use axum::Json;

use vault_core::types::object::UploadTicket;

use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/contracts/{contract_number}/files/{filename}/upload-ticket
pub async fn request_upload_ticket(
    State(state): State<AppState>,
    Path((contract_number, filename)): Path<(String, String)>,
) -> Result<Json<UploadTicket>, ApiError> {
    let ticket = state
        .staging
        .request_upload(&contract_number, &filename)
        .await?;
    Ok(Json(ticket))
}
