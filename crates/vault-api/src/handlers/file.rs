//! File lifecycle handlers: create, update, get, list, versions, delete.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use vault_core::error::AppError;
use vault_registry::resolver::{FileSummary, VersionInfo};
use vault_registry::service::FileContent;

use crate::dto::request::{UpdateFileRequest, VersionQuery, WriteFileRequest};
use crate::dto::response::{MessageResponse, WriteFileResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/contracts/{contract_number}/files
pub async fn create_file(
    State(state): State<AppState>,
    Path(contract_number): Path<String>,
    Json(body): Json<WriteFileRequest>,
) -> Result<(StatusCode, Json<WriteFileResponse>), ApiError> {
    body.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let created = state.registry.create(&contract_number, body.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(WriteFileResponse {
            message: "File created.".to_string(),
            version_id: created.version_id,
        }),
    ))
}

/// PUT /api/contracts/{contract_number}/files/{filename}
pub async fn update_file(
    State(state): State<AppState>,
    Path((contract_number, filename)): Path<(String, String)>,
    Json(body): Json<UpdateFileRequest>,
) -> Result<(StatusCode, Json<WriteFileResponse>), ApiError> {
    body.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let created = state
        .registry
        .update(&contract_number, body.into_payload(&filename))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(WriteFileResponse {
            message: "File updated.".to_string(),
            version_id: created.version_id,
        }),
    ))
}

/// GET /api/contracts/{contract_number}/files/{filename}?version_id=
pub async fn get_file(
    State(state): State<AppState>,
    Path((contract_number, filename)): Path<(String, String)>,
    Query(query): Query<VersionQuery>,
) -> Result<Json<FileContent>, ApiError> {
    let content = state
        .registry
        .get(&contract_number, &filename, query.version_id.as_deref())
        .await?;
    Ok(Json(content))
}

/// GET /api/contracts/{contract_number}/files
pub async fn list_files(
    State(state): State<AppState>,
    Path(contract_number): Path<String>,
) -> Result<Json<Vec<FileSummary>>, ApiError> {
    let files = state.registry.list(&contract_number).await?;
    Ok(Json(files))
}

/// GET /api/contracts/{contract_number}/files/{filename}/versions
pub async fn list_file_versions(
    State(state): State<AppState>,
    Path((contract_number, filename)): Path<(String, String)>,
) -> Result<Json<Vec<VersionInfo>>, ApiError> {
    let versions = state
        .registry
        .list_versions(&contract_number, &filename)
        .await?;
    Ok(Json(versions))
}

/// DELETE /api/contracts/{contract_number}/files/{filename}?version_id=
pub async fn delete_file(
    State(state): State<AppState>,
    Path((contract_number, filename)): Path<(String, String)>,
    Query(query): Query<VersionQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .registry
        .delete(&contract_number, &filename, query.version_id.as_deref())
        .await?;
    Ok(Json(MessageResponse::new("File deleted.")))
}
