//! Archive (dismiss) handlers.

use axum::extract::{Path, State};
use axum::Json;

use crate::dto::request::VersionQuery;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/contracts/{contract_number}/files/{filename}/archive
///
/// With a `{"version_id": ...}` body archives that one version; without a
/// body archives every active version of the file.
pub async fn archive_file(
    State(state): State<AppState>,
    Path((contract_number, filename)): Path<(String, String)>,
    body: Option<Json<VersionQuery>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let version_id = body.and_then(|Json(q)| q.version_id);
    let data = match version_id {
        Some(version_id) => {
            let archived = state
                .registry
                .dismiss_version(&contract_number, &filename, &version_id)
                .await?;
            serde_json::to_value(archived).map_err(vault_core::error::AppError::from)?
        }
        None => {
            let report = state
                .registry
                .dismiss_file(&contract_number, &filename)
                .await?;
            serde_json::to_value(report).map_err(vault_core::error::AppError::from)?
        }
    };
    Ok(Json(serde_json::json!({
        "message": "File updated succesfully.",
        "data": data,
    })))
}

/// POST /api/contracts/{contract_number}/archive
///
/// Archives every active version of every file in the contract.
pub async fn archive_contract(
    State(state): State<AppState>,
    Path(contract_number): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let report = state.registry.dismiss_contract(&contract_number).await?;
    Ok(Json(serde_json::json!({
        "message": "File updated succesfully.",
        "data": report,
    })))
}
