//! Route definitions for the ContractVault HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.staging.max_upload_size_bytes() as usize;

    let api_routes = Router::new()
        .merge(contract_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// File lifecycle, archival, and staged-upload endpoints.
fn contract_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/contracts/{contract_number}/files",
            post(handlers::file::create_file),
        )
        .route(
            "/contracts/{contract_number}/files",
            get(handlers::file::list_files),
        )
        .route(
            "/contracts/{contract_number}/files/{filename}",
            put(handlers::file::update_file),
        )
        .route(
            "/contracts/{contract_number}/files/{filename}",
            get(handlers::file::get_file),
        )
        .route(
            "/contracts/{contract_number}/files/{filename}",
            delete(handlers::file::delete_file),
        )
        .route(
            "/contracts/{contract_number}/files/{filename}/versions",
            get(handlers::file::list_file_versions),
        )
        .route(
            "/contracts/{contract_number}/files/{filename}/archive",
            post(handlers::archive::archive_file),
        )
        .route(
            "/contracts/{contract_number}/archive",
            post(handlers::archive::archive_contract),
        )
        .route(
            "/contracts/{contract_number}/files/{filename}/upload-ticket",
            post(handlers::staging::request_upload_ticket),
        )
}

/// Health check endpoints (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
