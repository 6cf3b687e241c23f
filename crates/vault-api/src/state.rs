//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use vault_core::config::AppConfig;
use vault_registry::service::FileRegistry;
use vault_registry::staging::StagingService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// The versioned file registry
    pub registry: Arc<FileRegistry>,
    /// Presigned direct-upload service
    pub staging: Arc<StagingService>,
}
