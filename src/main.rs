//! ContractVault Server — versioned contract file storage API.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{fmt, EnvFilter};

use vault_core::config::AppConfig;
use vault_core::error::AppError;
use vault_core::traits::notify::Notifier;
use vault_core::traits::store::ObjectStore;
use vault_registry::service::FileRegistry;
use vault_registry::staging::StagingService;
use vault_registry::verifier::StagingVerifier;
use vault_storage::notify::{LogNotifier, SnsNotifier};
use vault_storage::providers::S3ObjectStore;

#[tokio::main]
async fn main() {
    let env = std::env::var("VAULT_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting ContractVault v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Object stores ────────────────────────────────────
    tracing::info!(bucket = %config.storage.bucket, "Connecting main object store");
    let main_store: Arc<dyn ObjectStore> =
        Arc::new(S3ObjectStore::new(&config.storage, &config.storage.bucket).await?);

    tracing::info!(bucket = %config.storage.staging_bucket, "Connecting staging object store");
    let staging_store: Arc<dyn ObjectStore> =
        Arc::new(S3ObjectStore::new(&config.storage, &config.storage.staging_bucket).await?);

    // ── Step 2: Notification channel ─────────────────────────────
    let notifier: Arc<dyn Notifier> = if config.notify.enabled {
        Arc::new(SnsNotifier::new(&config.notify, &config.storage).await?)
    } else {
        tracing::info!("SNS notifications disabled, rejection notices go to the log");
        Arc::new(LogNotifier::new())
    };

    // ── Step 3: Registry and staging services ────────────────────
    let registry = Arc::new(FileRegistry::new(
        Arc::clone(&main_store),
        config.registry.clone(),
    ));
    let staging = Arc::new(StagingService::new(
        Arc::clone(&staging_store),
        config.staging.clone(),
    ));
    let verifier = StagingVerifier::new(
        staging_store,
        main_store,
        notifier,
        config.staging.clone(),
    );

    // ── Step 4: Shutdown channel & staging sweep ─────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let sweep_interval = Duration::from_secs(config.staging.sweep_interval_seconds);
    let mut sweep_cancel = shutdown_rx.clone();
    let sweep_handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match verifier.sweep().await {
                        Ok(0) => {}
                        Ok(n) => tracing::info!(processed = n, "Staging sweep complete"),
                        Err(e) => tracing::warn!(error = %e, "Staging sweep failed"),
                    }
                }
                _ = sweep_cancel.changed() => break,
            }
        }
    });
    tracing::info!(
        interval_seconds = config.staging.sweep_interval_seconds,
        "Staging verifier sweep started"
    );

    // ── Step 5: Build and start HTTP server ──────────────────────
    let shutdown_grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let app_state = vault_api::state::AppState {
        config: Arc::new(config),
        registry,
        staging,
    };
    let app = vault_api::build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("ContractVault server listening on {}", addr);

    // ── Step 6: Graceful shutdown ────────────────────────────────
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    let _ = tokio::time::timeout(shutdown_grace, sweep_handle).await;

    tracing::info!("ContractVault server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
