//! ShareDrop Server — upload a file, get back a shareable link.
//!
//! Main entry point that wires all crates together and starts the server.

use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tracing_subscriber::{EnvFilter, fmt};

use sharedrop_core::config::AppConfig;
use sharedrop_core::error::AppError;
use sharedrop_core::traits::storage::StorageProvider;
use sharedrop_core::traits::store::LinkStore;
use sharedrop_service::{IngestService, RetrieveService, TokenGenerator};

#[tokio::main]
async fn main() {
    let env = std::env::var("SHAREDROP_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!("Configuration loaded (env: {})", env);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber from the logging configuration
fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => fmt().json().with_env_filter(filter).with_target(true).init(),
        _ => fmt().pretty().with_env_filter(filter).with_target(true).init(),
    }
}

/// Construct every component and run the server until shutdown
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting ShareDrop v{}", env!("CARGO_PKG_VERSION"));

    create_data_directories(&config).await?;

    tracing::info!("Connecting to database...");
    let db_pool = sharedrop_database::connection::create_pool(&config.database).await?;

    sharedrop_database::migration::run_migrations(&db_pool).await?;

    let storage: Arc<dyn StorageProvider> = Arc::new(
        sharedrop_storage::LocalStorageProvider::new(&config.storage.uploads_root).await?,
    );

    let store: Arc<dyn LinkStore> =
        Arc::new(sharedrop_database::LinkRepository::new(db_pool.clone()));

    let guard = Arc::new(sharedrop_auth::CredentialGuard::new(&config.auth)?);

    let ingest_service = Arc::new(IngestService::new(
        Arc::clone(&store),
        TokenGenerator::new(),
        Arc::clone(&guard),
    ));
    let retrieve_service = Arc::new(RetrieveService::new(
        store,
        Arc::clone(&storage),
        guard,
    ));

    let state = sharedrop_api::AppState {
        config: Arc::new(config.clone()),
        db_pool,
        storage,
        ingest_service,
        retrieve_service,
    };

    let app = sharedrop_api::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("ShareDrop listening on {}", addr);

    let (drain_tx, drain_rx) = oneshot::channel();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, draining connections...");
            let _ = drain_tx.send(());
        })
        .into_future();

    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    serve_with_grace(server, drain_rx, grace).await?;

    tracing::info!("ShareDrop shut down cleanly");
    Ok(())
}

/// Drive the server future, bounding the drain phase.
///
/// Once `drain_started` fires, connections get at most `grace` to
/// finish; after that the server future is dropped and the remaining
/// connections are cut.
async fn serve_with_grace<S>(
    server: S,
    drain_started: oneshot::Receiver<()>,
    grace: Duration,
) -> Result<(), AppError>
where
    S: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        res = server => res.map_err(|e| AppError::internal(format!("Server error: {}", e))),
        _ = async {
            let _ = drain_started.await;
            tokio::time::sleep(grace).await;
        } => {
            tracing::warn!(
                grace_seconds = grace.as_secs(),
                "Shutdown grace period elapsed, dropping open connections"
            );
            Ok(())
        }
    }
}

/// Ensure the data and upload directories exist before anything opens them
async fn create_data_directories(config: &AppConfig) -> Result<(), AppError> {
    for dir in [&config.storage.data_root, &config.storage.uploads_root] {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| AppError::internal(format!("Failed to create '{}': {}", dir, e)))?;
    }
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
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

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_grace_period_bounds_drain() {
        let (tx, rx) = oneshot::channel();
        tx.send(()).unwrap();

        // A server that never finishes draining must still be cut off.
        let stuck = std::future::pending::<std::io::Result<()>>();
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            serve_with_grace(stuck, rx, Duration::from_millis(10)),
        )
        .await;
        assert!(result.expect("grace period should end the wait").is_ok());
    }

    #[tokio::test]
    async fn test_clean_exit_before_grace() {
        let (_tx, rx) = oneshot::channel();
        let done = async { Ok(()) };
        serve_with_grace(done, rx, Duration::from_secs(30))
            .await
            .unwrap();
    }
}
