use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use file_uploader::{
    config::Config, create_router, db::MySqlFileRepository, storage::S3Storage,
    utils::init_logger, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    // Load configuration
    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        server = ?config.server,
        database = ?config.database,
        storage = ?config.storage,
        "Configuration loaded"
    );

    // Gateways connect per request, nothing is opened here
    let state = AppState {
        storage: Arc::new(S3Storage::new(&config.storage)),
        files: Arc::new(MySqlFileRepository::new(&config.database)),
        config: Arc::new(config),
    };

    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let app = create_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
