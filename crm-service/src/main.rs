use std::net::SocketAddr;
use std::sync::Arc;

use crm_core::cache::TenantCache;
use crm_core::observability::logging::init_tracing;
use crm_service::{build_router, config::CrmConfig, services::Database, AppState};
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), crm_core::error::AppError> {
    // Load configuration - fail fast if invalid
    let config = CrmConfig::from_env()?;

    init_tracing(&config.service_name, &config.server.log_level);

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        default_tenant = ?config.tenancy.default_tenant_id,
        "Starting CRM service"
    );

    let db = Database::new(&config.database).await?;
    db.run_migrations().await?;

    let state = AppState {
        config: config.clone(),
        db,
        cache: Arc::new(TenantCache::new()),
    };

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    crm_core::axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
