use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use fleet_registry::config::{DatabaseConfig, EnvironmentConfig, StoreBackend};
use fleet_registry::database::DatabaseConnection;
use fleet_registry::repositories::{MemoryVehicleStore, PgVehicleRepository, VehicleStore};
use fleet_registry::routes::create_app_router;
use fleet_registry::services::seed_from_file;
use fleet_registry::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🚚 Fleet Registry");
    info!("================");

    let config = EnvironmentConfig::from_env().context("invalid configuration")?;
    if config.is_production() {
        info!("🔒 Environment: {} (production)", config.environment);
    } else if config.is_development() {
        info!("🛠️  Environment: {} (development)", config.environment);
    } else {
        info!("Environment: {}", config.environment);
    }

    let store: Arc<dyn VehicleStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let connection = match DatabaseConnection::connect(&db_config).await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("❌ Error connecting to the database: {:#}", e);
                    return Err(e);
                }
            };
            Arc::new(PgVehicleRepository::new(connection.pool().clone()))
        }
        StoreBackend::Memory => {
            if config.is_production() {
                warn!("⚠️  Production is running on the in-memory store; vehicles are lost on shutdown");
            } else {
                warn!("Using the in-memory store; vehicles are lost on shutdown");
            }
            Arc::new(MemoryVehicleStore::new())
        }
    };

    let app_state = AppState::new(store, config.clone());

    if let Some(seed_file) = &config.seed_file {
        if let Err(e) = seed_from_file(&app_state.registry, seed_file).await {
            error!("❌ Seed failed: {:#}", e);
        }
    }

    let app = create_app_router(app_state);

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server_url()))?;

    info!("🌐 Server listening on http://{}", addr);
    info!("   GET    /health");
    info!("   GET    /vehicles");
    info!("   GET    /vehicles/:id");
    info!("   POST   /vehicles");
    info!("   PUT    /vehicles/:id");
    info!("   DELETE /vehicles/:id");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Server error: {}", e);
            e
        })?;

    info!("👋 Server stopped");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Ctrl+C received, shutting down...");
        },
        _ = terminate => {
            info!("🛑 Termination signal received, shutting down...");
        },
    }
}
