use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use hr_admin::{
    config::EnvironmentConfig,
    create_app_router,
    database::DatabaseConnection,
    repositories::Repositories,
    services::storage::LocalFileStorage,
    utils::errors::expose_error_details,
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    info!("🧑‍💼 HR Admin API");
    info!("================");

    let config = EnvironmentConfig::from_env().context("loading configuration")?;
    expose_error_details(config.is_development());
    info!("⚙️  Environment: {}", config.environment);

    let db = match DatabaseConnection::connect(&config).await {
        Ok(db) => db,
        Err(e) => {
            error!("❌ Could not connect to the database: {}", e);
            return Err(anyhow::anyhow!("database error: {}", e));
        }
    };
    info!("✅ Database connected");

    if config.run_migrations {
        db.run_migrations().await.context("running migrations")?;
        info!("✅ Migrations applied");
    }

    tokio::fs::create_dir_all(&config.storage_dir)
        .await
        .with_context(|| format!("creating storage dir {}", config.storage_dir.display()))?;
    let storage = Arc::new(LocalFileStorage::new(
        config.storage_dir.clone(),
        config.public_files_url.clone(),
    ));

    let addr: SocketAddr = config.server_url().parse().context("parsing HOST/PORT")?;
    let state = AppState::new(config, Repositories::postgres(db.pool().clone()), storage);
    let app = create_app_router(state);

    info!("🌐 Listening on http://{}", addr);
    info!("   GET  /health");
    info!("   /api/auth, /api/visitors, /api/employees");
    info!("   /api/templates, /api/companies, /api/reports");
    info!("   GET  /files/*");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Server error: {}", e);
            e
        })?;

    info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Could not listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Could not install the SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("🛑 Ctrl+C received, shutting down"),
        _ = terminate => info!("🛑 SIGTERM received, shutting down"),
    }
}
