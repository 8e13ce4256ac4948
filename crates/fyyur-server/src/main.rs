use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use fyyur_db::AppState;
use fyyur_server::config::ServerConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Database connection
    let db_config = fyyur_db::DatabaseConfig::from_env();
    tracing::info!("connecting to database...");
    let db = fyyur_db::connect(&db_config)
        .await
        .expect("failed to connect to database");

    // Run migrations
    tracing::info!("running database migrations...");
    fyyur_migration::Migrator::up(&db, None)
        .await
        .expect("failed to run migrations");
    tracing::info!("migrations complete");

    let state = Arc::new(AppState { db: db.clone() });
    let app = fyyur_server::router(state);

    let addr = ServerConfig::from_env().addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listen address");
    tracing::info!(%addr, "server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    if let Err(e) = db.close().await {
        tracing::warn!("closing database pool failed: {e}");
    }
    tracing::info!("server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
    tracing::info!("shutdown signal received");
}
