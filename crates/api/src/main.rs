//! FundSentry API server binary entrypoint.

use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use fundsentry_common::config::AppConfig;
use fundsentry_common::db::{create_pool, run_migrations};
use fundsentry_common::settings::PgSettingsStore;
use fundsentry_helius::HeliusClient;
use fundsentry_notifier::TelegramNotifier;

use fundsentry_api::routes::create_router;
use fundsentry_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("fundsentry_api=debug,fundsentry_engine=debug,tower_http=debug")
        }))
        .init();

    tracing::info!("Starting FundSentry API server...");

    // Load configuration
    let config = AppConfig::from_env()?;

    // Create database connection pool
    let pool = create_pool(&config.database_url, config.db_max_connections).await?;
    run_migrations(&pool).await?;

    // Outbound clients
    let timeout = Duration::from_secs(config.http_timeout_secs);
    let helius = HeliusClient::new(config.helius_api_url.clone(), timeout)?;
    let telegram = TelegramNotifier::new(config.telegram_api_url.clone(), timeout)?;

    tracing::info!(
        ingress_url = %config.ingress_url(),
        ingress_auth = config.ingress_auth_token.is_some(),
        "Outbound clients ready"
    );

    // Build application state
    let addr = config.bind_addr;
    let state = AppState::new(
        config,
        Arc::new(PgSettingsStore::new(pool)),
        Arc::new(helius),
        Arc::new(telegram),
    );

    // Build router
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    tracing::info!("API server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Received shutdown signal, stopping gracefully...");
        })
        .await?;

    tracing::info!("FundSentry API server stopped.");
    Ok(())
}
