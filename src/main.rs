//! Plant API server: reads config from the environment, ensures the plants table, serves until Ctrl-C.

use plant_api::{app, connect, ensure_plants_table, AppState, Config, SqlitePlantRepository};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("plant_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let pool = connect(&config).await?;
    ensure_plants_table(&pool).await?;

    let repository = SqlitePlantRepository::new(pool);
    let state = AppState::new(Arc::new(repository), config.error_detail);
    let router = app(state, config.body_limit_bytes);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
