use std::sync::Arc;

use anyhow::Context;
use clinic_service::{app::cors_layer, db, router, AppState, ClinicConfig};
use common_observability::ClinicMetrics;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ClinicConfig::from_env()?;
    let pool = db::connect(&config.database_url, config.db_max_connections).await?;

    let state = AppState::new(pool, config.jwt.clone(), Arc::new(ClinicMetrics::default()));
    let app = router(state).layer(cors_layer(&config.cors_origins));

    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "starting clinic-service");
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
