use std::str::FromStr;

use anyhow::{Context, Result};
use common_http_errors::ApiError;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool};
use tracing::{error, info};
use uuid::Uuid;

pub type DbConn = PoolConnection<Sqlite>;

/// Open the pool and bring the schema up to date before serving traffic.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid DATABASE_URL '{database_url}'"))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .context("Failed to open database")?;

    migrate(&pool).await?;
    info!(max_connections, "database ready");
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to apply database schema")
}

/// Check a connection out of the pool for the rest of the request.
/// It goes back to the pool when the guard is dropped, on success and error alike.
pub async fn acquire(pool: &SqlitePool, trace_id: Option<Uuid>) -> Result<DbConn, ApiError> {
    pool.acquire().await.map_err(|err| {
        error!(?err, trace_id = ?trace_id, "Failed to acquire database connection");
        ApiError::internal("database unavailable", trace_id)
    })
}
