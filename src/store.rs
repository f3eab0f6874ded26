//! SQLite pool setup and `plants` table DDL.

use crate::config::Config;
use crate::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Open the pool, creating the database file if it does not exist yet.
pub async fn connect(config: &Config) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;
    tracing::info!(url = %config.database_url, "connected to database");
    Ok(pool)
}

/// Create the `plants` table if missing. AUTOINCREMENT keeps deleted ids from being handed out again.
pub async fn ensure_plants_table(pool: &SqlitePool) -> Result<(), AppError> {
    let ddl = r#"
        CREATE TABLE IF NOT EXISTS plants (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            image TEXT,
            price REAL
        )
    "#;
    sqlx::query(ddl).execute(pool).await?;
    Ok(())
}
