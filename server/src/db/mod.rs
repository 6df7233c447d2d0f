//! Database initialization and migration runner.
//!
//! SYSTEM CONTEXT
//! ==============
//! Startup uses this module to open the SQLite file backing the canvas
//! (created on first run) and apply schema migrations before the HTTP API
//! accepts traffic.

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::config::env_parse;

const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

/// Open the SQLite pool at `database_url` and run migrations.
///
/// # Errors
///
/// Returns an error if the URL is malformed, the file cannot be opened, or a
/// migration fails.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS))
        .connect_with(options)
        .await?;

    migrate(&pool).await?;
    Ok(pool)
}

/// Apply pending migrations to an open pool.
///
/// # Errors
///
/// Returns an error if a migration fails.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("src/db/migrations").run(pool).await?;
    Ok(())
}

#[cfg(test)]
/// A private in-memory database with the schema applied.
///
/// A single connection is used: every `sqlite::memory:` connection would
/// otherwise see its own empty database.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or migrated.
pub async fn memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    migrate(&pool).await?;
    Ok(pool)
}
