//! Session database.
//!
//! # Database: `SQLite`
//!
//! Holds a single table managed by `tower-sessions-sqlx-store`:
//!
//! - `tower_sessions` - Visitor sessions, including each visitor's cart snapshot
//!
//! The table is created at startup by [`create_session_store`]. Product data is
//! never stored here; the catalog is static.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower_sessions_sqlx_store::SqliteStore;

/// Create a `SQLite` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Create the session store and its table if missing.
///
/// # Errors
///
/// Returns `sqlx::Error` if the migration fails.
pub async fn create_session_store(pool: &SqlitePool) -> Result<SqliteStore, sqlx::Error> {
    let store = SqliteStore::new(pool.clone());
    store.migrate().await?;
    Ok(store)
}

/// Check that the database answers queries.
pub async fn ping(pool: &SqlitePool) -> bool {
    sqlx::query("SELECT 1").fetch_one(pool).await.is_ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_session_store_migrates() {
        let pool = memory_pool().await;
        create_session_store(&pool).await.unwrap();
        assert!(ping(&pool).await);
    }

    #[tokio::test]
    async fn test_ping_fails_on_closed_pool() {
        let pool = memory_pool().await;
        pool.close().await;
        assert!(!ping(&pool).await);
    }
}
