//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;
use static_shop_core::Catalog;

use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides read-only access to
/// the catalog and configuration. Per-visitor state (the cart) lives in the
/// session, never here.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    pool: Option<SqlitePool>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - The product catalog, fixed for the life of the process
    /// * `pool` - Session store pool, checked by the readiness endpoint
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog, pool: Option<SqlitePool>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                pool,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get the session store pool, if sessions are database-backed.
    #[must_use]
    pub fn pool(&self) -> Option<&SqlitePool> {
        self.inner.pool.as_ref()
    }
}
