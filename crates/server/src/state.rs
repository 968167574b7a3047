//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::db::{PgCartStore, ProductRepository};
use crate::services::CartService;

/// The production cart engine: Postgres storage, Postgres-backed catalog.
pub type Shopping = CartService<PgCartStore, ProductRepository>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    catalog: ProductRepository,
    shopping: Shopping,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool) -> Self {
        let catalog = ProductRepository::new(pool.clone());
        let shopping = CartService::new(PgCartStore::new(pool.clone()), catalog.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog,
                shopping,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the product repository.
    #[must_use]
    pub fn catalog(&self) -> &ProductRepository {
        &self.inner.catalog
    }

    /// Get a reference to the cart engine.
    #[must_use]
    pub fn shopping(&self) -> &Shopping {
        &self.inner.shopping
    }
}
