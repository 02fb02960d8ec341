//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use minimart_discovery::{AuthClient, CartClient, ProductClient};

use crate::config::OrderConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: OrderConfig,
    pool: PgPool,
    products: ProductClient,
    auth: AuthClient,
    carts: CartClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        config: OrderConfig,
        pool: PgPool,
        products: ProductClient,
        auth: AuthClient,
        carts: CartClient,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                products,
                auth,
                carts,
            }),
        }
    }

    /// Get a reference to the service configuration.
    #[must_use]
    pub fn config(&self) -> &OrderConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the product service client.
    #[must_use]
    pub fn products(&self) -> &ProductClient {
        &self.inner.products
    }

    /// Get a reference to the auth service client.
    #[must_use]
    pub fn auth(&self) -> &AuthClient {
        &self.inner.auth
    }

    /// Get a reference to the cart service client.
    #[must_use]
    pub fn carts(&self) -> &CartClient {
        &self.inner.carts
    }
}
