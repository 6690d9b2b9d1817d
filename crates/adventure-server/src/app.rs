//! Application builder.

use crate::di::{build_catalog_module, StoreResolver};
use adventure_config::AppConfig;
use adventure_core::{AdventureError, AdventureResult};
use adventure_repository::{create_pool, DatabasePool, DatabasePoolInterface, InMemoryStore};
use adventure_rest::{create_router, AppState};
use adventure_service::{CatalogServices, CatalogStores};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tracing::info;

/// Application builder for constructing the server.
pub struct AppBuilder {
    config: Option<AppConfig>,
}

impl AppBuilder {
    /// Creates a new application builder.
    pub fn new() -> Self {
        Self { config: None }
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Connects the store, builds the caches and services, and assembles the router.
    ///
    /// A `memory://` database URL selects the in-process store; anything
    /// else is treated as a MySQL URL.
    pub async fn build(self) -> AdventureResult<App> {
        let config = self.config.unwrap_or_default();

        let (stores, pool) = if config.database.is_in_memory() {
            info!("Using in-memory store");
            (CatalogStores::shared(Arc::new(InMemoryStore::new())), None)
        } else {
            let pool = create_pool(&config.database).await?;
            if config.database.run_migrations {
                pool.run_migrations().await?;
            }
            let module = build_catalog_module(&pool);
            (module.catalog_stores(), Some(pool))
        };

        let services = CatalogServices::new(stores, &config.cache)?;
        let mut state = AppState::new(services);
        if let Some(pool) = &pool {
            state = state.with_health_check(pool.clone());
        }

        let router = create_router(state, &config.server);

        Ok(App {
            config,
            router,
            pool,
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// An assembled application, ready to serve.
pub struct App {
    config: AppConfig,
    router: Router,
    pool: Option<Arc<DatabasePool>>,
}

impl App {
    /// The configuration the application was built with.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The HTTP router.
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serves HTTP until `shutdown` resolves, then closes the database pool.
    pub async fn run<F>(self, shutdown: F) -> AdventureResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let rest_addr = self.config.server.rest_addr();
        info!("Starting REST server on http://{}", rest_addr);

        let listener = tokio::net::TcpListener::bind(&rest_addr)
            .await
            .map_err(|e| AdventureError::Internal(format!("Failed to bind REST: {}", e)))?;

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| AdventureError::Internal(format!("REST server error: {}", e)))?;

        if let Some(pool) = self.pool {
            pool.close().await;
        }

        info!("Server shutdown complete");
        Ok(())
    }
}
