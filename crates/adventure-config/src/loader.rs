//! Configuration loader with layered sources.

use crate::AppConfig;
use adventure_core::AdventureError;
use config::{Config, ConfigError, Environment, File};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Configuration loader with runtime refresh support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
    config_dir: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Uncommitted local overrides
    /// 4. Environment variables with `ADVENTURE__` prefix
    pub fn new(config_dir: impl Into<String>) -> Result<Self, AdventureError> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, AdventureError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    ///
    /// The cache capacity is fixed once the registry is built; a reloaded
    /// capacity only applies to the next process start.
    pub async fn reload(&self) -> Result<(), AdventureError> {
        let new_config = Self::load_config(&self.config_dir)?;
        let mut config = self.config.write().await;
        if config.cache.capacity != new_config.cache.capacity {
            warn!(
                old = config.cache.capacity,
                new = new_config.cache.capacity,
                "Cache capacity changed; restart required for it to take effect"
            );
        }
        *config = new_config;
        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Loads configuration from the specified directory.
    fn load_config(config_dir: &str) -> Result<AppConfig, AdventureError> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var("ADVENTURE_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = format!("{}/{}.toml", config_dir, name);
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("ADVENTURE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error_to_adventure_error)?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_adventure_error)?;

        validate_config(&app_config)?;

        Ok(app_config)
    }

    /// Gets a specific configuration value by key path.
    pub async fn get_value<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let config = self.config.read().await;
        let json = serde_json::to_value(&*config).ok()?;

        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }

        serde_json::from_value(current.clone()).ok()
    }
}

/// Validates the configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), AdventureError> {
    if config.cache.capacity == 0 {
        return Err(AdventureError::Configuration(
            "cache.capacity must be at least 1".to_string(),
        ));
    }

    if config.database.url.is_empty() {
        return Err(AdventureError::Configuration("Database URL is required".to_string()));
    }

    if config.database.min_connections > config.database.max_connections {
        return Err(AdventureError::Configuration(format!(
            "database.min_connections ({}) exceeds database.max_connections ({})",
            config.database.min_connections, config.database.max_connections
        )));
    }

    let addr = config.server.rest_addr();
    if addr.parse::<SocketAddr>().is_err() {
        return Err(AdventureError::Configuration(format!(
            "Invalid REST address: {}",
            addr
        )));
    }

    Ok(())
}

fn config_error_to_adventure_error(err: ConfigError) -> AdventureError {
    AdventureError::Configuration(err.to_string())
}
