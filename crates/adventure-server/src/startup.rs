//! Server startup utilities.

use adventure_config::AppConfig;
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
    ___       __                 __
   /   | ____/ /   _____  ____  / /___  __________
  / /| |/ __  / | / / _ \/ __ \/ __/ / / / ___/ _ \
 / ___ / /_/ /| |/ /  __/ / / / /_/ /_/ / /  /  __/
/_/  |_\__,_/ |___/\___/_/ /_/\__/\__,_/_/   \___/

                     Travel Catalog
    "#);
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    let addr = config.server.rest_addr();
    let store = if config.database.is_in_memory() {
        "in-memory"
    } else {
        "mysql"
    };

    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("REST API:  http://{}/api/v1", addr);
    info!("Health:    http://{}/health", addr);
    info!("API Docs:  http://{}/swagger-ui", addr);
    info!("Store:     {}", store);
    info!(
        "Cache:     {} entries per kind, {} collection reads",
        config.cache.capacity, config.cache.find_all_policy
    );
    info!("{}", separator);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_banner_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_banner();
    }

    #[test]
    fn test_print_startup_info_in_memory() {
        let _ = tracing_subscriber::fmt::try_init();
        let mut config = AppConfig::default();
        config.database.url = "memory://".to_string();
        print_startup_info(&config);
    }
}
