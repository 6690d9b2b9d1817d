//! # Adventure Catalog Server
//!
//! Main entry point for the Adventure travel catalog.
//!
//! Loads layered configuration, initializes logging, connects the store
//! (MySQL, or the in-process store for `memory://`), and serves the REST
//! API until Ctrl+C or SIGTERM.

use adventure_config::{AppConfig, ConfigLoader, ObservabilityConfig};
use adventure_core::AdventureResult;
use adventure_server::{startup, AppBuilder};
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match load_config().await {
        Ok(config) => config,
        Err(e) => {
            init_logging(&ObservabilityConfig::default());
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.observability);
    startup::print_banner();

    info!("Starting Adventure Catalog Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn load_config() -> AdventureResult<AppConfig> {
    let config_loader = ConfigLoader::from_default_location()?;
    Ok(config_loader.get().await)
}

async fn run(config: AppConfig) -> AdventureResult<()> {
    info!("Environment: {}", config.app.environment);
    startup::print_startup_info(&config);

    let app = AppBuilder::new().with_config(config).build().await?;
    app.run(shutdown_signal()).await
}

fn init_logging(observability: &ObservabilityConfig) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{},adventure=debug,tower_http=debug",
            observability.log_level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if observability.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
