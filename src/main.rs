//! Custom error pages backend.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!    Ingress           │               ERROR PAGES                     │
//!    (X-Code,          │                                               │
//!     X-Format, ...)   │  ┌────────┐   ┌────────────┐   ┌───────────┐  │
//!    ──────────────────┼─▶│  http  │──▶│ classifier │──▶│ overrides │  │
//!                      │  │ server │   └────────────┘   └─────┬─────┘  │
//!                      │  └────────┘                          │        │
//!                      │       ▲                              ▼        │
//!    ◀─────────────────┼───────┘        ┌──────────┐    ┌──────────┐   │
//!    error page        │                │ metrics  │◀───│   emit   │◀──┼── /www
//!                      │                └──────────┘    └──────────┘   │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use custom_error_pages::config::{resolve_config, ConfigError, EnvLookup, ProcessEnv, ServerConfig};
use custom_error_pages::http::{shutdown_signal, HttpServer};
use custom_error_pages::observability::{
    logging, metrics, MetricsRecorder, NoopRecorder, RequestRecorder,
};
use custom_error_pages::pages::ErrorPages;

#[derive(Parser)]
#[command(name = "custom-error-pages")]
#[command(about = "Serves custom error pages for an ingress controller", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "ERROR_PAGES_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overrides the configured one.
    #[arg(short, long)]
    listen: Option<String>,

    /// Error files root, overrides the configured one and ERROR_FILES_PATH.
    #[arg(long)]
    error_files_path: Option<PathBuf>,
}

fn build_config(cli: &Cli, env: &dyn EnvLookup) -> Result<ServerConfig, ConfigError> {
    resolve_config(cli.config.as_deref(), env, |config| {
        if let Some(listen) = &cli.listen {
            config.listener.bind_address = listen.clone();
        }
        if let Some(path) = &cli.error_files_path {
            config.pages.error_files_path = path.clone();
        }
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let env: Arc<dyn EnvLookup> = Arc::new(ProcessEnv);

    let config = build_config(&cli, env.as_ref())?;
    logging::init_logging(&config.observability);

    tracing::info!("custom-error-pages v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        error_files_path = %config.pages.error_files_path.display(),
        maintenance_routes = config.maintenance.routes.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let handle = if config.observability.metrics_enabled {
        Some(metrics::install_exporter()?)
    } else {
        None
    };
    let recorder: Arc<dyn RequestRecorder> = match handle {
        Some(_) => Arc::new(MetricsRecorder),
        None => Arc::new(NoopRecorder),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let pages = ErrorPages::new(&config, env, recorder);
    let server = HttpServer::new(config, pages, handle);
    server.run(listener, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
