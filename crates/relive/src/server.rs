//! Development server.

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use relive_config::Config;
use relive_middleware::{LiveReloadLayer, ServerStartTime};
use tower::Layer;
use tower_http::trace::TraceLayer;

use crate::error::CliError;
use crate::site::{SiteState, site_router};

/// Server configuration.
#[derive(Clone, Debug)]
pub(crate) struct ServerConfig {
    /// Host address to bind to.
    pub(crate) host: String,
    /// Port to listen on.
    pub(crate) port: u16,
    /// Demo page title.
    pub(crate) title: String,
    /// Wrap the site in the live reload middleware.
    pub(crate) live_reload_enabled: bool,
}

impl From<&Config> for ServerConfig {
    fn from(config: &Config) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            title: config.site.title.clone(),
            live_reload_enabled: config.live_reload.enabled,
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid or the listener fails.
pub(crate) async fn run_server(
    config: ServerConfig,
    start_time: ServerStartTime,
) -> Result<(), CliError> {
    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))
        .map_err(|e| CliError::Server(format!("Invalid address: {e}")))?;
    let app = create_app(&config, start_time);

    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Build the demo site, wrapped in live reload when enabled.
pub(crate) fn create_app(config: &ServerConfig, start_time: ServerStartTime) -> Router {
    let site = site_router(Arc::new(SiteState {
        title: config.title.clone(),
        start_time,
        live_reload: config.live_reload_enabled,
    }));

    let app = if config.live_reload_enabled {
        LiveReloadLayer::with_start_time(start_time).layer(site)
    } else {
        site
    };

    app.layer(TraceLayer::new_for_http())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for Ctrl+C");
        return;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}
