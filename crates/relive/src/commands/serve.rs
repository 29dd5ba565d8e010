//! `relive serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use relive_config::{CliSettings, Config};
use relive_middleware::{LIVERELOAD_PATH, ServerStartTime};

use crate::error::CliError;
use crate::output::Output;
use crate::server::{ServerConfig, run_server};

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover relive.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long, env = "RELIVE_HOST")]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long, env = "RELIVE_PORT")]
    port: Option<u16>,

    /// Demo page title (overrides config).
    #[arg(long)]
    title: Option<String>,

    /// Enable verbose output (request and connection logs).
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable live reload (default: enabled).
    #[arg(long)]
    live_reload: Option<bool>,

    /// Disable live reload.
    #[arg(long, conflicts_with = "live_reload")]
    no_live_reload: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let start_time = ServerStartTime::process();
        let output = Output::new();

        let live_reload_enabled = self.resolve_live_reload_enabled();
        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            live_reload_enabled,
            title: self.title,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.highlight(&format!(
            "Serving on http://{}:{}",
            config.server.host, config.server.port
        ));
        if let Some(path) = &config.config_path {
            output.info(&format!("Config file: {}", path.display()));
        }

        if config.live_reload.enabled {
            output.info(&format!(
                "Live reload: enabled (endpoint {LIVERELOAD_PATH}, start time {})",
                start_time.as_unix()
            ));
            if !relive_middleware::is_development_host(&config.server.host) {
                output.warning(
                    "Live reload only instruments requests for localhost or 127.0.0.1",
                );
            }
        } else {
            output.info("Live reload: disabled");
        }

        run_server(ServerConfig::from(&config), start_time).await
    }

    /// Resolve `live_reload_enabled` from --live-reload/--no-live-reload flags.
    fn resolve_live_reload_enabled(&self) -> Option<bool> {
        self.no_live_reload.then_some(false).or(self.live_reload)
    }
}
