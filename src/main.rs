//! CMS server.
//!
//! Serves an in-memory site under a configurable serving path, or exports a
//! single page into a file.
//!
//! ```text
//!   Client Request
//!   ─────────────▶ axum router ──▶ ContainerRequest / ContainerResponse
//!                                        │
//!                                        ▼
//!                                  HttpCmsResponse ──▶ Site
//!   Client Response                      │
//!   ◀───────────── into_response ◀───────┘
//! ```

use std::fs::File;
use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tokio::net::TcpListener;

use cms_response::cms::{export_page, Site};
use cms_response::config::{load_config, validate_config, CmsConfig, ConfigError};
use cms_response::lifecycle::signals::wait_for_signal;
use cms_response::observability::{logging, metrics};
use cms_response::{CmsServer, Shutdown, TransportError};

#[derive(Parser)]
#[command(name = "cms-server")]
#[command(about = "Serve or export a CMS site", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the site over HTTP (default)
    Serve,
    /// Render one page and write its body to a file or stdout
    Export {
        /// Page path below the serving path (e.g. /index.html)
        path: String,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Error)]
enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => {
            let config = CmsConfig::default();
            validate_config(&config).map_err(ConfigError::Validation)?;
            config
        }
    };

    logging::init_logging(&config.observability.log_level);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Export { path, output } => export(&config, &path, output),
    }
}

async fn serve(config: CmsConfig) -> Result<(), ServerError> {
    tracing::info!("cms-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        serving_path = %config.site.serving_path,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(wait_for_signal(shutdown));

    CmsServer::new(config).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn export(config: &CmsConfig, path: &str, output: Option<PathBuf>) -> Result<(), ServerError> {
    let site = Site::from_config(&config.site);

    match output {
        Some(file) => export_page(&site, path, File::create(file)?, io::stdout().lock())?,
        None => export_page(&site, path, io::stdout().lock(), io::stderr().lock())?,
    };
    Ok(())
}
