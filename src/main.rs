//! GREEN-API credential relay.
//!
//! Serves the demo form and relays its calls to the messaging API.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser form / relay-cli
//!         │  POST /api/green-api/{idInstance}/{method}/{apiToken}
//!         ▼                 {httpMethod, data}
//!   ┌──────────────────────────────────────────────┐
//!   │ http      request id · trace · cors · timeout │
//!   │   │                                           │
//!   │   ▼                                           │
//!   │ relay     validate → build URL → one call ────┼──▶ GREEN-API
//!   │   │                                           │    /waInstance{id}/{method}/{token}
//!   │   ▼                                           │
//!   │ classify  JSON verbatim | error taxonomy      │
//!   └──────────────────────────────────────────────┘
//!   static files (public/) · /health · metrics
//! ```

use std::path::PathBuf;

use clap::Parser;

use green_api_relay::config::{self, RelayConfig};
use green_api_relay::lifecycle;
use green_api_relay::observability::logging;

#[derive(Parser)]
#[command(name = "green-api-relay")]
#[command(about = "Relay for the GREEN-API demo form", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides PORT and the config file).
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match config::load_config(args.config.as_deref()) {
        Ok(mut config) => {
            if let Some(port) = args.port {
                config.listener.port = port;
            }
            config
        }
        Err(e) => {
            logging::init_logging(&RelayConfig::default().observability);
            tracing::error!(error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };

    logging::init_logging(&config.observability);
    tracing::info!("green-api-relay v{} starting", env!("CARGO_PKG_VERSION"));

    lifecycle::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
