//! Risk impact API service.
//!
//! Publishes raster layers to a GeoServer instance and computes fatality
//! impact grids from hazard and exposure coverages, exposed over an HTTP
//! JSON API. Configuration comes from flags and environment variables and
//! is fixed for the lifetime of the process; deployments roll a new version
//! by restarting.

mod catalog;
mod config;
mod server;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::ServiceConfig;
use server::AppState;

#[derive(Parser, Debug)]
#[command(name = "risk-api")]
#[command(about = "Risk impact calculation and layer publishing API")]
struct Args {
    /// Port for the HTTP API
    #[arg(long, env = "RISK_API_PORT", default_value = "8000")]
    port: u16,

    /// Directory for downloaded and computed grid files
    #[arg(long, env = "RISK_API_WORK_DIR", default_value = "/tmp/risk-api")]
    work_dir: PathBuf,

    /// Workspace that receives computed impact layers
    #[arg(long, env = "RISK_API_WORKSPACE", default_value = "impact")]
    default_workspace: String,

    /// Grid resolution requested when a caller does not specify one
    #[arg(long, default_value = "0.0083333333333333")]
    default_cellsize: f64,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = ServiceConfig {
        port: args.port,
        work_dir: args.work_dir,
        default_workspace: args.default_workspace,
        default_cellsize: args.default_cellsize,
    };
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;

    tokio::fs::create_dir_all(&config.work_dir).await?;

    info!("Starting risk impact API");

    let state = Arc::new(AppState { config });
    server::run_server(state).await
}
