//! ApplyTrack AI gateway
//!
//! HTTP front for the provider fallback orchestrator.

use applytrack_ai::config::Config;
use applytrack_ai::server::HttpServer;
use applytrack_ai::utils::logging::{LogFormat, init_logging};
use applytrack_ai::{Gateway, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(name = "ai-gateway", version, about = "ApplyTrack AI provider gateway")]
struct Args {
    /// Configuration file; falls back to environment variables when missing
    #[arg(short, long, env = "GATEWAY_CONFIG", default_value = "config/gateway.yaml")]
    config: PathBuf,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,

    /// Emit JSON logs
    #[arg(long)]
    log_json: bool,

    /// Do not reload the configuration file when it changes
    #[arg(long)]
    no_watch: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is normal
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    init_logging(LogFormat::resolve(args.log_json));

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Gateway failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    info!(version = applytrack_ai::VERSION, "Starting ApplyTrack AI gateway");

    let mut config = Config::load(Some(&args.config)).await?;
    if let Some(host) = args.host {
        config.gateway.server.host = host;
    }
    if let Some(port) = args.port {
        config.gateway.server.port = port;
    }
    config.validate()?;

    let gateway = Gateway::new(config)?;

    let _watch = if args.no_watch || !args.config.exists() {
        None
    } else {
        match gateway.watch_config(&args.config) {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("Configuration hot reload disabled: {}", e);
                None
            }
        }
    };

    HttpServer::new(gateway).start().await
}
