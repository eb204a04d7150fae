//! Branchcast Server CLI
//!
//! Starts the HTTP server for article-to-branch post generation.

use branchcast_server::{config::ServerConfig, start_server, ServerError};
use clap::Parser;
use std::path::PathBuf;
use std::process;

/// Branchcast - per-branch social post generation
#[derive(Debug, Parser)]
#[command(name = "branchcast-server", version, about)]
struct Cli {
    /// Load configuration from TOML file
    #[arg(long, env = "BRANCHCAST_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config and PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => {
            eprintln!("Warning: No config file specified, using defaults and environment");
            ServerConfig::default()
        }
    };
    config.apply_env()?;

    if let Some(port) = cli.port {
        config.bind_port = port;
    }

    start_server(config).await?;

    Ok(())
}
