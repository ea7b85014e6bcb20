//! Quirky - HTTP game server entry point.

use anyhow::{Context, Result};
use clap::Parser;
use quirky_server::cli::{Cli, Command};
use quirky_server::{ServerConfig, serve};
use std::path::Path;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { host, port, config } => run_server(host, port, config.as_deref()).await,
        Command::CheckConfig { config } => check_config(&config),
    }
}

/// Run the HTTP game server
async fn run_server(host: Option<String>, port: Option<u16>, path: Option<&Path>) -> Result<()> {
    let mut config = match path {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level())),
        )
        .init();

    if let Some(port) = port.or_else(port_from_env) {
        config = config.with_port(port);
    }
    if let Some(host) = host {
        config = config.with_host(host);
    }
    debug!(?config, "Resolved server configuration");

    info!("Starting Quirky server");
    serve(config).await
}

/// Validate a config file and print it back
fn check_config(path: &Path) -> Result<()> {
    let config = ServerConfig::from_file(path)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    let rendered = toml::to_string_pretty(&config).context("Failed to render config")?;
    println!("{rendered}");
    Ok(())
}

fn port_from_env() -> Option<u16> {
    let raw = std::env::var("PORT").ok()?;
    match raw.parse() {
        Ok(port) => Some(port),
        Err(e) => {
            warn!(value = %raw, error = %e, "Ignoring unparseable PORT");
            None
        }
    }
}
