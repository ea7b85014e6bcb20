//! Command-line interface for quirky_server.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Quirky - tile-matching game server
#[derive(Parser, Debug)]
#[command(name = "quirky_server")]
#[command(about = "HTTP server for the Quirky tile game", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file and `PORT`)
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Validate a config file and print the resolved settings
    CheckConfig {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["quirky_server", "serve"]).unwrap();
        match cli.command {
            Command::Serve { host, port, config } => {
                assert!(host.is_none());
                assert!(port.is_none());
                assert!(config.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::try_parse_from([
            "quirky_server",
            "serve",
            "--host",
            "0.0.0.0",
            "-p",
            "9000",
            "--config",
            "quirky.toml",
        ])
        .unwrap();
        match cli.command {
            Command::Serve { host, port, config } => {
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(9000));
                assert_eq!(config, Some(PathBuf::from("quirky.toml")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_check_config_requires_path() {
        assert!(Cli::try_parse_from(["quirky_server", "check-config"]).is_err());
    }
}
