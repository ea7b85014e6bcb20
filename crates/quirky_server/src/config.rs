//! Server configuration loaded from TOML.

use crate::chat::DEFAULT_CHAT_LINES;
use derive_getters::Getters;
use derive_more::{Display, Error};
use quirky_game::{DEFAULT_ORIGIN, Position};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Settings for the HTTP game server.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to.
    host: String,

    /// Port to bind to.
    port: u16,

    /// Default log filter when `RUST_LOG` is unset.
    log_level: String,

    /// Row of the cell each new board's bounding box starts from.
    board_origin_row: i32,

    /// Column of the cell each new board's bounding box starts from.
    board_origin_column: i32,

    /// Chat lines kept per log before the oldest are dropped.
    chat_lines: usize,

    /// Seed for tile draws and name suffixes; random when absent.
    seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8010,
            log_level: "info".to_string(),
            board_origin_row: DEFAULT_ORIGIN.row,
            board_origin_column: DEFAULT_ORIGIN.column,
            chat_lines: DEFAULT_CHAT_LINES,
            seed: None,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.chat_lines == 0 {
            return Err(ConfigError::new("chat_lines must be at least 1"));
        }
        Ok(())
    }

    /// Overrides the bind host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Overrides the bind port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Fixes the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The cell new boards start from.
    pub fn board_origin(&self) -> Position {
        Position::new(self.board_origin_row, self.board_origin_column)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = ServerConfig::from_toml("").unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.board_origin(), DEFAULT_ORIGIN);
        assert_eq!(*config.chat_lines(), 1000);
    }

    #[test]
    fn test_partial_file_overrides() {
        let config = ServerConfig::from_toml(
            r#"
            port = 9000
            board_origin_row = 0
            seed = 5
            "#,
        )
        .unwrap();
        assert_eq!(*config.port(), 9000);
        assert_eq!(config.board_origin(), Position::new(0, 90));
        assert_eq!(*config.seed(), Some(5));
        assert_eq!(config.host(), "127.0.0.1");
    }

    #[test]
    fn test_zero_chat_lines_rejected() {
        let err = ServerConfig::from_toml("chat_lines = 0").unwrap_err();
        assert!(err.message.contains("chat_lines"));
    }

    #[test]
    fn test_bad_toml_reports_parse_error() {
        let err = ServerConfig::from_toml("port = \"eighty\"").unwrap_err();
        assert!(err.message.starts_with("Failed to parse config"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "host = \"0.0.0.0\"\nport = 3000").unwrap();
        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(*config.port(), 3000);
    }

    #[test]
    fn test_missing_file() {
        let err = ServerConfig::from_file("/nonexistent/quirky.toml").unwrap_err();
        assert!(err.message.starts_with("Failed to read config file"));
    }
}
