//! HTTP server for the Quirky tile game.
//!
//! Wraps [`quirky_game::GameSession`] in a registry of named games, each
//! with its own chat, and exposes them as a JSON API built on axum. A lobby
//! chat is shared by every connected client.
//!
//! ```no_run
//! use quirky_server::{ServerConfig, serve};
//!
//! # async fn run() -> anyhow::Result<()> {
//! serve(ServerConfig::default().with_port(8080)).await
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod registry;
pub mod routes;
pub mod server;

pub use chat::{ChatLine, ChatLog, DEFAULT_CHAT_LINES};
pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use registry::{GameRoom, SessionRegistry, SharedRoom};
pub use routes::{AppState, router};
pub use server::serve;
