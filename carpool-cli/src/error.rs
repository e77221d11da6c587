//! Error types emitted by the carpool CLI.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;

/// Errors emitted by the carpool CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// The bind address is not an IP address.
    #[error("invalid {field} address {value:?}: {source}")]
    InvalidBindAddress {
        field: &'static str,
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// The async runtime could not be started.
    #[error("failed to start the async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The listening socket could not be opened.
    #[error("failed to listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    /// Accepting connections failed irrecoverably.
    #[error("server on {addr} stopped: {source}")]
    Serve {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}
