//! Command-line entry point and HTTP front end for the car-pooling service.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod http;
mod serve;

pub use error::CliError;
use serve::{ServeArgs, ServeConfig, run_serve};

pub(crate) const ARG_BIND: &str = "bind";
pub(crate) const ARG_PORT: &str = "port";
pub(crate) const DEFAULT_BIND: &str = "0.0.0.0";
pub(crate) const DEFAULT_PORT: u16 = 9091;

/// Run the CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Serve(args) => {
            let config = resolve_serve_config(args)?;
            run_serve(&config)
        }
    }
}

fn resolve_serve_config(args: ServeArgs) -> Result<ServeConfig, CliError> {
    args.into_config()
}

#[derive(Debug, Parser)]
#[command(
    name = "carpool",
    about = "Seat groups of passengers in a fleet of shared vehicles",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the car-pooling HTTP API.
    Serve(ServeArgs),
}

#[cfg(test)]
mod tests;
