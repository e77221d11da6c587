//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();
    if let Err(err) = carpool_cli::run() {
        eprintln!("carpool: {err}");
        std::process::exit(1);
    }
}

/// Install a fmt subscriber that also collects `log` records.
///
/// The level comes from `RUST_LOG`, defaulting to `info`.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
