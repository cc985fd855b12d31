//! # sfm - seismic forward modelling CLI
//!
//! Command-line wrapper around the acoustic forward-modelling library:
//! generates randomized velocity models, reads them back from HDF5
//! stores, runs wave-equation simulations and records synthetic
//! seismograms at surface receivers.

use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod context;
mod error;
mod geometry;

use commands::SfmCli;
use error::CliResult;

fn main() -> CliResult<()> {
    let cli = SfmCli::parse();

    // Initialize logging with environment variable support
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    // Execute the command
    if let Err(err) = cli.execute() {
        error!("Command failed: {}", err);
        std::process::exit(1);
    }

    Ok(())
}
