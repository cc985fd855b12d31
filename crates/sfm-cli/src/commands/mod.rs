//! CLI command implementations for sfm

use clap::{Parser, Subcommand};

use crate::error::CliResult;

pub mod fwd;
pub mod info;
pub mod vp;

/// sfm - seismic forward modelling toolkit
#[derive(Parser, Debug)]
#[command(
    name = "sfm",
    version,
    about = "Seismic forward modelling over HDF5 velocity-model stores",
    long_about = "Generate randomized subsurface velocity models, run acoustic \
                  wave-equation simulations over them, and record synthetic \
                  seismograms at surface receivers. Stores are HDF5 files holding \
                  named groups of f32 array datasets."
)]
pub struct SfmCli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run forward modelling over a store of velocity models
    Fwd(fwd::FwdCommand),

    /// Generate randomized velocity models into a store
    Vp(vp::VpCommand),

    /// List the groups and datasets of a store
    Info(info::InfoCommand),
}

impl SfmCli {
    /// Execute the CLI command
    pub fn execute(self) -> CliResult<()> {
        match self.command {
            Commands::Fwd(cmd) => cmd.execute(),
            Commands::Vp(cmd) => cmd.execute(),
            Commands::Info(cmd) => cmd.execute(),
        }
    }
}
