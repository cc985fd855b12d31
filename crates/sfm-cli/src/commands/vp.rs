//! Velocity-model generation command implementation

use clap::{Args, Subcommand};
use indicatif::ProgressBar;
use std::path::PathBuf;
use tracing::info;

use sfm_store::Store;
use sfm_velocity::RoethTarantolaGenerator;

use crate::context::GenerationContext;
use crate::error::{CliError, CliResult};

/// Generate randomized velocity models into a store
#[derive(Args, Debug)]
pub struct VpCommand {
    /// Output velocity-model store
    pub output: PathBuf,

    /// Append to an existing store instead of replacing it
    #[arg(long)]
    pub append: bool,

    /// Number of realizations to generate
    #[arg(short = 'n', long, default_value = "1")]
    pub n_models: usize,

    /// Grid points along the first dimension
    #[arg(long, default_value = "100")]
    pub nx: usize,

    /// Grid points along the second dimension (depth in 2-D)
    #[arg(long, default_value = "100")]
    pub ny: usize,

    /// Grid points along depth; models are 3-D when present
    #[arg(long)]
    pub nz: Option<usize>,

    /// RNG seed
    #[arg(short = 's', long, default_value = "42")]
    pub seed: u64,

    #[command(subcommand)]
    pub generator: GeneratorCommands,
}

/// Generator sub-actions
#[derive(Subcommand, Debug)]
pub enum GeneratorCommands {
    /// Roeth-Tarantola randomized layered models
    Rt(RtCommand),
}

/// Roeth-Tarantola generator parameters
#[derive(Args, Debug)]
pub struct RtCommand {
    /// Number of horizontal layers
    #[arg(long, default_value = "8")]
    pub n_layers: usize,

    /// Velocity range of the shallowest layer in km/s
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], default_values_t = [1.35, 1.65])]
    pub initial_vp: Vec<f32>,

    /// Per-layer velocity increment range in km/s
    #[arg(
        long,
        num_args = 2,
        value_names = ["MIN", "MAX"],
        default_values_t = [-0.19, 0.57],
        allow_negative_numbers = true
    )]
    pub vp_perturbation: Vec<f32>,
}

impl VpCommand {
    /// Open the output store and dispatch to the generator sub-action
    pub fn execute(self) -> CliResult<()> {
        if self.n_models == 0 {
            return Err(CliError::invalid_args("--n-models must be at least 1"));
        }
        let mut shape = vec![self.nx, self.ny];
        if let Some(nz) = self.nz {
            shape.push(nz);
        }

        let output = if self.append {
            Store::append(&self.output)?
        } else {
            Store::truncate(&self.output)?
        };
        info!(
            "Generating {} models of shape {:?} into {}",
            self.n_models,
            shape,
            self.output.display()
        );

        let context = GenerationContext {
            shape,
            n_models: self.n_models,
            seed: self.seed,
            output,
        };
        match self.generator {
            GeneratorCommands::Rt(cmd) => cmd.execute(&context),
        }
    }
}

impl RtCommand {
    /// Generate layered realizations under the "rt" group
    pub fn execute(self, context: &GenerationContext) -> CliResult<()> {
        let initial_vp = match self.initial_vp[..] {
            [min, max] => (min, max),
            _ => return Err(CliError::invalid_args("--initial-vp takes exactly two values")),
        };
        let vp_perturbation = match self.vp_perturbation[..] {
            [min, max] => (min, max),
            _ => {
                return Err(CliError::invalid_args(
                    "--vp-perturbation takes exactly two values",
                ))
            }
        };

        let mut generator = RoethTarantolaGenerator::new(
            context.shape.clone(),
            self.n_layers,
            initial_vp,
            vp_perturbation,
            context.seed,
        )?;

        let group = context.output.ensure_group("rt")?;
        let progress = ProgressBar::new(context.n_models as u64);
        for index in 0..context.n_models {
            let model = generator.generate();
            group.write(&index.to_string(), model.view())?;
            progress.inc(1);
        }
        progress.finish();

        info!(
            "Wrote {} realizations to {}",
            context.n_models,
            context.output.path().display()
        );
        Ok(())
    }
}
