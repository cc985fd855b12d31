//! Forward-modelling command implementation

use clap::{Args, Subcommand};
use indicatif::ProgressBar;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use sfm_forward::{Receiver, RickerSource, TimeAxis, VelocityModel};

use crate::context::{ForwardContext, SimulationParams};
use crate::error::{CliError, CliResult};
use crate::geometry;

/// Run forward modelling over a store of velocity models
///
/// Every dataset of every input group is treated as one velocity
/// realization; its synthetic seismogram lands under the same group and
/// dataset name in the output store.
#[derive(Args, Debug)]
pub struct FwdCommand {
    /// Input velocity-model store
    pub input: PathBuf,

    /// Output seismogram store (must not exist yet)
    pub output: PathBuf,

    /// Simulation duration in ms
    #[arg(long, default_value = "1000.0")]
    pub duration: f32,

    /// Time step in ms
    #[arg(long, default_value = "2.0")]
    pub dt: f32,

    /// Absorbing layer width in grid points
    #[arg(long, default_value = "10")]
    pub n_pml: usize,

    /// Receivers per horizontal dimension
    #[arg(long, default_value = "11")]
    pub n_receivers: usize,

    /// Spatial stencil order of accuracy
    #[arg(long, default_value = "2")]
    pub space_order: usize,

    /// Grid spacing in m
    #[arg(long, default_value = "10.0")]
    pub spacing: f32,

    #[command(subcommand)]
    pub source: SourceCommands,
}

/// Source wavelet sub-actions
#[derive(Subcommand, Debug)]
pub enum SourceCommands {
    /// Single Ricker wavelet point source at the domain centre
    Ricker(RickerCommand),
}

/// Ricker source parameters
#[derive(Args, Debug)]
pub struct RickerCommand {
    /// Peak frequency in kHz
    #[arg(long, default_value = "0.01")]
    pub f0: f32,
}

impl FwdCommand {
    /// Open the stores and dispatch to the source sub-action
    pub fn execute(self) -> CliResult<()> {
        if self.n_receivers == 0 {
            return Err(CliError::invalid_args("--n-receivers must be at least 1"));
        }
        let params = SimulationParams {
            duration: self.duration,
            dt: self.dt,
            n_pml: self.n_pml,
            n_receivers: self.n_receivers,
            space_order: self.space_order,
            spacing: self.spacing,
        };

        info!(
            "Forward modelling {} -> {}",
            self.input.display(),
            self.output.display()
        );
        let context = ForwardContext::open(&self.input, &self.output, params)?;

        match self.source {
            SourceCommands::Ricker(cmd) => cmd.execute(&context),
        }
    }
}

impl RickerCommand {
    /// Simulate every realization in the input store
    pub fn execute(self, context: &ForwardContext) -> CliResult<()> {
        let params = &context.params;
        let time = TimeAxis::new(0.0, params.duration, params.dt)?;

        let total = context.input.leaf_dataset_count()?;
        let progress = ProgressBar::new(total as u64);

        for group in context.input.groups()? {
            let datasets = group.dataset_names()?;
            let first = match datasets.first() {
                Some(name) => name,
                None => {
                    warn!("Group {} holds no datasets, skipping", group.name());
                    continue;
                }
            };

            // The first realization fixes the grid for the whole group;
            // siblings only swap the velocity field.
            let vp = group.read(first)?;
            let shape = vp.shape().to_vec();
            let ndim = shape.len();
            let mut model = VelocityModel::new(
                vec![0.0; ndim],
                vec![params.spacing; ndim],
                shape.clone(),
                vp,
                params.space_order,
                params.n_pml,
            )?;

            let source = RickerSource::new(
                self.f0,
                &time,
                geometry::source_position(&model.domain_size()),
            )?;
            let receivers = Receiver::new(geometry::receiver_grid(
                &model.domain_size(),
                params.n_receivers,
            ));

            debug!(
                "Group {}: {} realizations of shape {:?}, {} receivers",
                group.name(),
                datasets.len(),
                shape,
                receivers.npoint()
            );

            let out_group = context.output.ensure_group(group.name())?;
            for name in &datasets {
                if name != first {
                    model.set_vp(group.read(name)?)?;
                }
                let seismogram = model.solve(&source, &receivers, &time)?;
                out_group.write(name, seismogram.view().into_dyn())?;
                progress.inc(1);
            }
        }

        progress.finish();
        info!(
            "Wrote {} seismogram datasets to {}",
            total,
            context.output.path().display()
        );
        Ok(())
    }
}
