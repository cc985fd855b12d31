//! Shared per-invocation state for command families
//!
//! Group commands parse the shared flags, open the stores, and hand an
//! explicit context struct to their sub-action.

use std::path::Path;

use sfm_store::Store;

use crate::error::CliResult;

/// Simulation parameters shared by all forward sub-actions
#[derive(Debug, Clone)]
pub struct SimulationParams {
    /// Simulation duration (ms)
    pub duration: f32,
    /// Time step (ms)
    pub dt: f32,
    /// Absorbing layer width (grid points)
    pub n_pml: usize,
    /// Receivers per horizontal dimension
    pub n_receivers: usize,
    /// Spatial stencil order of accuracy
    pub space_order: usize,
    /// Grid spacing (m)
    pub spacing: f32,
}

/// Open stores and parameters handed to forward sub-actions
pub struct ForwardContext {
    /// Simulation parameters from the command line
    pub params: SimulationParams,
    /// Input velocity-model store (read-only)
    pub input: Store,
    /// Output seismogram store (created by this invocation)
    pub output: Store,
}

impl ForwardContext {
    /// Open the input store and create the output store
    ///
    /// Creating the output fails if the path already exists; an
    /// interrupted run leaves whatever was written so far.
    pub fn open(input: &Path, output: &Path, params: SimulationParams) -> CliResult<Self> {
        let input = Store::open(input)?;
        let output = Store::create(output)?;
        Ok(Self {
            params,
            input,
            output,
        })
    }
}

/// Output store and parameters handed to velocity-generation sub-actions
pub struct GenerationContext {
    /// Realization grid shape
    pub shape: Vec<usize>,
    /// Number of realizations to generate
    pub n_models: usize,
    /// RNG seed
    pub seed: u64,
    /// Output store
    pub output: Store,
}
