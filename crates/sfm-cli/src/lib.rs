//! sfm CLI crate
//!
//! Purpose:
//! - Provide the command-line interface to the seismic forward-modelling
//!   toolkit: velocity-model generation, forward simulation, and store
//!   inspection.
//!
//! Public responsibilities (library view):
//! - Re-export the primary CLI entry (SfmCli) for integration in binary and
//!   testing contexts.
//! - Expose command modules and the acquisition-geometry helpers as a library
//!   so they can be invoked programmatically in tests.
//!
//! Major commands (see [commands]):
//! - fwd: open an input store of velocity models and a fresh output store,
//!        then run a source sub-action (currently `ricker`) over every
//!        dataset of every group.
//! - vp: create or append to a store and run a generator sub-action
//!       (currently `rt`, Roeth-Tarantola layered models).
//! - info: list groups, datasets, and shapes of a store, optionally as JSON.
//!
//! Integration points:
//! - sfm_store: HDF5-backed group/dataset access.
//! - sfm_forward: velocity models, time axis, Ricker sources, the solver.
//! - sfm_velocity: randomized layered velocity generation.
//!
//! Notes:
//! - The binary (src/main.rs) wires up logging and argument parsing, calling
//!   SfmCli::execute().

pub mod commands;
pub mod context;
pub mod error;
pub mod geometry;

pub use commands::SfmCli;
