//! Randomized layered velocity-model generation
//!
//! Produces synthetic P-wave velocity grids for forward-modelling runs,
//! currently via the Roeth-Tarantola layered construction. Generators own
//! their RNG state, so a fixed seed reproduces the full sequence of
//! realizations.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod roeth_tarantola;

pub use error::{Result, VelocityError};
pub use roeth_tarantola::RoethTarantolaGenerator;
