//! Acoustic forward modelling on regular grids
//!
//! Implements the second-order-in-time acoustic wave equation with a
//! configurable-order spatial stencil, a sponge-style absorbing boundary
//! layer, and point sources and receivers placed off-grid via multilinear
//! interpolation.
//!
//! Units are chosen so no conversions appear anywhere: distances in m,
//! times in ms, velocities in km/s (equivalently m/ms) and frequencies
//! in kHz.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod model;
pub mod source;
pub mod time;

mod solver;

pub use error::{ForwardError, Result};
pub use model::VelocityModel;
pub use source::{Receiver, RickerSource};
pub use time::TimeAxis;
