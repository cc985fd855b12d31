//! Error types for the forward-modelling library

use thiserror::Error;

/// Result type for forward-modelling operations
pub type Result<T> = std::result::Result<T, ForwardError>;

/// Errors that can occur when building models or running the solver
#[derive(Error, Debug)]
pub enum ForwardError {
    /// Invalid parameter value
    #[error("Invalid parameter {parameter}: {value} (expected {constraint})")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Array shape differs from the model grid
    #[error("Shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Shape found
        found: Vec<usize>,
    },

    /// Point coordinate outside the computational grid
    #[error("Coordinate {value} on axis {axis} is outside the grid extent {min}..{max}")]
    OutOfGrid {
        /// Offending coordinate value
        value: f32,
        /// Axis of the coordinate
        axis: usize,
        /// Smallest coordinate covered by the padded grid
        min: f32,
        /// Largest coordinate covered by the padded grid
        max: f32,
    },
}

impl ForwardError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(
        parameter: impl Into<String>,
        value: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            constraint: constraint.into(),
        }
    }

    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: Vec<usize>, found: Vec<usize>) -> Self {
        Self::ShapeMismatch { expected, found }
    }

    /// Create an out-of-grid error
    pub fn out_of_grid(value: f32, axis: usize, min: f32, max: f32) -> Self {
        Self::OutOfGrid {
            value,
            axis,
            min,
            max,
        }
    }
}
