//! Error types for velocity-model generation

use thiserror::Error;

/// Result type for generation operations
pub type Result<T> = std::result::Result<T, VelocityError>;

/// Errors that can occur when configuring a generator
#[derive(Error, Debug)]
pub enum VelocityError {
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
}

impl VelocityError {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VelocityError::invalid_parameter("n_layers", "0", ">= 1");
        let msg = format!("{}", err);
        assert!(msg.contains("n_layers"));
        assert!(msg.contains(">= 1"));
    }
}
