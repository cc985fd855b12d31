//! Error handling for the sfm CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Store layer error
    #[error("Store error: {0}")]
    Store(#[from] sfm_store::StoreError),

    /// Forward-modelling error
    #[error("Forward modelling error: {0}")]
    Forward(#[from] sfm_forward::ForwardError),

    /// Velocity generation error
    #[error("Velocity generation error: {0}")]
    Velocity(#[from] sfm_velocity::VelocityError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Generic error
    #[error("Error: {0}")]
    Generic(#[from] anyhow::Error),

    /// Invalid command arguments
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),
}

impl CliError {
    /// Create an invalid arguments error
    pub fn invalid_args(msg: impl Into<String>) -> Self {
        Self::InvalidArgs(msg.into())
    }
}
