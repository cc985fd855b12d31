//! Error types for the array store layer

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in the array store layer
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying HDF5 library error
    #[error("HDF5 error: {source}")]
    Hdf5 {
        #[from]
        /// Source HDF5 error
        source: hdf5::Error,
    },

    /// Store file not found on disk
    #[error("Store not found: {path}")]
    NotFound {
        /// Path that was not found
        path: String,
    },

    /// Store file already exists and overwriting was not requested
    #[error("Store already exists: {path}")]
    AlreadyExists {
        /// Path that already exists
        path: String,
    },

    /// Group not found inside the store
    #[error("Group {name} not found")]
    GroupNotFound {
        /// Group name that was not found
        name: String,
    },

    /// Dataset not found inside a group
    #[error("Dataset {name} not found in group {group}")]
    DatasetNotFound {
        /// Dataset name that was not found
        name: String,
        /// Group that was searched
        group: String,
    },

    /// Dataset could not be read with the expected element type
    #[error("Invalid dataset {name}: {reason}")]
    InvalidDataset {
        /// Dataset name
        name: String,
        /// Reason the dataset is invalid
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        /// Source I/O error
        source: std::io::Error,
    },
}

impl StoreError {
    /// Create a store-not-found error
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a store-already-exists error
    pub fn already_exists(path: impl Into<String>) -> Self {
        Self::AlreadyExists { path: path.into() }
    }

    /// Create a group-not-found error
    pub fn group_not_found(name: impl Into<String>) -> Self {
        Self::GroupNotFound { name: name.into() }
    }

    /// Create an invalid-dataset error
    pub fn invalid_dataset(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDataset {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
