//! Error types for h5lens.
//!
//! This module provides a unified error handling approach using `thiserror`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for h5lens operations.
pub type Result<T> = std::result::Result<T, H5LensError>;

/// Errors that can occur in h5lens.
#[derive(Debug, Error)]
pub enum H5LensError {
    /// Failed to open a file.
    #[error("Failed to open file: {path}")]
    FileOpen {
        /// File that could not be opened.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: hdf5::Error,
    },

    /// Unsupported file format.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Failed to read or write an HDF5 object.
    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),

    /// Malformed MAT file.
    #[error("MAT file error at byte {offset}: {message}")]
    MatFormat {
        /// Byte offset where decoding failed.
        offset: usize,
        /// What went wrong.
        message: String,
    },

    /// Writing the converted file failed.
    #[error("Conversion to {path} failed")]
    Conversion {
        /// Destination file.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: Box<H5LensError>,
    },

    /// Failed to access clipboard.
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Node not found in the container.
    #[error("Node not found: {path}")]
    NodeNotFound {
        /// Path that was looked up.
        path: String,
    },

    /// Data cannot be plotted.
    #[error("Cannot plot: {0}")]
    Plot(String),
}

impl H5LensError {
    /// Create a FileOpen error.
    pub fn file_open(path: PathBuf, source: hdf5::Error) -> Self {
        Self::FileOpen { path, source }
    }

    /// Create a MatFormat error.
    pub fn mat_format(offset: usize, message: impl Into<String>) -> Self {
        Self::MatFormat {
            offset,
            message: message.into(),
        }
    }

    /// Wrap an error raised while writing a converted file.
    pub fn conversion(path: PathBuf, source: H5LensError) -> Self {
        Self::Conversion {
            path,
            source: Box::new(source),
        }
    }

    /// Create a NodeNotFound error.
    pub fn node_not_found(path: impl Into<String>) -> Self {
        Self::NodeNotFound { path: path.into() }
    }
}
