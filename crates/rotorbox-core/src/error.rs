//! Error types for rotorbox-core

use thiserror::Error;

/// Result type alias using the core Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building solids or writing meshes
#[derive(Error, Debug)]
pub enum Error {
    /// A primitive or combinator rejected its parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Mesh generation failed
    #[error("Mesh generation failed: {0}")]
    MeshGeneration(String),

    /// Export failed
    #[error("Export failed: {0}")]
    Export(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
