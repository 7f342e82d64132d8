//! Error types for the enclosure design

use crate::graph::Part;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using DesignError
pub type Result<T> = std::result::Result<T, DesignError>;

/// Errors that abort a design run. None of them are recoverable: a
/// malformed parameter set has no valid output.
#[derive(Error, Debug)]
pub enum DesignError {
    /// A physical parameter is out of range
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Two consecutive stack-up placements are not strictly increasing
    #[error("Stack-up is not increasing: {lower} at {lower_z} mm, {upper} at {upper_z} mm")]
    StackUp {
        lower: &'static str,
        lower_z: f64,
        upper: &'static str,
        upper_z: f64,
    },

    /// A generator rejected its derived dimensions
    #[error("Failed to build {step}: {source}")]
    Construction {
        step: Part,
        #[source]
        source: rotorbox_core::Error,
    },

    /// The composition graph could not be ordered
    #[error("Composition graph has a cycle through {0}")]
    Cycle(Part),

    /// A part needed by another was never built
    #[error("{part} requires {missing}, which was not built")]
    MissingDependency { part: Part, missing: Part },

    /// Meshing or writing a part failed
    #[error("Failed to export {part} to {}: {source}", path.display())]
    Export {
        part: Part,
        path: PathBuf,
        #[source]
        source: rotorbox_core::Error,
    },

    /// Unsupported revision number
    #[error("Unknown revision {0} (expected 1, 2 or 3)")]
    UnknownRevision(u8),

    /// Parameter file could not be parsed
    #[error("Invalid parameter file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DesignError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Attach the failing step to a core construction error
pub(crate) trait ConstructionContext<T> {
    fn during(self, step: Part) -> Result<T>;
}

impl<T> ConstructionContext<T> for rotorbox_core::Result<T> {
    fn during(self, step: Part) -> Result<T> {
        self.map_err(|source| DesignError::Construction { step, source })
    }
}
