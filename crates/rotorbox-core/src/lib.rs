//! # Rotorbox Core
//!
//! Signed distance field solids and the tooling to turn them into printable
//! meshes.
//!
//! The design crate builds every part out of the small vocabulary exported
//! here: cylinders, boxes, circles, lofts, unions, differences and
//! translations. Each constructor validates its sizes and fails with
//! [`Error::InvalidParameter`] instead of producing a degenerate solid.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rotorbox_core::prelude::*;
//!
//! let washer = cylinder(2.0, 10.0, 0.0)?
//!     .subtract(cylinder(4.0, 4.0, 0.0)?);
//!
//! render_to_mesh_file(&washer, 200, "washer.stl")?;
//! ```
//!
//! ## Units and Conventions
//!
//! - **Distances**: millimeters
//! - **Precision**: `f64` throughout, so derived dimensions never drift
//! - **Coordinate system**: right-handed, Z-up (the print bed is the XY plane)

pub mod export;
pub mod mesh;
pub mod sdf;

mod error;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    // SDF primitives and combinators
    pub use crate::sdf::{Aabb, Sdf, Sdf2d, SdfExt, SdfNode, primitives::*, union};

    // Mesh generation
    pub use crate::mesh::{Mesh, MeshConfig, SdfToMesh, Vertex};

    // Export
    pub use crate::export::{ExportFormat, MeshExport, render_mesh, render_to_mesh_file};

    // Math (re-export glam)
    pub use glam::{DVec2, DVec3};

    // Error handling
    pub use crate::{Error, Result};
}
