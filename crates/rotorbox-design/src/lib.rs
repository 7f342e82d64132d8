//! # Rotorbox Design
//!
//! Parametric model of an electronics enclosure that mounts onto a
//! brake-rotor hub. A handful of physical measurements (hub bore, wall
//! thickness, board and battery footprints) are propagated into every
//! dimension of three printable parts:
//!
//! - **body**: tapered housing that presses into the hub, with a retaining
//!   lip and an open pocket
//! - **cover**: stepped cap closing the top of the body
//! - **baseplate**: floor insert carrying the board posts and battery bay
//!   (first revision only; later revisions fuse them into the body)
//!
//! ```rust,ignore
//! use rotorbox_design::prelude::*;
//!
//! let assembly = Assembly::new(DesignParams::for_revision(Revision::First))?;
//! println!("{}", assembly.dimensions());
//! assembly.run(Path::new("out"), 300, ExportFormat::Stl)?;
//! ```

pub mod assembly;
pub mod dimensions;
pub mod graph;
pub mod params;
pub mod parts;
pub mod stackup;

mod error;

pub use error::{DesignError, Result};

pub mod prelude {
    pub use crate::assembly::{AssembledParts, Assembly, ExportedPart};
    pub use crate::dimensions::Dimensions;
    pub use crate::graph::Part;
    pub use crate::params::{CompositionPolicy, DesignParams, Revision};
    pub use crate::stackup::StackUp;
    pub use crate::{DesignError, Result};
    pub use rotorbox_core::export::ExportFormat;
}
