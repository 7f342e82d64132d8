//! Stepped cap that closes the top of the body

use crate::dimensions::CoverDimensions;
use rotorbox_core::Result;
use rotorbox_core::sdf::{SdfExt, SdfNode, cylinder};

const RIM_ROUNDING: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cover {
    pub dims: CoverDimensions,
}

impl Cover {
    pub fn new(dims: CoverDimensions) -> Self {
        Self { dims }
    }

    /// Outer disc above the midplane, step below it, midplane on the body top
    pub fn build(&self) -> Result<SdfNode> {
        let d = &self.dims;
        let half = d.thickness / 2.0;
        let cap = cylinder(half, d.outer_diameter / 2.0, RIM_ROUNDING.min(half / 2.0))?
            .translate_z(half / 2.0);
        let step = cylinder(half, d.inner_diameter / 2.0, 0.0)?.translate_z(-half / 2.0);
        Ok(cap.union(step).translate_z(d.z))
    }
}
