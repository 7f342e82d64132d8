//! Baseplate disc that drops into the body pocket

use crate::dimensions::BaseplateDimensions;
use rotorbox_core::Result;
use rotorbox_core::sdf::{SdfExt, SdfNode, circle, loft};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseplate {
    pub dims: BaseplateDimensions,
}

impl Baseplate {
    pub fn new(dims: BaseplateDimensions) -> Self {
        Self { dims }
    }

    /// Tapered disc from the skirt at z = 0 to the top face
    pub fn build(&self) -> Result<SdfNode> {
        let d = &self.dims;
        Ok(loft(
            circle(d.skirt_diameter / 2.0)?,
            circle(d.top_diameter / 2.0)?,
            d.thickness,
            0.0,
        )?
        .translate_z(d.thickness / 2.0))
    }
}
