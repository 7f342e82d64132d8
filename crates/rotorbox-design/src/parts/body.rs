//! Body shell: tapered entry, cylindrical wall, retaining lip, open pocket

use crate::dimensions::BodyDimensions;
use rotorbox_core::Result;
use rotorbox_core::sdf::{SdfExt, SdfNode, circle, cylinder, loft, union};

/// Rim rounding of the lip and the pocket floor
const EDGE_ROUNDING: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyShell {
    pub dims: BodyDimensions,
}

impl BodyShell {
    pub fn new(dims: BodyDimensions) -> Self {
        Self { dims }
    }

    pub fn build(&self) -> Result<SdfNode> {
        let d = &self.dims;
        let taper = loft(
            circle(d.hub_side_diameter / 2.0)?,
            circle(d.cap_side_diameter / 2.0)?,
            d.loft_height,
            0.0,
        )?
        .translate_z(d.loft_height / 2.0);

        let upper_height = d.height - d.loft_height;
        let upper = cylinder(upper_height, d.cap_side_diameter / 2.0, 0.0)?
            .translate_z(d.loft_height + upper_height / 2.0);

        let lip = cylinder(
            d.lip_thickness,
            d.lip_diameter / 2.0,
            EDGE_ROUNDING.min(d.lip_thickness / 2.0),
        )?
        .translate_z(d.lip_bottom + d.lip_thickness / 2.0);

        // Runs past the top so the body stays open for the cover
        let pocket = cylinder(d.height, d.inner_diameter / 2.0, EDGE_ROUNDING)?
            .translate_z(d.floor_thickness + d.height / 2.0);

        Ok(union([taper, upper, lip])?.subtract(pocket))
    }
}
