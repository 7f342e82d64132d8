//! Battery bay: four corner columns that locate the battery pack

use crate::error::{DesignError, Result};
use crate::params::BatterySpec;
use glam::{DVec2, DVec3};
use rotorbox_core::sdf::{SdfExt, SdfNode, box3};

/// Edge rounding of the bay block
const BAY_ROUNDING: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryBay {
    pub battery: BatterySpec,
    pub wall: f64,
    /// Height of the corner columns, measured from z = 0
    pub height: f64,
    /// Where the battery rests; its volume is cut out of the columns when set
    pub cutout_bottom: Option<f64>,
}

impl BatteryBay {
    /// Fails fast when the relief would merge the two slots into one hole
    pub fn new(
        battery: BatterySpec,
        wall: f64,
        height: f64,
        cutout_bottom: Option<f64>,
    ) -> Result<Self> {
        battery.validate()?;
        if !(height.is_finite() && height > 0.0) {
            return Err(DesignError::invalid(
                "battery bay",
                format!("height must be positive, got {height}"),
            ));
        }
        Ok(Self {
            battery,
            wall,
            height,
            cutout_bottom,
        })
    }

    /// Outer footprint of the bay block
    pub fn footprint(&self) -> DVec2 {
        DVec2::new(self.battery.width, self.battery.depth) + 2.0 * self.wall
    }

    /// Widths of the slot running along Y and the slot running along X
    pub fn slot_widths(&self) -> DVec2 {
        let relief = 2.0 * self.battery.corner_relief;
        DVec2::new(self.battery.width - relief, self.battery.depth - relief)
    }

    pub fn build(&self) -> rotorbox_core::Result<SdfNode> {
        let outer = self.footprint();
        let slots = self.slot_widths();
        // Slots overshoot the block on every side so no skin is left behind
        let overshoot = 2.0 * self.height;

        let block = box3(outer.extend(self.height), BAY_ROUNDING)?;
        let along_y = box3(DVec3::new(slots.x, 2.0 * outer.y, overshoot), 0.0)?;
        let along_x = box3(DVec3::new(2.0 * outer.x, slots.y, overshoot), 0.0)?;

        let columns = block
            .subtract(along_y)
            .subtract(along_x)
            .translate_z(self.height / 2.0);

        match self.cutout_bottom {
            Some(bottom) => {
                let b = &self.battery;
                let pack = box3(DVec3::new(b.width, b.depth, b.height), 0.0)?
                    .translate_z(bottom + b.height / 2.0);
                Ok(columns.subtract(pack))
            }
            None => Ok(columns),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rotorbox_core::sdf::Sdf;

    fn bay(cutout: Option<f64>) -> BatteryBay {
        BatteryBay::new(BatterySpec::default(), 3.0, 36.1, cutout).unwrap()
    }

    #[test]
    fn slot_widths_leave_relief_on_each_side() {
        let widths = bay(None).slot_widths();

        assert_relative_eq!(widths.x, 62.5 - 20.0, epsilon = 1e-12);
        assert_relative_eq!(widths.y, 50.5 - 20.0, epsilon = 1e-12);
    }

    #[test]
    fn relief_of_half_the_short_side_fails_fast() {
        let battery = BatterySpec {
            corner_relief: 25.25,
            ..BatterySpec::default()
        };
        let err = BatteryBay::new(battery, 3.0, 36.1, None).unwrap_err();

        assert!(matches!(err, DesignError::InvalidParameter { .. }));
    }

    #[test]
    fn negative_relief_fails_fast() {
        let battery = BatterySpec {
            corner_relief: -1.0,
            ..BatterySpec::default()
        };

        assert!(BatteryBay::new(battery, 3.0, 36.1, None).is_err());
    }

    #[test]
    fn only_the_corner_columns_remain() {
        let bay = bay(None).build().unwrap();
        let corner = DVec3::new(33.0, 26.0, 10.0);

        assert!(bay.distance(corner) < 0.0);
        assert!(bay.distance(DVec3::new(0.0, 26.0, 10.0)) > 0.0);
        assert!(bay.distance(DVec3::new(33.0, 0.0, 10.0)) > 0.0);
        assert!(bay.distance(DVec3::new(0.0, 0.0, 10.0)) > 0.0);
        assert!(bay.distance(corner.with_z(37.0)) > 0.0);
    }

    #[test]
    fn battery_cutout_hollows_the_columns_above_its_bottom() {
        let solid = bay(None).build().unwrap();
        let cut = bay(Some(28.0)).build().unwrap();
        let inside_pack = DVec3::new(30.0, 24.0, 32.0);
        let below_pack = inside_pack.with_z(20.0);

        assert!(solid.distance(inside_pack) < 0.0);
        assert!(cut.distance(inside_pack) > 0.0);
        assert!(cut.distance(below_pack) < 0.0);
    }

    #[test]
    fn bay_sits_on_the_bed() {
        let b = bay(None).build().unwrap().bounds();

        assert_relative_eq!(b.min.z, 0.0, epsilon = 1e-12);
        assert_relative_eq!(b.max.z, 36.1, epsilon = 1e-12);
    }
}
