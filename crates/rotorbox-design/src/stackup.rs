//! Vertical stack-up: the single source of every Z placement
//!
//! Heights are partial sums of the component thicknesses, computed in one
//! pass from the physical inputs. Nothing downstream stores its own offset,
//! so changing any input moves everything above it.

use crate::error::{DesignError, Result};
use crate::params::{DesignParams, RevisionConstants};

/// Derived Z placements, all measured from the hub-side face of the body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackUp {
    /// Top of the floor wall
    pub wall_top: f64,
    /// Height of the IMU standoffs
    pub imu_post: f64,
    /// Top of the IMU; the feather shoulders stop here
    pub imu_top: f64,
    /// Height of the feather standoffs
    pub feather_post: f64,
    /// The battery rests on the feather posts
    pub battery_bottom: f64,
    pub battery_top: f64,
    pub cover_thickness: f64,
    /// Total height of the body
    pub body_height: f64,
}

impl StackUp {
    /// Propagate thicknesses upward and check the result is increasing
    pub fn resolve(params: &DesignParams, constants: &RevisionConstants) -> Result<Self> {
        let wall_top = params.wall;
        let imu_top = wall_top + params.imu.thickness;
        let imu_post = imu_top - constants.embed_allowance;
        let feather_top = imu_top + params.feather.thickness;
        let feather_post = feather_top - constants.embed_allowance;
        let battery_bottom = feather_post;
        let battery_top = battery_bottom + params.battery.height;
        let cover_thickness = params.wall * 2.0;
        let body_height = battery_top + cover_thickness / 2.0;

        let stack = Self {
            wall_top,
            imu_post,
            imu_top,
            feather_post,
            battery_bottom,
            battery_top,
            cover_thickness,
            body_height,
        };
        stack.check_increasing()?;
        Ok(stack)
    }

    /// Placements bottom to top. The battery bottom coincides with the
    /// feather post top, so it is listed once.
    pub fn placements(&self) -> [(&'static str, f64); 6] {
        [
            ("wall top", self.wall_top),
            ("IMU post", self.imu_post),
            ("feather shoulder", self.imu_top),
            ("feather post", self.feather_post),
            ("battery top", self.battery_top),
            ("body top", self.body_height),
        ]
    }

    fn check_increasing(&self) -> Result<()> {
        for pair in self.placements().windows(2) {
            let [(lower, lower_z), (upper, upper_z)] = [pair[0], pair[1]];
            if upper_z <= lower_z {
                return Err(DesignError::StackUp {
                    lower,
                    lower_z,
                    upper,
                    upper_z,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Revision;
    use approx::assert_relative_eq;

    fn resolve(params: &DesignParams) -> Result<StackUp> {
        StackUp::resolve(params, &params.constants())
    }

    #[test]
    fn default_stack_matches_the_printed_parts() {
        let stack = resolve(&DesignParams::for_revision(Revision::First)).unwrap();

        assert_eq!(stack.wall_top, 3.0);
        assert_eq!(stack.imu_top, 18.0);
        assert_eq!(stack.imu_post, 13.0);
        assert_eq!(stack.feather_post, 28.0);
        assert_eq!(stack.battery_bottom, 28.0);
        assert_relative_eq!(stack.battery_top, 36.1, epsilon = 1e-12);
        assert_relative_eq!(stack.body_height, 39.1, epsilon = 1e-12);
    }

    #[test]
    fn placements_strictly_increase_for_positive_inputs() {
        for imu in [5.1, 8.0, 15.0, 30.0] {
            for feather in [5.5, 12.0, 25.0] {
                for battery in [0.5, 8.1, 20.0] {
                    for wall in [1.0, 3.0, 4.5] {
                        let mut params = DesignParams::default();
                        params.imu.thickness = imu;
                        params.feather.thickness = feather;
                        params.battery.height = battery;
                        params.wall = wall;

                        let stack = resolve(&params).unwrap();
                        for pair in stack.placements().windows(2) {
                            assert!(pair[1].1 > pair[0].1, "{pair:?}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn changing_one_input_moves_everything_above_it() {
        let base = resolve(&DesignParams::default()).unwrap();
        let mut params = DesignParams::default();
        params.imu.thickness += 2.0;
        let taller = resolve(&params).unwrap();

        assert_eq!(taller.wall_top, base.wall_top);
        for (a, b) in base.placements().iter().zip(taller.placements()).skip(1) {
            assert_relative_eq!(b.1 - a.1, 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn board_thinner_than_embedding_is_rejected() {
        let mut params = DesignParams::default();
        params.imu.thickness = 4.0;

        let err = resolve(&params).unwrap_err();
        assert!(matches!(
            err,
            DesignError::StackUp { lower: "wall top", upper: "IMU post", .. }
        ));
    }
}
