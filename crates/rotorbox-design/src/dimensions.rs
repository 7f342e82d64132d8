//! Derived dimensions of the three parts
//!
//! [`Dimensions::resolve`] is the only place physical inputs turn into part
//! sizes. Generators receive these values and never recompute them.

use crate::error::{DesignError, Result};
use crate::params::{CompositionPolicy, DesignParams, Revision, RevisionConstants};
use crate::stackup::StackUp;
use std::fmt;

/// Tolerance for comparing against printed reference diameters
const REPRINT_TOLERANCE: f64 = 1e-6;

/// Main housing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDimensions {
    /// Outer diameter where the body enters the hub
    pub hub_side_diameter: f64,
    /// Outer diameter above the taper
    pub cap_side_diameter: f64,
    /// Pocket diameter, always hub side minus two walls
    pub inner_diameter: f64,
    pub height: f64,
    /// Height of the taper from hub side to cap side
    pub loft_height: f64,
    pub lip_diameter: f64,
    /// Z of the lip's lower face
    pub lip_bottom: f64,
    pub lip_thickness: f64,
    /// Solid material under the pocket
    pub floor_thickness: f64,
}

impl BodyDimensions {
    pub fn lip_top(&self) -> f64 {
        self.lip_bottom + self.lip_thickness
    }
}

/// Stepped cap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverDimensions {
    pub outer_diameter: f64,
    /// Diameter of the step that drops into the body
    pub inner_diameter: f64,
    pub thickness: f64,
    /// Z of the cover midplane, which sits on the body top
    pub z: f64,
}

/// Removable floor insert
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseplateDimensions {
    /// Diameter at the bed
    pub skirt_diameter: f64,
    /// Diameter at the top face, the widest point
    pub top_diameter: f64,
    pub thickness: f64,
}

/// Everything a run derives from its parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub revision: Revision,
    pub constants: RevisionConstants,
    pub stack: StackUp,
    pub body: BodyDimensions,
    pub cover: CoverDimensions,
    pub baseplate: BaseplateDimensions,
    /// Whether baseplates printed for earlier bodies still fit. `None` when
    /// the revision makes no such promise.
    pub reprint_compatible: Option<bool>,
}

impl Dimensions {
    pub fn resolve(params: &DesignParams) -> Result<Self> {
        params.validate()?;
        let constants = params.constants();
        let stack = StackUp::resolve(params, &constants)?;
        let wall = params.wall;

        let hub_side_diameter = params.hub.bore_diameter - params.hub.entry_clearance;
        let inner_diameter = hub_side_diameter - 2.0 * wall;
        let body = BodyDimensions {
            hub_side_diameter,
            cap_side_diameter: params.hub.bore_diameter,
            inner_diameter,
            height: stack.body_height,
            loft_height: params.hub.depth / 2.0,
            lip_diameter: params.hub.bore_diameter + 2.0 * constants.lip_allowance,
            lip_bottom: params.hub.depth + constants.lip_offset_walls * wall,
            lip_thickness: wall,
            floor_thickness: constants.floor_walls * wall,
        };

        let cover = CoverDimensions {
            outer_diameter: params.hub.outer_diameter,
            inner_diameter: inner_diameter + constants.cover_clearance,
            thickness: stack.cover_thickness,
            z: stack.body_height,
        };

        let baseplate = BaseplateDimensions {
            skirt_diameter: inner_diameter - wall,
            top_diameter: inner_diameter - constants.fit_clearance,
            thickness: wall,
        };

        let reprint_compatible = constants
            .reprint_inner_diameter
            .map(|reference| (inner_diameter - reference).abs() < REPRINT_TOLERANCE);
        if reprint_compatible == Some(false) {
            tracing::warn!(
                inner_diameter,
                reference = constants.reprint_inner_diameter,
                "Body inner diameter differs from earlier prints; old baseplates will not fit"
            );
        }

        let dims = Self {
            revision: params.revision,
            constants,
            stack,
            body,
            cover,
            baseplate,
            reprint_compatible,
        };
        dims.check()?;
        Ok(dims)
    }

    pub fn policy(&self) -> CompositionPolicy {
        self.constants.policy
    }

    fn check(&self) -> Result<()> {
        let body = &self.body;
        if body.inner_diameter <= 0.0 {
            return Err(DesignError::invalid(
                "body.inner_diameter",
                format!(
                    "hub side {} mm leaves no room for two walls",
                    body.hub_side_diameter
                ),
            ));
        }
        if body.loft_height >= body.height {
            return Err(DesignError::invalid(
                "body.height",
                format!(
                    "{} mm does not clear the {} mm taper",
                    body.height, body.loft_height
                ),
            ));
        }
        if body.lip_bottom <= 0.0 || body.lip_top() > body.height {
            return Err(DesignError::invalid(
                "body.lip",
                format!(
                    "lip from {} to {} mm does not fit a {} mm body",
                    body.lip_bottom,
                    body.lip_top(),
                    body.height
                ),
            ));
        }
        if body.floor_thickness >= body.height {
            return Err(DesignError::invalid(
                "body.floor_thickness",
                "floor is as tall as the body",
            ));
        }
        if self.cover.inner_diameter >= self.cover.outer_diameter {
            return Err(DesignError::invalid(
                "cover.inner_diameter",
                format!(
                    "step {} mm must be narrower than the {} mm cap",
                    self.cover.inner_diameter, self.cover.outer_diameter
                ),
            ));
        }
        let plate = &self.baseplate;
        let limit = body.inner_diameter - self.constants.fit_clearance;
        if plate.skirt_diameter <= 0.0 || plate.top_diameter > limit {
            return Err(DesignError::invalid(
                "baseplate",
                format!(
                    "{} to {} mm does not fit a {} mm pocket",
                    plate.skirt_diameter, plate.top_diameter, body.inner_diameter
                ),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let policy = match self.policy() {
            CompositionPolicy::SubtractBaseplate => "separate baseplate",
            CompositionPolicy::UnionIntoBody => "carrier fused into body",
        };
        let b = &self.body;
        writeln!(f, "rotorbox {} ({policy})", self.revision)?;
        writeln!(
            f,
            "  body       hub side {:.2}  cap side {:.2}  inner {:.2}  height {:.2}",
            b.hub_side_diameter, b.cap_side_diameter, b.inner_diameter, b.height
        )?;
        writeln!(
            f,
            "  lip        diameter {:.2}  from z {:.2} to {:.2}",
            b.lip_diameter,
            b.lip_bottom,
            b.lip_top()
        )?;
        writeln!(
            f,
            "  cover      outer {:.2}  inner {:.2}  thickness {:.2}  at z {:.2}",
            self.cover.outer_diameter,
            self.cover.inner_diameter,
            self.cover.thickness,
            self.cover.z
        )?;
        if self.policy() == CompositionPolicy::SubtractBaseplate {
            writeln!(
                f,
                "  baseplate  skirt {:.2}  top {:.2}  thickness {:.2}",
                self.baseplate.skirt_diameter,
                self.baseplate.top_diameter,
                self.baseplate.thickness
            )?;
        }
        write!(f, "  stack     ")?;
        for (name, z) in self.stack.placements() {
            write!(f, " {name} {z:.2} |")?;
        }
        writeln!(f)?;
        match self.reprint_compatible {
            Some(true) => writeln!(f, "  fits baseplates printed for earlier bodies"),
            Some(false) => writeln!(f, "  does NOT fit baseplates printed for earlier bodies"),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::REPRINT_INNER_DIAMETER;
    use approx::assert_relative_eq;

    fn scenario() -> DesignParams {
        let mut params = DesignParams::for_revision(Revision::First);
        params.hub.bore_diameter = 100.0;
        params.hub.entry_clearance = 5.0;
        params.hub.outer_diameter = 110.0;
        params.wall = 3.0;
        params
    }

    #[test]
    fn scenario_dimensions() {
        let dims = Dimensions::resolve(&scenario()).unwrap();

        assert_relative_eq!(dims.body.hub_side_diameter, 95.0, epsilon = 1e-12);
        assert_relative_eq!(dims.body.inner_diameter, 89.0, epsilon = 1e-12);
        assert_relative_eq!(dims.baseplate.skirt_diameter, 86.0, epsilon = 1e-12);
        assert_relative_eq!(dims.cover.inner_diameter, 89.1, epsilon = 1e-12);
        assert_relative_eq!(dims.cover.outer_diameter, 110.0, epsilon = 1e-12);
        assert_eq!(dims.reprint_compatible, Some(false));
    }

    #[test]
    fn inner_diameter_is_exactly_outer_minus_two_walls() {
        for bore in [80.0, 95.5, 101.6, 130.0] {
            for wall in [1.2, 2.0, 3.0, 4.4] {
                let mut params = DesignParams::default();
                params.hub.bore_diameter = bore;
                params.hub.outer_diameter = bore + 10.0;
                params.wall = wall;
                let dims = Dimensions::resolve(&params).unwrap();

                assert_eq!(
                    dims.body.inner_diameter,
                    dims.body.hub_side_diameter - 2.0 * wall
                );
            }
        }
    }

    #[test]
    fn baseplate_clears_the_pocket_under_perturbation() {
        for revision in Revision::ALL {
            for delta in [-3.0, -0.7, 0.0, 0.05, 1.3, 6.0] {
                let mut params = DesignParams::for_revision(revision);
                params.hub.bore_diameter += delta;
                params.wall += delta / 10.0;
                let dims = Dimensions::resolve(&params).unwrap();
                let limit = dims.body.inner_diameter - 0.1;

                assert!(dims.baseplate.top_diameter <= limit + 1e-12);
                assert!(dims.baseplate.skirt_diameter <= limit);
            }
        }
    }

    #[test]
    fn default_first_revision_is_reprint_compatible() {
        let dims = Dimensions::resolve(&DesignParams::for_revision(Revision::First)).unwrap();

        assert_relative_eq!(
            dims.body.inner_diameter,
            REPRINT_INNER_DIAMETER,
            epsilon = 1e-9
        );
        assert_eq!(dims.reprint_compatible, Some(true));
        assert!(dims.baseplate.top_diameter <= REPRINT_INNER_DIAMETER - 0.1 + 1e-12);
    }

    #[test]
    fn later_revisions_make_no_reprint_promise() {
        let dims = Dimensions::resolve(&DesignParams::for_revision(Revision::Third)).unwrap();
        assert_eq!(dims.reprint_compatible, None);
    }

    #[test]
    fn lip_moves_down_a_wall_after_the_first_revision() {
        let first = Dimensions::resolve(&DesignParams::for_revision(Revision::First)).unwrap();
        let third = Dimensions::resolve(&DesignParams::for_revision(Revision::Third)).unwrap();

        assert_relative_eq!(first.body.lip_bottom, 21.5, epsilon = 1e-12);
        assert_relative_eq!(third.body.lip_bottom, 17.0, epsilon = 1e-12);
        assert_relative_eq!(third.body.lip_diameter, 101.6 + 4.0, epsilon = 1e-12);
    }

    #[test]
    fn cover_clearance_only_in_the_first_revision() {
        let first = Dimensions::resolve(&DesignParams::for_revision(Revision::First)).unwrap();
        let second = Dimensions::resolve(&DesignParams::for_revision(Revision::Second)).unwrap();

        assert_relative_eq!(
            first.cover.inner_diameter - first.body.inner_diameter,
            0.1,
            epsilon = 1e-12
        );
        assert_eq!(second.cover.inner_diameter, second.body.inner_diameter);
    }

    #[test]
    fn walls_wider_than_the_body_are_rejected() {
        let mut params = DesignParams::default();
        params.wall = 50.0;

        assert!(Dimensions::resolve(&params).is_err());
    }

    #[test]
    fn cover_step_wider_than_cap_is_rejected() {
        let mut params = DesignParams::default();
        params.hub.outer_diameter = 80.0;

        let err = Dimensions::resolve(&params).unwrap_err();
        assert!(matches!(
            err,
            DesignError::InvalidParameter { name: "cover.inner_diameter", .. }
        ));
    }

    #[test]
    fn summary_names_every_part_of_the_first_revision() {
        let text = Dimensions::resolve(&DesignParams::for_revision(Revision::First))
            .unwrap()
            .to_string();

        assert!(text.contains("revision 1"));
        assert!(text.contains("inner 90.60"));
        assert!(text.contains("baseplate"));
        assert!(text.contains("fits baseplates"));
    }
}
