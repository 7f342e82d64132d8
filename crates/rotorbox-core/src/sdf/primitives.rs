//! SDF Primitive shapes
//!
//! All primitives are centered at the origin with their axis along Z. Use
//! transforms to position them. Every constructor validates its sizes and
//! returns [`Error::InvalidParameter`] for non-positive or non-finite input.

use super::{Aabb, Aabb2, Sdf, Sdf2d};
use crate::{Error, Result};
use glam::{DVec2, DVec3};

// ============================================================================
// Constructor functions (ergonomic API)
// ============================================================================

/// Create a Z-axis cylinder of total `height` and `radius`, with edges
/// rounded by `rounding`
pub fn cylinder(height: f64, radius: f64, rounding: f64) -> Result<Cylinder> {
    Cylinder::new(height, radius, rounding)
}

/// Create a box with full `extents` along each axis and edges rounded by
/// `rounding`
pub fn box3(extents: DVec3, rounding: f64) -> Result<Box3> {
    Box3::new(extents, rounding)
}

/// Create a 2D circle profile
pub fn circle(radius: f64) -> Result<Circle> {
    Circle::new(radius)
}

/// Create a loft from profile `a` at the bottom to profile `b` at the top
pub fn loft<A: Sdf2d, B: Sdf2d>(a: A, b: B, height: f64, rounding: f64) -> Result<Loft<A, B>> {
    Loft::new(a, b, height, rounding)
}

// ============================================================================
// Validation helpers
// ============================================================================

fn positive(what: &str, name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidParameter(format!(
            "{what} {name} must be positive, got {value}"
        )))
    }
}

fn rounding_within(what: &str, rounding: f64, limit: f64) -> Result<f64> {
    if !rounding.is_finite() || rounding < 0.0 {
        return Err(Error::InvalidParameter(format!(
            "{what} rounding must be non-negative, got {rounding}"
        )));
    }
    if rounding > limit {
        return Err(Error::InvalidParameter(format!(
            "{what} rounding {rounding} exceeds {limit}"
        )));
    }
    Ok(rounding)
}

// ============================================================================
// 2D Profiles
// ============================================================================

/// Circle centered at origin in the XY plane
#[derive(Debug, Clone, Copy)]
pub struct Circle {
    pub radius: f64,
}

impl Circle {
    pub fn new(radius: f64) -> Result<Self> {
        Ok(Self {
            radius: positive("circle", "radius", radius)?,
        })
    }
}

impl Sdf2d for Circle {
    fn distance(&self, p: DVec2) -> f64 {
        p.length() - self.radius
    }

    fn bounds(&self) -> Aabb2 {
        Aabb2::new(DVec2::splat(-self.radius), DVec2::splat(self.radius))
    }
}

// ============================================================================
// 3D Primitives
// ============================================================================

/// Cylinder aligned with Z axis, optionally with rounded rims
#[derive(Debug, Clone, Copy)]
pub struct Cylinder {
    pub radius: f64,
    pub half_height: f64,
    pub rounding: f64,
}

impl Cylinder {
    pub fn new(height: f64, radius: f64, rounding: f64) -> Result<Self> {
        let height = positive("cylinder", "height", height)?;
        let radius = positive("cylinder", "radius", radius)?;
        let rounding = rounding_within("cylinder", rounding, radius.min(height * 0.5))?;
        Ok(Self {
            radius,
            half_height: height * 0.5,
            rounding,
        })
    }
}

impl Sdf for Cylinder {
    fn distance(&self, p: DVec3) -> f64 {
        let d = DVec2::new(p.truncate().length(), p.z.abs())
            - DVec2::new(self.radius - self.rounding, self.half_height - self.rounding);
        d.x.max(d.y).min(0.0) + d.max(DVec2::ZERO).length() - self.rounding
    }

    fn bounds(&self) -> Aabb {
        Aabb::new(
            DVec3::new(-self.radius, -self.radius, -self.half_height),
            DVec3::new(self.radius, self.radius, self.half_height),
        )
    }
}

/// Axis-aligned box (rectangular prism), optionally with rounded edges
#[derive(Debug, Clone, Copy)]
pub struct Box3 {
    pub half_extents: DVec3,
    pub rounding: f64,
}

impl Box3 {
    pub fn new(extents: DVec3, rounding: f64) -> Result<Self> {
        positive("box", "width", extents.x)?;
        positive("box", "depth", extents.y)?;
        positive("box", "height", extents.z)?;
        let half_extents = extents * 0.5;
        let rounding = rounding_within("box", rounding, half_extents.min_element())?;
        Ok(Self {
            half_extents,
            rounding,
        })
    }
}

impl Sdf for Box3 {
    fn distance(&self, p: DVec3) -> f64 {
        let q = p.abs() - self.half_extents + DVec3::splat(self.rounding);
        q.max(DVec3::ZERO).length() + q.max_element().min(0.0) - self.rounding
    }

    fn bounds(&self) -> Aabb {
        Aabb::new(-self.half_extents, self.half_extents)
    }
}

/// Loft between two 2D profiles along Z.
///
/// Profile `a` sits at `z = -height/2`, profile `b` at `z = +height/2`, and
/// the cross-section in between blends the two distance fields linearly.
#[derive(Debug, Clone, Copy)]
pub struct Loft<A: Sdf2d, B: Sdf2d> {
    pub a: A,
    pub b: B,
    pub half_height: f64,
    pub rounding: f64,
}

impl<A: Sdf2d, B: Sdf2d> Loft<A, B> {
    pub fn new(a: A, b: B, height: f64, rounding: f64) -> Result<Self> {
        let height = positive("loft", "height", height)?;
        let rounding = rounding_within("loft", rounding, height * 0.5)?;
        Ok(Self {
            a,
            b,
            half_height: height * 0.5,
            rounding,
        })
    }
}

impl<A: Sdf2d, B: Sdf2d> Sdf for Loft<A, B> {
    fn distance(&self, p: DVec3) -> f64 {
        let h = self.half_height - self.rounding;
        let xy = p.truncate();
        let k = if h > 0.0 {
            (0.5 * p.z / h + 0.5).clamp(0.0, 1.0)
        } else {
            0.5
        };
        let profile = self.a.distance(xy) * (1.0 - k) + self.b.distance(xy) * k;
        let cap = p.z.abs() - h;
        let d = if cap > 0.0 && profile > 0.0 {
            cap.hypot(profile)
        } else {
            profile.max(cap)
        };
        d - self.rounding
    }

    fn bounds(&self) -> Aabb {
        let r = self.a.bounds().union(&self.b.bounds());
        Aabb::new(
            r.min.extend(-self.half_height),
            r.max.extend(self.half_height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cylinder_surface_at_radius_and_caps() {
        let c = cylinder(10.0, 2.0, 0.0).unwrap();

        assert_relative_eq!(c.distance(DVec3::new(2.0, 0.0, 0.0)), 0.0, epsilon = 1e-12);
        assert_relative_eq!(c.distance(DVec3::new(0.0, 0.0, 5.0)), 0.0, epsilon = 1e-12);
        assert_relative_eq!(c.distance(DVec3::ZERO), -2.0, epsilon = 1e-12);
        assert!(c.distance(DVec3::new(0.0, 0.0, 5.5)) > 0.0);
    }

    #[test]
    fn rounded_cylinder_keeps_nominal_size() {
        let c = cylinder(6.0, 10.0, 1.0).unwrap();

        // Flat faces stay at their nominal position
        assert_relative_eq!(c.distance(DVec3::new(0.0, 0.0, 3.0)), 0.0, epsilon = 1e-12);
        assert_relative_eq!(c.distance(DVec3::new(10.0, 0.0, 0.0)), 0.0, epsilon = 1e-12);
        // The sharp rim corner is shaved off
        assert!(c.distance(DVec3::new(10.0, 0.0, 3.0)) > 0.0);
    }

    #[test]
    fn cylinder_rejects_non_positive_sizes() {
        assert!(cylinder(0.0, 1.0, 0.0).is_err());
        assert!(cylinder(1.0, -1.0, 0.0).is_err());
        assert!(cylinder(f64::NAN, 1.0, 0.0).is_err());
        assert!(cylinder(2.0, 1.0, 1.5).is_err());
        assert!(cylinder(2.0, 1.0, -0.1).is_err());
    }

    #[test]
    fn box_uses_full_extents() {
        let b = box3(DVec3::new(4.0, 2.0, 6.0), 0.0).unwrap();

        assert_relative_eq!(b.distance(DVec3::new(2.0, 0.0, 0.0)), 0.0, epsilon = 1e-12);
        assert_relative_eq!(b.distance(DVec3::new(0.0, 1.0, 0.0)), 0.0, epsilon = 1e-12);
        assert_relative_eq!(b.distance(DVec3::new(0.0, 0.0, 3.0)), 0.0, epsilon = 1e-12);
        assert_eq!(b.bounds().size(), DVec3::new(4.0, 2.0, 6.0));
    }

    #[test]
    fn box_rejects_oversized_rounding() {
        assert!(box3(DVec3::new(4.0, 2.0, 6.0), 1.0).is_ok());
        assert!(box3(DVec3::new(4.0, 2.0, 6.0), 1.1).is_err());
        assert!(box3(DVec3::new(4.0, 0.0, 6.0), 0.0).is_err());
    }

    #[test]
    fn circle_rejects_zero_radius() {
        assert!(circle(0.0).is_err());
        assert_relative_eq!(circle(3.0).unwrap().distance(DVec2::new(3.0, 0.0)), 0.0);
    }

    #[test]
    fn loft_blends_between_profiles() {
        let l = loft(circle(10.0).unwrap(), circle(20.0).unwrap(), 4.0, 0.0).unwrap();

        // Bottom face takes the first profile, top face the second
        assert_relative_eq!(l.distance(DVec3::new(10.0, 0.0, -2.0)), 0.0, epsilon = 1e-12);
        assert_relative_eq!(l.distance(DVec3::new(20.0, 0.0, 2.0)), 0.0, epsilon = 1e-12);
        // Midway the radius is the average
        assert_relative_eq!(l.distance(DVec3::new(15.0, 0.0, 0.0)), 0.0, epsilon = 1e-12);
        assert!(l.distance(DVec3::new(15.0, 0.0, -1.0)) > 0.0);
    }

    #[test]
    fn loft_bounds_cover_both_profiles() {
        let l = loft(circle(10.0).unwrap(), circle(20.0).unwrap(), 4.0, 0.0).unwrap();
        let b = l.bounds();

        assert_eq!(b.min, DVec3::new(-20.0, -20.0, -2.0));
        assert_eq!(b.max, DVec3::new(20.0, 20.0, 2.0));
    }

    #[test]
    fn loft_rejects_zero_height() {
        assert!(loft(circle(1.0).unwrap(), circle(2.0).unwrap(), 0.0, 0.0).is_err());
    }
}
