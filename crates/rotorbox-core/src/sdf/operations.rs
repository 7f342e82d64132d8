//! SDF Operations - Boolean combinators

use super::{Aabb, Sdf, SdfNode};
use glam::DVec3;

// ============================================================================
// Boolean Operations
// ============================================================================

/// Union of two SDFs (combine shapes)
pub struct Union<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
}

impl<A: Sdf, B: Sdf> Union<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: Sdf, B: Sdf> Sdf for Union<A, B> {
    fn distance(&self, p: DVec3) -> f64 {
        self.a.distance(p).min(self.b.distance(p))
    }

    fn bounds(&self) -> Aabb {
        self.a.bounds().union(&self.b.bounds())
    }
}

/// Union of an arbitrary list of solids.
///
/// Built through [`super::union`], which guarantees the list is non-empty.
pub struct UnionAll {
    pub solids: Vec<SdfNode>,
    bounds: Aabb,
}

impl UnionAll {
    pub(crate) fn new(solids: Vec<SdfNode>) -> Self {
        let bounds = solids
            .iter()
            .map(Sdf::bounds)
            .reduce(|acc, b| acc.union(&b))
            .unwrap_or(Aabb::new(DVec3::ZERO, DVec3::ZERO));
        Self { solids, bounds }
    }
}

impl Sdf for UnionAll {
    fn distance(&self, p: DVec3) -> f64 {
        self.solids
            .iter()
            .map(|s| s.distance(p))
            .fold(f64::INFINITY, f64::min)
    }

    fn bounds(&self) -> Aabb {
        self.bounds
    }
}

/// Subtraction of two SDFs (cut B from A)
pub struct Subtract<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
}

impl<A: Sdf, B: Sdf> Subtract<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: Sdf, B: Sdf> Sdf for Subtract<A, B> {
    fn distance(&self, p: DVec3) -> f64 {
        self.a.distance(p).max(-self.b.distance(p))
    }

    fn bounds(&self) -> Aabb {
        self.a.bounds() // Subtraction can only reduce, not expand
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdf::primitives::{box3, cylinder};
    use crate::sdf::{SdfExt, Translate, union};
    use approx::assert_relative_eq;

    fn rod(x: f64) -> SdfNode {
        cylinder(10.0, 1.0, 0.0)
            .unwrap()
            .translate(DVec3::new(x, 0.0, 0.0))
    }

    #[test]
    fn union_takes_minimum_distance() {
        let a = cylinder(2.0, 1.0, 0.0).unwrap();
        let b = box3(DVec3::splat(4.0), 0.0).unwrap();
        let u = Union::new(a, b);

        assert_relative_eq!(u.distance(DVec3::ZERO), -2.0, epsilon = 1e-12);
    }

    #[test]
    fn union_inside_either_is_inside() {
        let a = cylinder(2.0, 0.5, 0.0).unwrap();
        let b = Translate::new(a, DVec3::new(3.0, 0.0, 0.0));
        let u = Union::new(a, b);

        assert!(u.distance(DVec3::ZERO) < 0.0);
        assert!(u.distance(DVec3::new(3.0, 0.0, 0.0)) < 0.0);
        assert!(u.distance(DVec3::new(1.5, 0.0, 0.0)) > 0.0);
    }

    #[test]
    fn union_all_matches_pairwise_union() {
        let all = union([rod(-5.0), rod(0.0), rod(5.0)]).unwrap();
        let pairwise = rod(-5.0).union(rod(0.0)).union(rod(5.0));

        for x in [-6.0, -5.0, -2.5, 0.0, 0.5, 3.0, 5.0, 7.0] {
            let p = DVec3::new(x, 0.3, 1.0);
            assert_relative_eq!(all.distance(p), pairwise.distance(p), epsilon = 1e-12);
        }
        assert_eq!(all.bounds(), pairwise.bounds());
    }

    #[test]
    fn union_of_nothing_is_rejected() {
        assert!(union(Vec::new()).is_err());
    }

    #[test]
    fn subtract_carves_out_shape() {
        let outer = cylinder(10.0, 5.0, 0.0).unwrap();
        let bore = cylinder(20.0, 3.0, 0.0).unwrap();
        let tube = Subtract::new(outer, bore);

        assert!(tube.distance(DVec3::ZERO) > 0.0);
        assert!(tube.distance(DVec3::new(4.0, 0.0, 0.0)) < 0.0);
        assert!(tube.distance(DVec3::new(6.0, 0.0, 0.0)) > 0.0);
        assert_relative_eq!(tube.distance(DVec3::new(3.0, 0.0, 0.0)), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn subtract_keeps_base_bounds() {
        let outer = cylinder(10.0, 5.0, 0.0).unwrap();
        let bore = cylinder(20.0, 3.0, 0.0).unwrap();

        assert_eq!(Subtract::new(outer, bore).bounds(), outer.bounds());
    }
}
