//! Signed Distance Functions (SDF) for solid definition
//!
//! SDFs represent shapes as functions that return the distance from any
//! point in space to the nearest surface. Negative values are inside,
//! positive values are outside, and zero is exactly on the surface.
//!
//! ## Example
//!
//! ```rust,ignore
//! use rotorbox_core::prelude::*;
//!
//! // A 20 mm standoff sitting on the bed
//! let post = cylinder(20.0, 1.0, 0.0)?.translate_z(10.0);
//!
//! // A plate with the standoff on top
//! let plate = box3(DVec3::new(40.0, 30.0, 3.0), 1.0)?.translate_z(1.5);
//! let part = plate.union(post);
//! ```

pub mod operations;
pub mod primitives;
pub mod transforms;

use crate::{Error, Result};
use glam::{DVec2, DVec3};

/// The core SDF trait - any type that can compute distance from a point
pub trait Sdf: Send + Sync {
    /// Calculate the signed distance from point `p` to the surface.
    ///
    /// - Returns negative values for points inside the shape
    /// - Returns positive values for points outside the shape
    /// - Returns zero for points exactly on the surface
    fn distance(&self, p: DVec3) -> f64;

    /// Bounding box enclosing every point where `distance` is negative.
    /// Mesh extraction samples inside this box.
    fn bounds(&self) -> Aabb;
}

/// A 2D profile used as a loft cross-section
pub trait Sdf2d: Send + Sync {
    /// Signed distance in the XY plane
    fn distance(&self, p: DVec2) -> f64;

    /// Bounding rectangle of the profile
    fn bounds(&self) -> Aabb2;
}

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Merge two bounding boxes
    pub fn union(&self, other: &Aabb) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Move the box by `offset`
    pub fn translate(&self, offset: DVec3) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }

    /// Get the size of the bounding box
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Get the center of the bounding box
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }
}

/// Axis-aligned bounding rectangle for 2D profiles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2 {
    pub min: DVec2,
    pub max: DVec2,
}

impl Aabb2 {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    pub fn union(&self, other: &Aabb2) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }
}

/// An SDF node that can be composed and transformed
#[derive(Clone)]
pub struct SdfNode {
    inner: std::sync::Arc<dyn Sdf>,
}

impl SdfNode {
    /// Create a new SDF node from any type implementing Sdf
    pub fn new<S: Sdf + 'static>(sdf: S) -> Self {
        Self {
            inner: std::sync::Arc::new(sdf),
        }
    }
}

impl Sdf for SdfNode {
    fn distance(&self, p: DVec3) -> f64 {
        self.inner.distance(p)
    }

    fn bounds(&self) -> Aabb {
        self.inner.bounds()
    }
}

impl std::fmt::Debug for SdfNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdfNode")
            .field("bounds", &self.inner.bounds())
            .finish()
    }
}

/// Extension trait providing chainable operations on SDFs
pub trait SdfExt: Sdf + Sized + 'static {
    /// Union: combine two shapes (OR)
    fn union<S: Sdf + 'static>(self, other: S) -> SdfNode {
        SdfNode::new(operations::Union::new(self, other))
    }

    /// Subtraction: cut shape `other` from `self`
    fn subtract<S: Sdf + 'static>(self, other: S) -> SdfNode {
        SdfNode::new(operations::Subtract::new(self, other))
    }

    /// Translate (move) the shape
    fn translate(self, offset: DVec3) -> SdfNode {
        SdfNode::new(transforms::Translate::new(self, offset))
    }

    /// Translate along Z axis
    fn translate_z(self, z: f64) -> SdfNode {
        self.translate(DVec3::new(0.0, 0.0, z))
    }
}

// Implement SdfExt for all types that implement Sdf
impl<T: Sdf + 'static> SdfExt for T {}

/// Union of any number of solids.
///
/// Fails when `solids` is empty, since an empty union has no surface to mesh.
pub fn union<I>(solids: I) -> Result<SdfNode>
where
    I: IntoIterator<Item = SdfNode>,
{
    let mut solids: Vec<SdfNode> = solids.into_iter().collect();
    match solids.len() {
        0 => Err(Error::InvalidParameter(
            "union requires at least one solid".to_string(),
        )),
        1 => Ok(solids.remove(0)),
        _ => Ok(SdfNode::new(operations::UnionAll::new(solids))),
    }
}

// Re-exports
pub use operations::*;
pub use primitives::*;
pub use transforms::*;
