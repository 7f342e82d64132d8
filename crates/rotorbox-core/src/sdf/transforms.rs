//! SDF Transforms - rigid translation

use super::{Aabb, Sdf};
use glam::DVec3;

/// Translation transform
pub struct Translate<S: Sdf> {
    pub inner: S,
    pub offset: DVec3,
}

impl<S: Sdf> Translate<S> {
    pub fn new(inner: S, offset: DVec3) -> Self {
        Self { inner, offset }
    }
}

impl<S: Sdf> Sdf for Translate<S> {
    fn distance(&self, p: DVec3) -> f64 {
        self.inner.distance(p - self.offset)
    }

    fn bounds(&self) -> Aabb {
        self.inner.bounds().translate(self.offset)
    }
}
