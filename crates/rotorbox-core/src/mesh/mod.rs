//! Mesh generation from SDFs using marching tetrahedra
//!
//! Uses Rayon for parallel sampling of the voxel grid and for per-cell
//! triangulation. Results are merged in cell order, so the same solid and
//! resolution always give the same mesh, byte for byte.

mod tetra;

use crate::sdf::{Aabb, Sdf};
use crate::{Error, Result};
use glam::{DVec3, Vec3};
use rayon::prelude::*;
use std::collections::HashMap;

use tetra::{CellTriangle, EdgeKey, Grid};

/// A vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }

    fn point(&self) -> DVec3 {
        Vec3::from_array(self.position).as_dvec3()
    }
}

/// A triangle mesh
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Bounding box of all vertices, `None` for an empty mesh
    pub fn bounds(&self) -> Option<Aabb> {
        self.vertices
            .iter()
            .map(|v| {
                let p = v.point();
                Aabb::new(p, p)
            })
            .reduce(|acc, b| acc.union(&b))
    }

    /// Enclosed volume (divergence theorem).
    ///
    /// Positive when triangles wind counter-clockwise seen from outside.
    pub fn volume(&self) -> f64 {
        self.indices
            .chunks_exact(3)
            .map(|tri| {
                let p0 = self.vertices[tri[0] as usize].point();
                let p1 = self.vertices[tri[1] as usize].point();
                let p2 = self.vertices[tri[2] as usize].point();
                p0.dot(p1.cross(p2))
            })
            .sum::<f64>()
            / 6.0
    }

    /// Closed and consistently oriented: every directed edge appears exactly
    /// once and its reverse appears exactly once.
    pub fn is_watertight(&self) -> bool {
        if self.is_empty() {
            return false;
        }
        let mut directed: HashMap<(u32, u32), u32> = HashMap::new();
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                *directed.entry((a, b)).or_insert(0) += 1;
            }
        }
        directed
            .iter()
            .all(|(&(a, b), &count)| count == 1 && directed.get(&(b, a)) == Some(&1))
    }
}

/// Configuration for mesh generation
#[derive(Debug, Clone)]
pub struct MeshConfig {
    /// Number of cubic cells along the longest axis of the solid's bounds
    pub resolution: u32,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self { resolution: 128 }
    }
}

impl MeshConfig {
    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }
}

/// Extension trait to generate meshes from SDFs
pub trait SdfToMesh: Sdf {
    /// Generate a mesh from this SDF
    fn to_mesh(&self, config: &MeshConfig) -> Result<Mesh> {
        generate_mesh(self, config)
    }
}

impl<T: Sdf + ?Sized> SdfToMesh for T {}

/// Generate a closed mesh from an SDF using marching tetrahedra
///
/// - Parallel SDF sampling to build the distance field
/// - Parallel cell processing, six tetrahedra per cell
/// - Sequential merge that welds vertices shared through grid edges
pub fn generate_mesh<S: Sdf + ?Sized>(sdf: &S, config: &MeshConfig) -> Result<Mesh> {
    if config.resolution == 0 {
        return Err(Error::MeshGeneration(
            "resolution must be at least 1".to_string(),
        ));
    }
    let grid = Grid::fit(&sdf.bounds(), config.resolution)?;
    tracing::debug!(
        cells = ?grid.cells,
        step = grid.step,
        "sampling distance field"
    );

    // === Phase 1: Parallel SDF sampling ===
    let values: Vec<f64> = (0..grid.point_count())
        .into_par_iter()
        .map(|idx| sdf.distance(grid.point_position(idx)))
        .collect();

    // === Phase 2: Parallel triangulation ===
    let cell_results: Vec<Vec<CellTriangle>> = (0..grid.cell_count())
        .into_par_iter()
        .filter_map(|cell_idx| tetra::process_cell(&grid, cell_idx, &values))
        .collect();

    // === Phase 3: Merge results, welding by grid edge ===
    let mut mesh = Mesh::new();
    let mut welded: HashMap<EdgeKey, u32> = HashMap::new();
    let mut positions: Vec<DVec3> = Vec::new();

    for triangle in cell_results.into_iter().flatten() {
        for (key, position) in triangle.corners {
            let next = u32::try_from(positions.len()).map_err(|_| {
                Error::MeshGeneration("mesh exceeds u32 vertex indices".to_string())
            })?;
            let index = *welded.entry(key).or_insert_with(|| {
                positions.push(position);
                next
            });
            mesh.indices.push(index);
        }
    }

    let eps = grid.step * 1e-2;
    mesh.vertices = positions
        .par_iter()
        .map(|&p| Vertex::new(p.as_vec3(), compute_gradient(sdf, p, eps).as_vec3()))
        .collect();

    Ok(mesh)
}

/// Compute the gradient (normal) of an SDF at a point
fn compute_gradient<S: Sdf + ?Sized>(sdf: &S, p: DVec3, eps: f64) -> DVec3 {
    let dx = sdf.distance(p + DVec3::X * eps) - sdf.distance(p - DVec3::X * eps);
    let dy = sdf.distance(p + DVec3::Y * eps) - sdf.distance(p - DVec3::Y * eps);
    let dz = sdf.distance(p + DVec3::Z * eps) - sdf.distance(p - DVec3::Z * eps);
    DVec3::new(dx, dy, dz).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdf::SdfExt;
    use crate::sdf::primitives::{box3, cylinder};
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn box_mesh_is_closed_with_matching_volume() {
        let b = box3(DVec3::new(10.0, 6.0, 4.0), 0.0).unwrap();
        let mesh = b.to_mesh(&MeshConfig::default().with_resolution(20)).unwrap();

        assert!(mesh.triangle_count() > 0);
        assert!(mesh.is_watertight());
        assert_relative_eq!(mesh.volume(), 240.0, max_relative = 0.02);
    }

    #[test]
    fn mesh_bounds_follow_the_solid() {
        let c = cylinder(8.0, 5.0, 0.0).unwrap().translate_z(4.0);
        let mesh = c.to_mesh(&MeshConfig::default().with_resolution(40)).unwrap();
        let bounds = mesh.bounds().unwrap();

        assert_relative_eq!(bounds.min.z, 0.0, epsilon = 0.3);
        assert_relative_eq!(bounds.max.z, 8.0, epsilon = 0.3);
        assert_relative_eq!(bounds.max.x, 5.0, epsilon = 0.3);
    }

    #[test]
    fn hollow_cylinder_is_watertight() {
        let tube = cylinder(10.0, 5.0, 0.0)
            .unwrap()
            .subtract(cylinder(12.0, 3.0, 0.0).unwrap());
        let mesh = tube.to_mesh(&MeshConfig::default().with_resolution(48)).unwrap();

        assert!(mesh.is_watertight());
        let expected = PI * (25.0 - 9.0) * 10.0;
        assert_relative_eq!(mesh.volume(), expected, max_relative = 0.05);
    }

    #[test]
    fn normals_point_outward() {
        let c = cylinder(10.0, 5.0, 0.0).unwrap();
        let mesh = c.to_mesh(&MeshConfig::default().with_resolution(24)).unwrap();

        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position);
            let n = Vec3::from_array(v.normal);
            // Away from the axis on the side wall, or up/down on the caps
            let radial = Vec3::new(p.x, p.y, 0.0);
            let cap = Vec3::new(0.0, 0.0, p.z);
            assert!(n.dot(radial) + n.dot(cap) >= -1e-3);
        }
    }

    #[test]
    fn meshing_is_deterministic() {
        let c = cylinder(6.0, 4.0, 1.0)
            .unwrap()
            .union(box3(DVec3::new(3.0, 12.0, 3.0), 0.0).unwrap());
        let config = MeshConfig::default().with_resolution(32);
        let a = c.to_mesh(&config).unwrap();
        let b = c.to_mesh(&config).unwrap();

        assert_eq!(a.indices, b.indices);
        assert_eq!(a.vertices, b.vertices);
    }

    #[test]
    fn zero_resolution_is_rejected() {
        let c = cylinder(1.0, 1.0, 0.0).unwrap();
        assert!(c.to_mesh(&MeshConfig::default().with_resolution(0)).is_err());
    }

    #[test]
    fn empty_mesh_is_not_watertight() {
        assert!(!Mesh::new().is_watertight());
        assert!(Mesh::new().bounds().is_none());
    }

    #[test]
    fn stacked_discs_sharing_a_sample_plane_stay_closed() {
        // Bounds are z -2.5..2.5 with a 1 mm step and an even cell count, so
        // a row of samples lies exactly on the shared face at z = 0 where
        // the union's distance is zero
        let cap = cylinder(2.5, 5.0, 0.0).unwrap().translate_z(1.25);
        let step = cylinder(2.5, 3.0, 0.0).unwrap().translate_z(-1.25);
        let disc = cap.union(step);
        let mesh = disc.to_mesh(&MeshConfig::default().with_resolution(10)).unwrap();

        assert!(mesh.is_watertight());
        assert!(mesh.volume() > 0.0);
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let c = cylinder(1.0, 1.0, 0.0).unwrap();
        let err = c.to_mesh(&MeshConfig::default().with_resolution(u32::MAX)).unwrap_err();

        assert!(matches!(err, Error::MeshGeneration(_)));
    }
}
