//! Sampling grid and per-cell marching tetrahedra

use crate::sdf::Aabb;
use crate::{Error, Result};
use glam::DVec3;

/// Grid edge identified by its two endpoint indices, smaller first
pub(super) type EdgeKey = (usize, usize);

/// Cube corner offsets, in the usual marching cubes order
const CORNERS: [(usize, usize, usize); 8] = [
    (0, 0, 0),
    (1, 0, 0),
    (1, 1, 0),
    (0, 1, 0),
    (0, 0, 1),
    (1, 0, 1),
    (1, 1, 1),
    (0, 1, 1),
];

/// Six tetrahedra sharing the cube diagonal 0-6. Every face diagonal this
/// split produces runs from the low corner to the high corner, so adjacent
/// cells triangulate their shared face identically.
const TETRAHEDRA: [[usize; 4]; 6] = [
    [0, 5, 1, 6],
    [0, 1, 2, 6],
    [0, 2, 3, 6],
    [0, 3, 7, 6],
    [0, 7, 4, 6],
    [0, 4, 5, 6],
];

/// Upper bound on distance samples per grid
pub(super) const MAX_GRID_POINTS: usize = 1 << 30;

/// Regular sampling grid with cubic cells
#[derive(Debug, Clone)]
pub(super) struct Grid {
    pub origin: DVec3,
    pub step: f64,
    /// Cell count along each axis
    pub cells: [usize; 3],
}

impl Grid {
    /// Cover `bounds` with cubic cells, `resolution` of them along the
    /// longest axis, plus one cell of padding so the outermost samples lie
    /// outside the solid.
    pub fn fit(bounds: &Aabb, resolution: u32) -> Result<Self> {
        let size = bounds.size();
        if !size.is_finite() || size.min_element() <= 0.0 {
            return Err(Error::MeshGeneration(format!(
                "cannot sample empty or unbounded region {:?}",
                bounds
            )));
        }
        let step = size.max_element() / f64::from(resolution);
        let counts = (size / step).ceil() + DVec3::ONE;
        let cells = counts.to_array().map(|c| c as usize);
        let points = cells
            .iter()
            .try_fold(1usize, |acc, &c| acc.checked_mul(c.checked_add(1)?));
        if points.is_none_or(|n| n > MAX_GRID_POINTS) {
            return Err(Error::MeshGeneration(format!(
                "resolution {resolution} is too large: {cells:?} cells exceed {MAX_GRID_POINTS} samples"
            )));
        }
        let origin = bounds.center() - counts * step * 0.5;
        Ok(Self {
            origin,
            step,
            cells,
        })
    }

    fn points_per_axis(&self) -> [usize; 3] {
        [self.cells[0] + 1, self.cells[1] + 1, self.cells[2] + 1]
    }

    pub fn point_count(&self) -> usize {
        let [nx, ny, nz] = self.points_per_axis();
        nx * ny * nz
    }

    pub fn cell_count(&self) -> usize {
        self.cells[0] * self.cells[1] * self.cells[2]
    }

    fn point_index(&self, x: usize, y: usize, z: usize) -> usize {
        let [nx, ny, _] = self.points_per_axis();
        (z * ny + y) * nx + x
    }

    pub fn point_position(&self, idx: usize) -> DVec3 {
        let [nx, ny, _] = self.points_per_axis();
        let x = idx % nx;
        let y = (idx / nx) % ny;
        let z = idx / (nx * ny);
        self.origin + DVec3::new(x as f64, y as f64, z as f64) * self.step
    }
}

/// One output triangle: each corner is the welded edge key and its position
pub(super) struct CellTriangle {
    pub corners: [(EdgeKey, DVec3); 3],
}

/// A tetrahedron corner as seen by the triangulation
#[derive(Clone, Copy)]
struct Corner {
    index: usize,
    position: DVec3,
    value: f64,
}

/// Samples at or below zero count as inside. Treating exact zeros the same
/// everywhere keeps coincident faces of a union from splitting into two
/// facing sheets.
fn is_inside(value: f64) -> bool {
    value <= 0.0
}

/// Triangulate one cell. Returns `None` when the surface misses the cell.
pub(super) fn process_cell(grid: &Grid, cell_idx: usize, values: &[f64]) -> Option<Vec<CellTriangle>> {
    let [cx, cy, _] = grid.cells;
    let x = cell_idx % cx;
    let y = (cell_idx / cx) % cy;
    let z = cell_idx / (cx * cy);

    let corners = CORNERS.map(|(dx, dy, dz)| {
        let index = grid.point_index(x + dx, y + dy, z + dz);
        Corner {
            index,
            position: grid.point_position(index),
            value: values[index],
        }
    });

    let inside = corners.map(|c| is_inside(c.value));
    if inside.iter().all(|&i| i) || inside.iter().all(|&i| !i) {
        return None;
    }

    let mut triangles = Vec::new();
    for tet in TETRAHEDRA {
        let tet = tet.map(|i| corners[i]);
        triangulate_tetrahedron(&tet, &mut triangles);
    }

    (!triangles.is_empty()).then_some(triangles)
}

fn triangulate_tetrahedron(tet: &[Corner; 4], out: &mut Vec<CellTriangle>) {
    let (inside, outside): (Vec<Corner>, Vec<Corner>) =
        tet.iter().copied().partition(|c| is_inside(c.value));

    match (inside.as_slice(), outside.as_slice()) {
        (&[a], &[b, c, d]) => {
            let flip = is_left_handed(a, b, c, d);
            push_triangle(out, [(a, b), (a, c), (a, d)], flip);
        }
        (&[a, b, c], &[d]) => {
            let flip = is_left_handed(a, b, c, d);
            push_triangle(out, [(a, d), (b, d), (c, d)], flip);
        }
        (&[a, b], &[c, d]) => {
            // Quad ac-ad-bd-bc, split along ac-bd
            let flip = is_left_handed(a, b, c, d);
            push_triangle(out, [(a, c), (a, d), (b, d)], flip);
            push_triangle(out, [(a, c), (b, d), (b, c)], flip);
        }
        _ => {}
    }
}

/// Orientation of the tetrahedron `abcd` taken from its grid corners, which
/// never degenerate. With the labels above, a right-handed `abcd` already
/// winds every emitted triangle with its normal pointing from the inside
/// corners to the outside ones; a left-handed one needs the winding flipped.
/// The crossing points themselves are never consulted, so triangles that
/// collapse onto a sample still get a consistent winding.
fn is_left_handed(a: Corner, b: Corner, c: Corner, d: Corner) -> bool {
    let (ab, ac, ad) = (
        b.position - a.position,
        c.position - a.position,
        d.position - a.position,
    );
    ab.cross(ac).dot(ad) < 0.0
}

/// Emit a triangle over three (inside, outside) edges
fn push_triangle(out: &mut Vec<CellTriangle>, edges: [(Corner, Corner); 3], flip: bool) {
    let mut corners = edges.map(|(inner, outer)| edge_vertex(inner, outer));
    if flip {
        corners.swap(1, 2);
    }
    out.push(CellTriangle { corners });
}

/// Interpolate the zero crossing on an edge. Endpoints are put in index
/// order first so both cells sharing the edge compute the same bits.
fn edge_vertex(a: Corner, b: Corner) -> (EdgeKey, DVec3) {
    let (lo, hi) = if a.index < b.index { (a, b) } else { (b, a) };
    let t = -lo.value / (hi.value - lo.value);
    let position = lo.position + (hi.position - lo.position) * t;
    ((lo.index, hi.index), position)
}
