//! STL file export (Binary format)
//!
//! STL (stereolithography) is the usual slicer input for 3D printing. Binary
//! STL carries no units; rotorbox writes millimeters.

use crate::Result;
use crate::mesh::Mesh;
use glam::Vec3;
use std::io::{BufWriter, Write};

/// Write a mesh as binary STL
///
/// Binary STL format:
/// - 80 bytes: Header (arbitrary text)
/// - 4 bytes: Number of triangles (u32 little-endian)
/// - For each triangle (50 bytes):
///   - 12 bytes: Normal vector (3 x f32 little-endian)
///   - 36 bytes: 3 vertices (9 x f32 little-endian)
///   - 2 bytes: Attribute byte count (usually 0)
pub fn write_stl<W: Write>(mesh: &Mesh, out: W) -> Result<()> {
    let mut writer = BufWriter::new(out);

    // Header (80 bytes, padded with spaces). No timestamps, so identical
    // meshes give identical files.
    let header = format!(
        "rotorbox binary STL - {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    let mut header_bytes = [b' '; 80];
    let header_len = header.len().min(80);
    header_bytes[..header_len].copy_from_slice(&header.as_bytes()[..header_len]);
    writer.write_all(&header_bytes)?;

    let num_triangles = u32::try_from(mesh.triangle_count()).map_err(|_| {
        crate::Error::Export("too many triangles for binary STL".to_string())
    })?;
    writer.write_all(&num_triangles.to_le_bytes())?;

    for tri in mesh.indices.chunks_exact(3) {
        let p0 = Vec3::from_array(mesh.vertices[tri[0] as usize].position);
        let p1 = Vec3::from_array(mesh.vertices[tri[1] as usize].position);
        let p2 = Vec3::from_array(mesh.vertices[tri[2] as usize].position);

        // STL expects face normals; degenerate slivers get +Z
        let normal = (p1 - p0).cross(p2 - p0).try_normalize().unwrap_or(Vec3::Z);

        for v in [normal, p0, p1, p2] {
            for c in v.to_array() {
                writer.write_all(&c.to_le_bytes())?;
            }
        }

        // Attribute byte count
        writer.write_all(&0u16.to_le_bytes())?;
    }

    writer.flush()?;
    Ok(())
}
