//! OBJ file export

use crate::Result;
use crate::mesh::Mesh;
use std::io::{BufWriter, Write};

/// Write a mesh as Wavefront OBJ with per-vertex normals
pub fn write_obj<W: Write>(mesh: &Mesh, out: W) -> Result<()> {
    let mut writer = BufWriter::new(out);

    // Header
    writeln!(writer, "# rotorbox OBJ export (mm)")?;
    writeln!(writer, "# Vertices: {}", mesh.vertex_count())?;
    writeln!(writer, "# Triangles: {}", mesh.triangle_count())?;
    writeln!(writer)?;

    for v in &mesh.vertices {
        let [x, y, z] = v.position;
        writeln!(writer, "v {x} {y} {z}")?;
    }
    writeln!(writer)?;

    for v in &mesh.vertices {
        let [x, y, z] = v.normal;
        writeln!(writer, "vn {x} {y} {z}")?;
    }
    writeln!(writer)?;

    // Faces (OBJ uses 1-based indexing)
    for tri in mesh.indices.chunks_exact(3) {
        let [i0, i1, i2] = [tri[0] + 1, tri[1] + 1, tri[2] + 1];
        writeln!(writer, "f {i0}//{i0} {i1}//{i1} {i2}//{i2}")?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Vertex;
    use glam::Vec3;

    #[test]
    fn faces_are_one_based() {
        let mesh = Mesh {
            vertices: vec![
                Vertex::new(Vec3::ZERO, Vec3::Z),
                Vertex::new(Vec3::X, Vec3::Z),
                Vertex::new(Vec3::Y, Vec3::Z),
            ],
            indices: vec![0, 1, 2],
        };

        let mut bytes = Vec::new();
        write_obj(&mesh, &mut bytes).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains("f 1//1 2//2 3//3"));
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 3);
        assert_eq!(text.lines().filter(|l| l.starts_with("vn ")).count(), 3);
    }
}
