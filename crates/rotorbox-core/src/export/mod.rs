//! Export functionality for meshes
//!
//! Files are written to a sibling `.partial` path and renamed into place once
//! complete, so a failed export never leaves a truncated mesh behind.

mod obj;
mod stl;

use crate::mesh::{Mesh, MeshConfig, SdfToMesh};
use crate::sdf::Sdf;
use crate::{Error, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

pub use obj::write_obj;
pub use stl::write_stl;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Binary STL, the usual slicer input
    #[default]
    Stl,
    /// Wavefront OBJ
    Obj,
}

impl ExportFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "stl" => Some(Self::Stl),
            "obj" => Some(Self::Obj),
            _ => None,
        }
    }

    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Stl => "stl",
            Self::Obj => "obj",
        }
    }

    /// Get a human-readable name for this format
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stl => "STL (Binary)",
            Self::Obj => "OBJ",
        }
    }
}

/// Extension trait for exporting meshes
pub trait MeshExport {
    /// Export mesh to file, auto-detecting format from extension
    fn export<P: AsRef<Path>>(&self, path: P) -> Result<()>;

    /// Export mesh to binary STL
    fn export_stl<P: AsRef<Path>>(&self, path: P) -> Result<()>;

    /// Export mesh to OBJ
    fn export_obj<P: AsRef<Path>>(&self, path: P) -> Result<()>;
}

impl MeshExport for Mesh {
    fn export<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        match ExportFormat::from_extension(path) {
            Some(ExportFormat::Stl) => self.export_stl(path),
            Some(ExportFormat::Obj) => self.export_obj(path),
            None => Err(Error::Export(format!(
                "Unknown file extension: {}",
                path.display()
            ))),
        }
    }

    fn export_stl<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_atomically(path.as_ref(), |file| write_stl(self, file))
    }

    fn export_obj<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_atomically(path.as_ref(), |file| write_obj(self, file))
    }
}

/// Sample `solid` at `resolution` cells along its longest axis into a mesh
/// ready for export. A solid with no surface is an error.
pub fn render_mesh<S>(solid: &S, resolution: u32) -> Result<Mesh>
where
    S: Sdf + ?Sized,
{
    let mesh = solid.to_mesh(&MeshConfig::default().with_resolution(resolution))?;
    if mesh.is_empty() {
        return Err(Error::MeshGeneration("solid has no surface".to_string()));
    }
    Ok(mesh)
}

/// Render `solid` and write the mesh to `path`. The format follows the file
/// extension.
pub fn render_to_mesh_file<S, P>(solid: &S, resolution: u32, path: P) -> Result<Mesh>
where
    S: Sdf + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if ExportFormat::from_extension(path).is_none() {
        return Err(Error::Export(format!(
            "Unknown file extension: {}",
            path.display()
        )));
    }

    let mesh = render_mesh(solid, resolution)?;
    mesh.export(path)?;
    tracing::debug!(
        path = %path.display(),
        triangles = mesh.triangle_count(),
        "mesh written"
    );
    Ok(mesh)
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("mesh"), OsString::from);
    name.push(".partial");
    path.with_file_name(name)
}

fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut fs::File) -> Result<()>,
{
    let partial = partial_path(path);
    let outcome = fs::File::create(&partial)
        .map_err(Error::from)
        .and_then(|mut file| {
            write(&mut file)?;
            file.sync_all()?;
            Ok(())
        })
        .and_then(|()| fs::rename(&partial, path).map_err(Error::from));

    if outcome.is_err() {
        let _ = fs::remove_file(&partial);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdf::primitives::cylinder;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rotorbox_export_{}_{}", std::process::id(), name))
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ExportFormat::from_extension(Path::new("a.stl")), Some(ExportFormat::Stl));
        assert_eq!(ExportFormat::from_extension(Path::new("a.OBJ")), Some(ExportFormat::Obj));
        assert_eq!(ExportFormat::from_extension(Path::new("a.glb")), None);
        assert_eq!(ExportFormat::from_extension(Path::new("noext")), None);
    }

    #[test]
    fn partial_path_is_a_sibling() {
        assert_eq!(
            partial_path(Path::new("/tmp/out/body.stl")),
            PathBuf::from("/tmp/out/body.stl.partial")
        );
    }

    #[test]
    fn render_writes_file_and_cleans_up_partial() {
        let path = temp_path("post.stl");
        let post = cylinder(10.0, 2.0, 0.0).unwrap();

        let mesh = render_to_mesh_file(&post, 16, &path).unwrap();

        assert!(mesh.triangle_count() > 0);
        let size = fs::metadata(&path).unwrap().len();
        assert_eq!(size, 84 + 50 * mesh.triangle_count() as u64);
        assert!(!partial_path(&path).exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn render_rejects_unknown_extension() {
        let path = temp_path("post.glb");
        let post = cylinder(10.0, 2.0, 0.0).unwrap();

        assert!(matches!(
            render_to_mesh_file(&post, 16, &path),
            Err(Error::Export(_))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn failed_write_leaves_no_file() {
        let path = temp_path("missing_dir").join("body.stl");
        let post = cylinder(10.0, 2.0, 0.0).unwrap();

        assert!(render_to_mesh_file(&post, 8, &path).is_err());
        assert!(!path.exists());
    }
}
