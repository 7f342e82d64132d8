//! Assembly driver
//!
//! Resolves dimensions once, walks the composition graph in dependency
//! order, and hands the final solids to the mesher. The first failure
//! aborts the run; nothing is written for a design that did not build.

use crate::dimensions::Dimensions;
use crate::error::{ConstructionContext, DesignError, Result};
use crate::graph::{self, Part};
use crate::params::{CompositionPolicy, DesignParams};
use crate::parts::{Baseplate, BatteryBay, BodyShell, Cover, PostLayout, Shoulder};
use rotorbox_core::export::{ExportFormat, MeshExport, render_mesh};
use rotorbox_core::sdf::{Sdf, SdfExt, SdfNode, union};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One design run
#[derive(Debug, Clone)]
pub struct Assembly {
    params: DesignParams,
    dims: Dimensions,
}

/// Every solid the run built, keyed by part
#[derive(Debug, Clone)]
pub struct AssembledParts {
    policy: CompositionPolicy,
    solids: BTreeMap<Part, SdfNode>,
}

impl AssembledParts {
    pub fn get(&self, part: Part) -> Option<&SdfNode> {
        self.solids.get(&part)
    }

    /// Final parts in export order
    pub fn outputs(&self) -> impl Iterator<Item = (Part, &SdfNode)> + '_ {
        graph::outputs(self.policy)
            .iter()
            .filter_map(|&part| self.solids.get(&part).map(|solid| (part, solid)))
    }
}

/// A part written to disk
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedPart {
    pub part: Part,
    pub path: PathBuf,
    pub triangles: usize,
}

impl Assembly {
    pub fn new(params: DesignParams) -> Result<Self> {
        let dims = Dimensions::resolve(&params)?;
        Ok(Self { params, dims })
    }

    pub fn params(&self) -> &DesignParams {
        &self.params
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dims
    }

    pub fn build(&self) -> Result<AssembledParts> {
        let policy = self.dims.policy();
        let order = graph::plan(policy)?;
        debug!(?policy, ?order, "Resolved build order");

        let mut solids = BTreeMap::new();
        for part in order {
            let solid = self.build_part(part, &solids)?;
            debug!(%part, bounds = ?solid.bounds(), "Built");
            solids.insert(part, solid);
        }
        Ok(AssembledParts { policy, solids })
    }

    /// Mesh every final part, then write them all into `out_dir`. Meshing
    /// finishes before the first file is written, and a failed write removes
    /// the files this call already wrote, so `out_dir` never holds a partial
    /// set of parts.
    pub fn export(
        &self,
        parts: &AssembledParts,
        out_dir: &Path,
        resolution: u32,
        format: ExportFormat,
    ) -> Result<Vec<ExportedPart>> {
        let mut rendered = Vec::new();
        for (part, solid) in parts.outputs() {
            let Some(stem) = part.file_stem() else {
                continue;
            };
            let path = out_dir.join(format!("{stem}.{}", format.extension()));
            let mesh = match render_mesh(solid, resolution) {
                Ok(mesh) => mesh,
                Err(source) => return Err(DesignError::Export { part, path, source }),
            };
            debug!(%part, triangles = mesh.triangle_count(), "Meshed");
            rendered.push((part, path, mesh));
        }

        fs::create_dir_all(out_dir)?;
        let mut written: Vec<ExportedPart> = Vec::with_capacity(rendered.len());
        for (part, path, mesh) in rendered {
            if let Err(source) = mesh.export(&path) {
                for earlier in &written {
                    let _ = fs::remove_file(&earlier.path);
                }
                if !written.is_empty() {
                    warn!(
                        %part,
                        removed = written.len(),
                        "Export failed, removed parts already written"
                    );
                }
                return Err(DesignError::Export { part, path, source });
            }
            info!(
                %part,
                path = %path.display(),
                triangles = mesh.triangle_count(),
                "Wrote {}",
                format.name()
            );
            written.push(ExportedPart {
                part,
                path,
                triangles: mesh.triangle_count(),
            });
        }
        Ok(written)
    }

    /// Build and export in one step
    pub fn run(
        &self,
        out_dir: &Path,
        resolution: u32,
        format: ExportFormat,
    ) -> Result<Vec<ExportedPart>> {
        let parts = self.build()?;
        self.export(&parts, out_dir, resolution, format)
    }

    fn build_part(&self, part: Part, built: &BTreeMap<Part, SdfNode>) -> Result<SdfNode> {
        let params = &self.params;
        let dims = &self.dims;
        let stack = &dims.stack;
        let constants = &dims.constants;

        match part {
            Part::ImuPosts => PostLayout::for_board(&params.imu, stack.imu_post, None)
                .build()
                .during(part),
            Part::FeatherPosts => {
                let shoulder = constants.shoulders.then(|| Shoulder {
                    height: stack.imu_top,
                    diameter: 2.0 * params.feather.post_diameter,
                });
                PostLayout::for_board(&params.feather, stack.feather_post, shoulder)
                    .build()
                    .during(part)
            }
            Part::BatteryBay => BatteryBay::new(
                params.battery,
                params.wall,
                stack.battery_top,
                constants.battery_cutout.then_some(stack.battery_bottom),
            )?
            .build()
            .during(part),
            Part::BaseplateDisc => Baseplate::new(dims.baseplate).build().during(part),
            Part::BodyShell => BodyShell::new(dims.body).build().during(part),
            Part::Cover => Cover::new(dims.cover).build().during(part),
            Part::Baseplate => union(dependencies(part, dims.policy(), built)?).during(part),
            Part::Body => {
                let mut inputs = dependencies(part, dims.policy(), built)?.into_iter();
                let shell = inputs
                    .next()
                    .ok_or(DesignError::MissingDependency {
                        part,
                        missing: Part::BodyShell,
                    })?;
                match dims.policy() {
                    CompositionPolicy::SubtractBaseplate => {
                        let baseplate = union(inputs).during(part)?;
                        Ok(shell.subtract(baseplate))
                    }
                    CompositionPolicy::UnionIntoBody => {
                        union(std::iter::once(shell).chain(inputs)).during(part)
                    }
                }
            }
        }
    }
}

/// Already-built solids `part` is composed from, in declaration order
fn dependencies(
    part: Part,
    policy: CompositionPolicy,
    built: &BTreeMap<Part, SdfNode>,
) -> Result<Vec<SdfNode>> {
    part.dependencies(policy)
        .iter()
        .map(|&dep| {
            built
                .get(&dep)
                .cloned()
                .ok_or(DesignError::MissingDependency { part, missing: dep })
        })
        .collect()
}
