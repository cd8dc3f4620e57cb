//! The generation driver.
//!
//! Planning, sampling and trimming run sequentially in plan order, because
//! trimmed ribs depend on the reference path kept from the first full rib.
//! The sweeps that follow are independent and run on the rayon pool unless
//! the configuration asks otherwise. Results are collected in plan order.

use holder_kernel_sketch::Polygon2;
use holder_kernel_sweep::{loft_along, sweep, LoftSection, SweepError, SweepOptions, TriangleMesh};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{GrabberConfig, MeshConfig, Side};
use crate::cradle::CradlePlan;
use crate::error::{Result, RibError};
use crate::path::{sample_path, SampledPath};
use crate::planner::{plan, RibPlan};
use crate::report::{BuiltRib, RunReport, TrimmedRib};
use crate::section::{CrossSection, SectionParams};
use crate::trim::{trim_path, ClosestApproach, ReferencePath};

/// Rib family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RibGroup {
    /// Spiral rib on the left side.
    Left,
    /// Spiral rib on the right side.
    Right,
    /// Lofted rib round the back.
    Cradle,
}

impl From<Side> for RibGroup {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => RibGroup::Left,
            Side::Right => RibGroup::Right,
        }
    }
}

impl std::fmt::Display for RibGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RibGroup::Left => write!(f, "left"),
            RibGroup::Right => write!(f, "right"),
            RibGroup::Cradle => write!(f, "cradle"),
        }
    }
}

/// Identity of a rib: family and index within it (0 = topmost/outermost).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RibId {
    /// Rib family.
    pub group: RibGroup,
    /// Index within the family.
    pub index: usize,
}

impl RibId {
    /// Spiral rib `index` on `side`.
    pub fn side(side: Side, index: usize) -> Self {
        Self {
            group: side.into(),
            index,
        }
    }

    /// Cradle rib `index`.
    pub fn cradle(index: usize) -> Self {
        Self {
            group: RibGroup::Cradle,
            index,
        }
    }
}

impl std::fmt::Display for RibId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.group, self.index)
    }
}

/// A generated rib solid.
#[derive(Debug, Clone)]
pub struct Rib {
    /// Identity.
    pub id: RibId,
    /// Closed rib mesh.
    pub mesh: TriangleMesh,
    /// The path the rib was swept along (after trimming).
    pub path: SampledPath,
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct Generation {
    /// Built ribs in plan order.
    pub ribs: Vec<Rib>,
    /// Per-rib outcomes.
    pub report: RunReport,
}

/// A rib ready to sweep.
#[derive(Debug, Clone)]
enum SweepJob {
    Single {
        section: Polygon2,
        path: SampledPath,
    },
    Loft {
        sections: Vec<LoftSection>,
        path: SampledPath,
        options: SweepOptions,
    },
}

impl SweepJob {
    fn path(&self) -> &SampledPath {
        match self {
            SweepJob::Single { path, .. } | SweepJob::Loft { path, .. } => path,
        }
    }

    fn run(&self) -> std::result::Result<TriangleMesh, SweepError> {
        match self {
            SweepJob::Single { section, path } => {
                sweep(section, path.primary(), path.twin(), SweepOptions::default())
            }
            SweepJob::Loft {
                sections,
                path,
                options,
            } => loft_along(sections, path.primary(), path.twin(), *options),
        }
    }
}

/// A rib waiting for its sweep. The trim is reported only if the sweep
/// succeeds.
struct PendingRib {
    id: RibId,
    job: SweepJob,
    trim: Option<ClosestApproach>,
}

/// A sampled (and possibly trimmed) spiral rib.
struct PreparedRib {
    path: SampledPath,
    trim: Option<ClosestApproach>,
}

/// Sample one spiral rib and trim it if flagged.
///
/// The reference path is threaded through: it is set from the first
/// successfully sampled rib that is not itself trimmed, and returned
/// unchanged otherwise.
fn prepare_spiral_rib(
    rib: &RibPlan,
    reference: Option<ReferencePath>,
    threshold: f64,
) -> (std::result::Result<PreparedRib, RibError>, Option<ReferencePath>) {
    let path = match sample_path(&rib.path) {
        Ok(path) => path,
        Err(err) => return (Err(err), reference),
    };

    if rib.trim {
        let outcome = trim_path(&path, reference.as_ref(), threshold).map(|(path, closest)| {
            PreparedRib {
                path,
                trim: Some(closest),
            }
        });
        return (outcome, reference);
    }

    let reference = reference.or_else(|| Some(ReferencePath::from_path(&path)));
    (Ok(PreparedRib { path, trim: None }), reference)
}

fn section_polygon(
    params: &SectionParams,
    mesh: &MeshConfig,
) -> std::result::Result<Polygon2, RibError> {
    Ok(CrossSection::new(params)?.polygon(mesh.arc_segments, mesh.blend_segments))
}

fn prepare_cradle_rib(
    plan: &CradlePlan,
    mesh: &MeshConfig,
) -> std::result::Result<SweepJob, RibError> {
    let path = sample_path(&plan.path)?;
    let sections = plan
        .sections
        .iter()
        .map(|(progress, params)| {
            Ok(LoftSection {
                progress: *progress,
                polygon: section_polygon(params, mesh)?,
            })
        })
        .collect::<std::result::Result<Vec<_>, RibError>>()?;
    Ok(SweepJob::Loft {
        sections,
        path,
        options: plan.options,
    })
}

/// Generate every rib described by `config`.
///
/// # Errors
///
/// Only [`crate::GrabberError::InvalidConfig`]: per-rib failures are
/// recorded in the report and the run continues.
pub fn generate(config: &GrabberConfig) -> Result<Generation> {
    let plan = plan(config)?;
    info!(
        "Generating {} ribs (core {:.1} deg, radial offset {:.2} mm, parallel={})",
        plan.rib_count(),
        config.core_angle(),
        config.radial_offset(),
        config.parallel
    );

    let mut report = RunReport::default();
    let mut pending: Vec<PendingRib> = Vec::with_capacity(plan.rib_count());
    let mut reference: Option<ReferencePath> = None;

    for side_plan in &plan.sides {
        debug!(
            side = %side_plan.side,
            count = side_plan.count(),
            trim_count = side_plan.trim_count,
            "Planned side: span {:.2} mm, period {:.2} mm",
            side_plan.vertical_span,
            side_plan.period
        );
        for rib in &side_plan.ribs {
            let id = RibId::side(rib.side, rib.index);
            let (outcome, next) =
                prepare_spiral_rib(rib, reference, config.half.trim_threshold);
            reference = next;

            let job = outcome.and_then(|prepared| {
                if let Some(closest) = prepared.trim {
                    debug!(
                        rib = %id,
                        closest = closest.index,
                        distance = closest.distance,
                        "Trimmed against reference"
                    );
                }
                let job = SweepJob::Single {
                    section: section_polygon(&rib.section, &config.mesh)?,
                    path: prepared.path,
                };
                Ok((job, prepared.trim))
            });
            match job {
                Ok((job, trim)) => {
                    debug!(rib = %id, samples = job.path().len(), "Sampled path");
                    pending.push(PendingRib { id, job, trim });
                }
                Err(err) => {
                    warn!(side = %rib.side, index = rib.index, "Skipping rib: {}", err);
                    report.record_skip(id, &err);
                }
            }
        }
    }

    for cradle in &plan.cradle {
        let id = RibId::cradle(cradle.index);
        match prepare_cradle_rib(cradle, &config.mesh) {
            Ok(job) => {
                debug!(rib = %id, samples = job.path().len(), "Sampled cradle path");
                pending.push(PendingRib {
                    id,
                    job,
                    trim: None,
                });
            }
            Err(err) => {
                warn!(rib = %id, "Skipping cradle rib: {}", err);
                report.record_skip(id, &err);
            }
        }
    }

    let meshes: Vec<std::result::Result<TriangleMesh, SweepError>> = if config.parallel {
        pending.par_iter().map(|p| p.job.run()).collect()
    } else {
        pending.iter().map(|p| p.job.run()).collect()
    };
    let ribs = record_sweeps(&mut report, pending, meshes);

    info!(
        "Built {} ribs, trimmed {}, skipped {}",
        report.built.len(),
        report.trimmed.len(),
        report.skipped.len()
    );
    Ok(Generation { ribs, report })
}

/// Record sweep outcomes in plan order and keep the built ribs.
fn record_sweeps(
    report: &mut RunReport,
    pending: Vec<PendingRib>,
    meshes: Vec<std::result::Result<TriangleMesh, SweepError>>,
) -> Vec<Rib> {
    let mut ribs = Vec::with_capacity(pending.len());
    for (PendingRib { id, job, trim }, mesh) in pending.into_iter().zip(meshes) {
        match mesh {
            Ok(mesh) => {
                if let Some(closest) = trim {
                    report.trimmed.push(TrimmedRib {
                        rib: id,
                        closest,
                        kept_samples: job.path().len(),
                    });
                }
                report.built.push(BuiltRib {
                    rib: id,
                    samples: job.path().len(),
                    triangles: mesh.num_triangles(),
                    volume: mesh.signed_volume(),
                });
                let path = match job {
                    SweepJob::Single { path, .. } | SweepJob::Loft { path, .. } => path,
                };
                ribs.push(Rib { id, mesh, path });
            }
            Err(err) => {
                let err = RibError::SweepFailure(err);
                warn!(rib = %id, "Sweep failed: {}", err);
                report.record_skip(id, &err);
            }
        }
    }
    ribs
}
