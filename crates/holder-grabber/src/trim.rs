//! Trimming partial ribs against the reference path.

use holder_kernel_math::Point3;
use serde::Serialize;

use crate::error::RibError;
use crate::path::SampledPath;

/// The primary path of the first full rib of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencePath {
    points: Vec<Point3>,
}

impl ReferencePath {
    /// Retain the primary samples of `path`.
    pub fn from_path(path: &SampledPath) -> Self {
        Self {
            points: path.primary().to_vec(),
        }
    }

    /// Reference samples.
    pub fn points(&self) -> &[Point3] {
        &self.points
    }
}

/// Closest pair of samples between a candidate path and the reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClosestApproach {
    /// Index into the candidate's untrimmed samples.
    pub index: usize,
    /// Index into the reference samples.
    pub reference_index: usize,
    /// Distance between the two samples (mm).
    pub distance: f64,
}

/// Dense search for the closest sample pair.
///
/// Ties keep the earliest candidate sample. Returns `None` if either slice
/// is empty.
pub fn closest_approach(candidate: &[Point3], reference: &[Point3]) -> Option<ClosestApproach> {
    let mut best: Option<ClosestApproach> = None;
    for (i, p) in candidate.iter().enumerate() {
        for (j, q) in reference.iter().enumerate() {
            let distance = (p - q).norm();
            if best.map_or(true, |b| distance < b.distance) {
                best = Some(ClosestApproach {
                    index: i,
                    reference_index: j,
                    distance,
                });
            }
        }
    }
    best
}

/// Trim `path` to start just past its closest approach to `reference`.
///
/// Keeps samples `closest + 1 ..` of both primary and twin. The returned
/// approach indexes the samples of `path` as originally sampled.
///
/// # Errors
///
/// - [`RibError::TrimUnresolved`] without a reference, or when the closest
///   approach is farther than `threshold`
/// - [`RibError::GeometryDegenerate`] if fewer than two samples remain
pub fn trim_path(
    path: &SampledPath,
    reference: Option<&ReferencePath>,
    threshold: f64,
) -> Result<(SampledPath, ClosestApproach), RibError> {
    let reference = reference.ok_or(RibError::TrimUnresolved { distance: None })?;
    let closest = closest_approach(path.primary(), reference.points())
        .ok_or(RibError::TrimUnresolved { distance: None })?;
    if closest.distance > threshold {
        return Err(RibError::TrimUnresolved {
            distance: Some(closest.distance),
        });
    }
    let trimmed = path.keep_after(closest.index)?;
    Ok((
        trimmed,
        ClosestApproach {
            index: path.first_index() + closest.index,
            ..closest
        },
    ))
}
