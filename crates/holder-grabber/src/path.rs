//! Path sampling around the cylinder.
//!
//! A rib path is a list of points at a fixed distance from the Z axis whose
//! angle and height follow closed-form [`Law`]s. Every path comes with a twin
//! sampled from the same laws plus a tiny offset; the sweep uses the twin to
//! orient the cross-section.

use holder_kernel_math::{polar_point, Point3};

use crate::error::RibError;
use crate::law::Law;

/// Everything needed to sample one rib path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSpec {
    /// Distance of every sample from the cylinder axis (mm).
    pub radial_offset: f64,
    /// Polar angle in degrees.
    pub angle: Law,
    /// Height along the axis (mm).
    pub height: Law,
    /// Angle offset of the twin path (degrees).
    pub twin_angle: Law,
    /// Height offset of the twin path (mm).
    pub twin_height: Law,
    /// Planned number of samples.
    pub samples: usize,
    /// Stop before any sample whose angular travel from the first sample
    /// exceeds this many degrees.
    pub max_travel: Option<f64>,
}

impl PathSpec {
    /// Progress of sample `index`.
    pub fn progress(&self, index: usize) -> f64 {
        if self.samples < 2 {
            0.0
        } else {
            index as f64 / (self.samples - 1) as f64
        }
    }
}

/// A sampled primary path with its twin.
///
/// Keeps the index of its first sample in the untrimmed path so trimmed
/// paths can still be related to the untrimmed sampling.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledPath {
    primary: Vec<Point3>,
    twin: Vec<Point3>,
    travel: Vec<f64>,
    first_index: usize,
}

impl SampledPath {
    /// Primary samples.
    pub fn primary(&self) -> &[Point3] {
        &self.primary
    }

    /// Twin samples, one per primary sample.
    pub fn twin(&self) -> &[Point3] {
        &self.twin
    }

    /// Absolute angular travel (degrees) of each sample from the path start.
    pub fn travel(&self) -> &[f64] {
        &self.travel
    }

    /// Index of the first kept sample in the untrimmed path.
    pub fn first_index(&self) -> usize {
        self.first_index
    }

    /// Indices of the kept samples in the untrimmed path.
    pub fn original_indices(&self) -> std::ops::Range<usize> {
        self.first_index..self.first_index + self.primary.len()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.primary.len()
    }

    /// Check if the path has no samples.
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    /// Keep only the samples after local index `index`.
    ///
    /// # Errors
    ///
    /// [`RibError::GeometryDegenerate`] if fewer than two samples remain.
    pub fn keep_after(&self, index: usize) -> Result<SampledPath, RibError> {
        let start = (index + 1).min(self.len());
        let remaining = self.len() - start;
        if remaining < 2 {
            return Err(RibError::GeometryDegenerate { samples: remaining });
        }
        Ok(SampledPath {
            primary: self.primary[start..].to_vec(),
            twin: self.twin[start..].to_vec(),
            travel: self.travel[start..].to_vec(),
            first_index: self.first_index + start,
        })
    }
}

/// Sample a path and its twin.
///
/// Sampling stops early at the first sample whose angular travel would
/// exceed `spec.max_travel`.
///
/// # Errors
///
/// [`RibError::GeometryDegenerate`] if fewer than two samples result.
pub fn sample_path(spec: &PathSpec) -> Result<SampledPath, RibError> {
    let start_angle = spec.angle.initial();
    let mut primary = Vec::with_capacity(spec.samples);
    let mut twin = Vec::with_capacity(spec.samples);
    let mut travel = Vec::with_capacity(spec.samples);

    for index in 0..spec.samples {
        let p = spec.progress(index);
        let angle = spec.angle.eval(p, index);
        let moved = (angle - start_angle).abs();
        if spec.max_travel.is_some_and(|max| moved > max) {
            break;
        }
        let z = spec.height.eval(p, index);
        primary.push(polar_point(spec.radial_offset, angle, z));
        twin.push(polar_point(
            spec.radial_offset,
            angle + spec.twin_angle.eval(p, index),
            z + spec.twin_height.eval(p, index),
        ));
        travel.push(moved);
    }

    if primary.len() < 2 {
        return Err(RibError::GeometryDegenerate {
            samples: primary.len(),
        });
    }
    Ok(SampledPath {
        primary,
        twin,
        travel,
        first_index: 0,
    })
}
