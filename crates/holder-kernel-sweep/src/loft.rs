//! Multi-section sweep: key sections lofted along a twin-oriented path.

use holder_kernel_math::Point3;
use holder_kernel_sketch::Polygon2;

use crate::frame::twin_frames;
use crate::mesh::TriangleMesh;
use crate::sweep::{normalized_section, solid_from_rings, SweepOptions};
use crate::SweepError;

/// A key section at a given progress along the path.
#[derive(Debug, Clone, PartialEq)]
pub struct LoftSection {
    /// Position along the path in `[0, 1]`.
    pub progress: f64,
    /// Section polygon in frame coordinates.
    pub polygon: Polygon2,
}

/// Loft key sections along `primary`, oriented by `twin`.
///
/// At each path sample (progress `k / (n - 1)`) the section is the
/// vertex-wise blend of the two key sections bracketing that progress,
/// placed at the sample's own frame. Key sections therefore need identical
/// vertex counts and vertex-by-vertex correspondence.
///
/// # Errors
///
/// - [`SweepError::InvalidSections`] for fewer than two sections, progress
///   values outside `[0, 1]`, not strictly increasing, or not covering both
///   ends
/// - [`SweepError::MismatchedSections`] if vertex counts differ
/// - anything [`crate::sweep`] can return
pub fn loft_along(
    sections: &[LoftSection],
    primary: &[Point3],
    twin: &[Point3],
    options: SweepOptions,
) -> Result<TriangleMesh, SweepError> {
    check_sections(sections)?;
    let keys = sections
        .iter()
        .map(|s| normalized_section(&s.polygon))
        .collect::<Result<Vec<_>, _>>()?;
    let progress: Vec<f64> = sections.iter().map(|s| s.progress).collect();

    let frames = twin_frames(primary, twin, options.tangent_window, options.end_override)?;
    let last = frames.len() - 1;

    let rings = (0..frames.len())
        .map(|k| blend_at(&keys, &progress, k as f64 / last as f64))
        .collect::<Result<Vec<_>, _>>()?;

    solid_from_rings(&frames, &rings)
}

fn check_sections(sections: &[LoftSection]) -> Result<(), SweepError> {
    if sections.len() < 2 {
        return Err(SweepError::InvalidSections(format!(
            "need at least 2 sections, got {}",
            sections.len()
        )));
    }
    let expected = sections[0].polygon.len();
    for (index, s) in sections.iter().enumerate() {
        if s.polygon.len() != expected {
            return Err(SweepError::MismatchedSections {
                index,
                expected,
                found: s.polygon.len(),
            });
        }
        if !(0.0..=1.0).contains(&s.progress) {
            return Err(SweepError::InvalidSections(format!(
                "section {index} progress {} outside [0, 1]",
                s.progress
            )));
        }
    }
    if sections.windows(2).any(|w| w[1].progress <= w[0].progress) {
        return Err(SweepError::InvalidSections(
            "progress values must be strictly increasing".into(),
        ));
    }
    let (first, last) = (sections[0].progress, sections[sections.len() - 1].progress);
    if first > 1e-9 || last < 1.0 - 1e-9 {
        return Err(SweepError::InvalidSections(format!(
            "sections cover [{first}, {last}] instead of [0, 1]"
        )));
    }
    Ok(())
}

fn blend_at(keys: &[Polygon2], progress: &[f64], p: f64) -> Result<Polygon2, SweepError> {
    // Index of the last key at or before p, capped so j + 1 stays valid.
    let j = progress
        .iter()
        .rposition(|&q| q <= p)
        .unwrap_or(0)
        .min(keys.len() - 2);
    let t = ((p - progress[j]) / (progress[j + 1] - progress[j])).clamp(0.0, 1.0);
    keys[j]
        .lerp(&keys[j + 1], t)
        .ok_or(SweepError::MismatchedSections {
            index: j + 1,
            expected: keys[j].len(),
            found: keys[j + 1].len(),
        })
}
