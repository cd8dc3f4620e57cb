//! Orientation frames reconstructed from a primary/twin path pair.

use holder_kernel_math::{reject, Dir3, Point2, Point3, Tolerance, Vec3};

use crate::SweepError;

/// A local frame at one path sample.
///
/// Section coordinates map to 3D as `position + x * normal + y * binormal`.
/// The section plane is perpendicular to `tangent`.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepFrame {
    /// Position of the primary sample.
    pub position: Point3,
    /// Normal of the section plane.
    pub tangent: Dir3,
    /// In-plane direction towards the twin sample.
    pub normal: Dir3,
    /// `normal × tangent`, completing the in-plane basis.
    pub binormal: Dir3,
}

impl SweepFrame {
    /// Build a frame from a primary sample, its twin and a plane normal.
    ///
    /// The twin displacement is projected into the plane; `sample` is only
    /// used to label the error.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::DegenerateFrame`] if the twin displacement is
    /// parallel to `tangent` (or zero).
    pub fn from_twin(
        position: Point3,
        twin: Point3,
        tangent: Dir3,
        sample: usize,
    ) -> Result<Self, SweepError> {
        let in_plane = reject(&(twin - position), &tangent);
        if in_plane.norm() < 1e-14 {
            return Err(SweepError::DegenerateFrame { sample });
        }
        let normal = Dir3::new_normalize(in_plane);
        let binormal = Dir3::new_normalize(normal.as_ref().cross(tangent.as_ref()));
        Ok(Self {
            position,
            tangent,
            normal,
            binormal,
        })
    }

    /// Transform a 2D point from section coordinates to world coordinates.
    pub fn transform_point(&self, p: Point2) -> Point3 {
        self.position + p.x * self.normal.as_ref() + p.y * self.binormal.as_ref()
    }
}

/// Straight-up plane normal forced at both path ends.
///
/// At progress `0` and `1` the section plane normal becomes `±up` (the sign
/// follows the path direction there), fading linearly back to the path
/// tangent over `span` of the progress range. Cut planes at the ends are
/// then perpendicular to `up`, which gives flat printable caps.
///
/// With `level` set, the override fades to the path tangent with its `up`
/// component removed. A path that peaks sharply then keeps its section
/// planes turning at a steady rate instead of following the peak, so
/// consecutive sections never cross there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndOverride {
    /// Forced plane normal at the ends.
    pub up: Dir3,
    /// Progress span over which the override fades out, in `(0, 0.5]`.
    pub span: f64,
    /// Fade to the levelled tangent instead of the path tangent.
    pub level: bool,
}

impl EndOverride {
    /// Override with `+Z` fading over `span`.
    pub fn z_up(span: f64) -> Self {
        Self {
            up: Dir3::new_normalize(Vec3::z()),
            span,
            level: false,
        }
    }

    /// The same override fading to the levelled tangent.
    pub fn leveled(self) -> Self {
        Self {
            level: true,
            ..self
        }
    }
}

/// Unit path tangents by chords over `window` samples each way.
///
/// `window = 1` gives central differences (one-sided at the ends).
fn path_tangents(primary: &[Point3], window: usize) -> Result<Vec<Dir3>, SweepError> {
    let n = primary.len();
    let window = window.max(1);
    (0..n)
        .map(|k| {
            let lo = k.saturating_sub(window);
            let hi = (k + window).min(n - 1);
            let chord = primary[hi] - primary[lo];
            if chord.norm() < 1e-12 {
                Err(SweepError::DegenerateFrame { sample: k })
            } else {
                Ok(Dir3::new_normalize(chord))
            }
        })
        .collect()
}

/// Build one frame per sample from a primary path and its twin.
///
/// # Errors
///
/// - [`SweepError::MismatchedPaths`] if the paths differ in length
/// - [`SweepError::TooFewSamples`] for fewer than two samples
/// - [`SweepError::ZeroLengthPath`] if the primary path does not move
/// - [`SweepError::DegenerateFrame`] if some sample has no usable twin offset
pub fn twin_frames(
    primary: &[Point3],
    twin: &[Point3],
    tangent_window: usize,
    end_override: Option<EndOverride>,
) -> Result<Vec<SweepFrame>, SweepError> {
    if primary.len() != twin.len() {
        return Err(SweepError::MismatchedPaths {
            primary: primary.len(),
            twin: twin.len(),
        });
    }
    let n = primary.len();
    if n < 2 {
        return Err(SweepError::TooFewSamples(n));
    }
    let length: f64 = primary.windows(2).map(|w| (w[1] - w[0]).norm()).sum();
    if Tolerance::DEFAULT.is_zero(length) {
        return Err(SweepError::ZeroLengthPath);
    }

    let tangents = path_tangents(primary, tangent_window)?;
    let last = n - 1;

    (0..n)
        .map(|k| {
            let tangent = match end_override {
                Some(ov) => blend_override(&ov, &tangents, k, last)?,
                None => tangents[k],
            };
            SweepFrame::from_twin(primary[k], twin[k], tangent, k)
        })
        .collect()
}

fn blend_override(
    ov: &EndOverride,
    tangents: &[Dir3],
    k: usize,
    last: usize,
) -> Result<Dir3, SweepError> {
    let progress = k as f64 / last as f64;
    let span = ov.span.clamp(f64::EPSILON, 0.5);
    let (end_tangent, dist) = if progress <= 0.5 {
        (&tangents[0], progress)
    } else {
        (&tangents[last], 1.0 - progress)
    };
    let target = if ov.level {
        let level = reject(tangents[k].as_ref(), &ov.up);
        if level.norm() < 1e-12 {
            return Err(SweepError::DegenerateFrame { sample: k });
        }
        Dir3::new_normalize(level)
    } else {
        tangents[k]
    };
    if dist >= span {
        return Ok(target);
    }
    let sign = if ov.up.dot(end_tangent.as_ref()) >= 0.0 {
        1.0
    } else {
        -1.0
    };
    let s = dist / span;
    let blended = (1.0 - s) * sign * ov.up.as_ref() + s * target.as_ref();
    if blended.norm() < 1e-12 {
        return Err(SweepError::DegenerateFrame { sample: k });
    }
    Ok(Dir3::new_normalize(blended))
}
