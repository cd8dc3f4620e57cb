//! 2D sketch profile types.

use std::f64::consts::PI;

use holder_kernel_math::{Point2, Tolerance, Vec2};

use crate::polygon::Polygon2;
use crate::SketchError;

/// A segment of a 2D sketch profile.
#[derive(Debug, Clone)]
pub enum SketchSegment {
    /// A line segment from start to end.
    Line {
        /// Start point in sketch coordinates.
        start: Point2,
        /// End point in sketch coordinates.
        end: Point2,
    },
    /// A circular arc from start to end around a center.
    Arc {
        /// Start point in sketch coordinates.
        start: Point2,
        /// End point in sketch coordinates.
        end: Point2,
        /// Center of the arc in sketch coordinates.
        center: Point2,
        /// If true, arc goes counter-clockwise from start to end.
        ccw: bool,
    },
    /// A cubic Hermite blend between two points with prescribed end tangents.
    ///
    /// The tangents are derivatives with respect to the blend parameter in
    /// `[0, 1]`, so their length controls how far the blend bulges.
    Blend {
        /// Start point in sketch coordinates.
        start: Point2,
        /// End point in sketch coordinates.
        end: Point2,
        /// Derivative at the start point.
        start_tangent: Vec2,
        /// Derivative at the end point.
        end_tangent: Vec2,
    },
}

impl SketchSegment {
    /// Get the start point of this segment.
    pub fn start(&self) -> Point2 {
        match self {
            SketchSegment::Line { start, .. }
            | SketchSegment::Arc { start, .. }
            | SketchSegment::Blend { start, .. } => *start,
        }
    }

    /// Get the end point of this segment.
    pub fn end(&self) -> Point2 {
        match self {
            SketchSegment::Line { end, .. }
            | SketchSegment::Arc { end, .. }
            | SketchSegment::Blend { end, .. } => *end,
        }
    }

    /// Check if this segment is degenerate (zero length).
    pub fn is_degenerate(&self) -> bool {
        let tol = Tolerance::DEFAULT;
        match self {
            SketchSegment::Line { start, end } => (end - start).norm() < tol.linear,
            SketchSegment::Arc {
                start, end, center, ..
            } => {
                let r1 = (start - center).norm();
                let r2 = (end - center).norm();
                r1 < tol.linear || r2 < tol.linear || (end - start).norm() < tol.linear
            }
            SketchSegment::Blend {
                start,
                end,
                start_tangent,
                end_tangent,
            } => {
                (end - start).norm() < tol.linear
                    && start_tangent.norm() < tol.linear
                    && end_tangent.norm() < tol.linear
            }
        }
    }

    /// Evaluate the segment at parameter `t` in `[0, 1]`.
    pub fn point_at(&self, t: f64) -> Point2 {
        match self {
            SketchSegment::Line { start, end } => {
                Point2::from(start.coords + (end.coords - start.coords) * t)
            }
            SketchSegment::Arc {
                start,
                end,
                center,
                ccw,
            } => {
                let radius = (start - center).norm();
                let d = start - center;
                let a0 = d.y.atan2(d.x);
                let a = a0 + t * sweep_angle(*start, *end, *center, *ccw);
                Point2::new(center.x + radius * a.cos(), center.y + radius * a.sin())
            }
            SketchSegment::Blend {
                start,
                end,
                start_tangent,
                end_tangent,
            } => {
                let (h00, h10, h01, h11) = hermite_basis(t);
                Point2::from(
                    start.coords * h00 + start_tangent * h10 + end.coords * h01 + end_tangent * h11,
                )
            }
        }
    }

    /// Unit tangent (direction of travel) at parameter `t` in `[0, 1]`.
    pub fn tangent_at(&self, t: f64) -> Vec2 {
        let raw = match self {
            SketchSegment::Line { start, end } => end - start,
            SketchSegment::Arc {
                start,
                end,
                center,
                ccw,
            } => {
                let d = self.point_at(t) - center;
                let sweep = sweep_angle(*start, *end, *center, *ccw);
                // Derivative of center + r(cos a, sin a) with a increasing by `sweep`.
                Vec2::new(-d.y, d.x) * sweep.signum()
            }
            SketchSegment::Blend {
                start,
                end,
                start_tangent,
                end_tangent,
            } => {
                let t2 = t * t;
                let d00 = 6.0 * t2 - 6.0 * t;
                let d10 = 3.0 * t2 - 4.0 * t + 1.0;
                let d01 = -6.0 * t2 + 6.0 * t;
                let d11 = 3.0 * t2 - 2.0 * t;
                start.coords * d00 + start_tangent * d10 + end.coords * d01 + end_tangent * d11
            }
        };
        raw.try_normalize(f64::EPSILON).unwrap_or_else(Vec2::x)
    }

    /// Get the length of this segment (blends are measured on 32 chords).
    pub fn length(&self) -> f64 {
        match self {
            SketchSegment::Line { start, end } => (end - start).norm(),
            SketchSegment::Arc {
                start,
                end,
                center,
                ccw,
            } => (start - center).norm() * sweep_angle(*start, *end, *center, *ccw).abs(),
            SketchSegment::Blend { .. } => {
                let n = 32;
                (0..n)
                    .map(|i| {
                        let a = self.point_at(i as f64 / n as f64);
                        let b = self.point_at((i + 1) as f64 / n as f64);
                        (b - a).norm()
                    })
                    .sum()
            }
        }
    }

    /// Midpoint of the segment (at parameter 0.5).
    pub fn midpoint(&self) -> Point2 {
        self.point_at(0.5)
    }

    /// The same segment traversed in the opposite direction.
    pub fn reversed(&self) -> Self {
        match self {
            SketchSegment::Line { start, end } => SketchSegment::Line {
                start: *end,
                end: *start,
            },
            SketchSegment::Arc {
                start,
                end,
                center,
                ccw,
            } => SketchSegment::Arc {
                start: *end,
                end: *start,
                center: *center,
                ccw: !ccw,
            },
            SketchSegment::Blend {
                start,
                end,
                start_tangent,
                end_tangent,
            } => SketchSegment::Blend {
                start: *end,
                end: *start,
                start_tangent: -end_tangent,
                end_tangent: -start_tangent,
            },
        }
    }

    /// Translate the segment by `offset`.
    pub fn translated(&self, offset: Vec2) -> Self {
        match self {
            SketchSegment::Line { start, end } => SketchSegment::Line {
                start: start + offset,
                end: end + offset,
            },
            SketchSegment::Arc {
                start,
                end,
                center,
                ccw,
            } => SketchSegment::Arc {
                start: start + offset,
                end: end + offset,
                center: center + offset,
                ccw: *ccw,
            },
            SketchSegment::Blend {
                start,
                end,
                start_tangent,
                end_tangent,
            } => SketchSegment::Blend {
                start: start + offset,
                end: end + offset,
                start_tangent: *start_tangent,
                end_tangent: *end_tangent,
            },
        }
    }

    fn tessellation_steps(&self, arc_segments: usize, blend_segments: usize) -> usize {
        match self {
            SketchSegment::Line { .. } => 1,
            SketchSegment::Arc { .. } => arc_segments.max(1),
            SketchSegment::Blend { .. } => blend_segments.max(1),
        }
    }
}

/// Signed sweep angle (radians) of an arc, taking the short way round in the
/// requested direction.
fn sweep_angle(start: Point2, end: Point2, center: Point2, ccw: bool) -> f64 {
    let d_start = start - center;
    let d_end = end - center;
    let start_angle = d_start.y.atan2(d_start.x);
    let end_angle = d_end.y.atan2(d_end.x);
    let mut angle = end_angle - start_angle;
    if ccw {
        if angle < 0.0 {
            angle += 2.0 * PI;
        }
    } else if angle > 0.0 {
        angle -= 2.0 * PI;
    }
    angle
}

fn hermite_basis(t: f64) -> (f64, f64, f64, f64) {
    let t2 = t * t;
    let t3 = t2 * t;
    (
        2.0 * t3 - 3.0 * t2 + 1.0,
        t3 - 2.0 * t2 + t,
        -2.0 * t3 + 3.0 * t2,
        t3 - t2,
    )
}

/// Center of the circle of `radius` through `start` and `end`.
///
/// With `left` the center lies to the left of the chord direction
/// `start → end`, otherwise to the right.
///
/// # Errors
///
/// Returns [`SketchError::RadiusTooSmall`] when the radius cannot span the
/// chord.
pub fn arc_center_from_radius(
    start: Point2,
    end: Point2,
    radius: f64,
    left: bool,
) -> Result<Point2, SketchError> {
    let chord = end - start;
    let half_chord = chord.norm() / 2.0;
    if !(radius.is_finite() && radius > half_chord) {
        return Err(SketchError::RadiusTooSmall { radius, half_chord });
    }
    let mid = Point2::from((start.coords + end.coords) / 2.0);
    let perp = Vec2::new(-chord.y, chord.x).normalize();
    // (r - h)(r + h) keeps precision for near-flat arcs with huge radii.
    let offset = ((radius - half_chord) * (radius + half_chord)).sqrt();
    let side = if left { 1.0 } else { -1.0 };
    Ok(mid + perp * offset * side)
}

/// A closed 2D profile in a local sketch plane.
///
/// The sketch plane's placement in 3D is decided by whoever consumes the
/// profile (a sweep frame, a loft section), not by the profile itself.
#[derive(Debug, Clone)]
pub struct SketchProfile {
    /// The segments forming the closed profile.
    pub segments: Vec<SketchSegment>,
}

impl SketchProfile {
    /// Create a new sketch profile.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The profile has no segments
    /// - Any segment is degenerate
    /// - The profile is not closed (start of first segment != end of last segment)
    pub fn new(segments: Vec<SketchSegment>) -> Result<Self, SketchError> {
        let (first, last) = match (segments.first(), segments.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(SketchError::EmptyProfile),
        };

        for (i, seg) in segments.iter().enumerate() {
            if seg.is_degenerate() {
                return Err(SketchError::DegenerateSegment(i));
            }
        }

        let tol = Tolerance::DEFAULT;
        let gap = (last.end() - first.start()).norm();
        if gap > tol.linear {
            return Err(SketchError::NotClosed(gap));
        }

        for pair in segments.windows(2) {
            let continuity_gap = (pair[1].start() - pair[0].end()).norm();
            if continuity_gap > tol.linear {
                return Err(SketchError::NotClosed(continuity_gap));
            }
        }

        Ok(Self { segments })
    }

    /// Tessellate into a polygon.
    ///
    /// Arcs are split into `arc_segments` chords, blends into
    /// `blend_segments` chords and lines stay single edges. Each segment
    /// contributes its start point and interior samples; its end point is the
    /// next segment's start.
    pub fn tessellate(&self, arc_segments: usize, blend_segments: usize) -> Polygon2 {
        let mut points = Vec::new();
        for seg in &self.segments {
            let steps = seg.tessellation_steps(arc_segments, blend_segments);
            for i in 0..steps {
                points.push(seg.point_at(i as f64 / steps as f64));
            }
        }
        Polygon2::new(points)
    }

    /// Translate every segment by `offset`.
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            segments: self.segments.iter().map(|s| s.translated(offset)).collect(),
        }
    }

    /// Total boundary length.
    pub fn perimeter(&self) -> f64 {
        self.segments.iter().map(SketchSegment::length).sum()
    }

    /// Get the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if the profile is empty.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
