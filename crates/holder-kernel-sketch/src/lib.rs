#![warn(missing_docs)]

//! 2D sketch profiles for the bottle holder kernel.
//!
//! A [`SketchProfile`] is a closed chain of [`SketchSegment`]s (lines,
//! circular arcs and cubic tangent blends) in a local 2D plane. Sweeps never
//! consume the exact segments: they consume the profile tessellated into a
//! [`Polygon2`], so every profile used in one loft must tessellate to the
//! same vertex count.
//!
//! # Example
//!
//! ```
//! use holder_kernel_sketch::{SketchProfile, SketchSegment};
//! use holder_kernel_math::Point2;
//!
//! let a = Point2::new(0.0, 0.0);
//! let b = Point2::new(4.0, 0.0);
//! let c = Point2::new(0.0, 3.0);
//! let profile = SketchProfile::new(vec![
//!     SketchSegment::Line { start: a, end: b },
//!     SketchSegment::Line { start: b, end: c },
//!     SketchSegment::Line { start: c, end: a },
//! ])
//! .unwrap();
//!
//! let polygon = profile.tessellate(8, 8);
//! assert_eq!(polygon.len(), 3);
//! assert!((polygon.signed_area().abs() - 6.0).abs() < 1e-12);
//! ```

mod polygon;
mod profile;

pub use polygon::Polygon2;
pub use profile::{arc_center_from_radius, SketchProfile, SketchSegment};

use thiserror::Error;

/// Errors from building sketch profiles.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SketchError {
    /// The profile is not closed (gap between consecutive segments).
    #[error("profile is not closed: gap of {0:.6} mm")]
    NotClosed(f64),

    /// A segment is degenerate (zero length).
    #[error("degenerate segment at index {0}")]
    DegenerateSegment(usize),

    /// An arc radius cannot span the requested chord.
    #[error("arc radius {radius:.4} mm is smaller than half the chord ({half_chord:.4} mm)")]
    RadiusTooSmall {
        /// Requested arc radius.
        radius: f64,
        /// Half of the chord length the arc must span.
        half_chord: f64,
    },

    /// Profile has no segments.
    #[error("profile has no segments")]
    EmptyProfile,
}
